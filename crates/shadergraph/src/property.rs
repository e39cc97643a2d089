// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph-external inputs surfaced as uniforms or bindings.

use crate::port::DataType;
use crate::value::{Value, ValueData};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A named input owned by the material and shared by the nodes that read it
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Unique name within a material
    pub name: String,
    /// Current value
    pub value: Value,
}

impl Property {
    /// Create a new property
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Create a property ready to be shared between nodes
    pub fn shared(name: impl Into<String>, value: Value) -> Arc<Self> {
        Arc::new(Self::new(name, value))
    }

    /// Data type of the value
    pub fn data_type(&self) -> DataType {
        self.value.data_type()
    }

    /// Whether the property is a texture or sampler binding
    pub fn is_binding(&self) -> bool {
        self.data_type().is_binding()
    }

    /// Expression that reads this property inside the fragment stage
    pub fn expression(&self) -> String {
        if self.is_binding() {
            self.name.clone()
        } else {
            format!("properties.{}", self.name)
        }
    }
}

/// Persisted form of a property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescriptor {
    /// Property name
    pub name: String,
    /// Data type
    pub data_type: DataType,
    /// Raw value
    #[serde(default)]
    pub value: ValueData,
}

impl PropertyDescriptor {
    /// Materialize the property
    pub fn to_property(&self) -> Arc<Property> {
        Property::shared(
            self.name.clone(),
            Value::new(self.data_type, self.value.clone()),
        )
    }
}

impl From<&Property> for PropertyDescriptor {
    fn from(property: &Property) -> Self {
        Self {
            name: property.name.clone(),
            data_type: property.data_type(),
            value: property.value.data().clone(),
        }
    }
}
