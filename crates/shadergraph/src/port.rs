// SPDX-License-Identifier: MIT OR Apache-2.0
//! Port definitions for node inputs/outputs.

use crate::connection::EdgeHandle;
use crate::node::NodeHandle;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Data type that can flow through ports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// Scalar float
    #[serde(rename = "float")]
    Float,
    /// 2D vector
    #[serde(rename = "vec2f")]
    Vec2f,
    /// 3D vector
    #[serde(rename = "vec3f")]
    Vec3f,
    /// 4D vector / color
    #[serde(rename = "vec4f")]
    Vec4f,
    /// 2D texture binding
    #[serde(rename = "texture2D")]
    Texture2D,
    /// Sampler binding
    #[serde(rename = "sampler")]
    Sampler,
    /// Mesh texture coordinates
    #[serde(rename = "uv")]
    Uv,
}

impl DataType {
    /// Number of float components, zero for non-numeric types
    pub fn arity(self) -> usize {
        match self {
            Self::Float => 1,
            Self::Vec2f => 2,
            Self::Vec3f => 3,
            Self::Vec4f => 4,
            Self::Texture2D | Self::Sampler | Self::Uv => 0,
        }
    }

    /// Whether literals of this type are float scalars or vectors
    pub fn is_numeric(self) -> bool {
        self.arity() > 0
    }

    /// Whether properties of this type become individual bindings
    /// rather than members of the property uniform struct
    pub fn is_binding(self) -> bool {
        matches!(self, Self::Texture2D | Self::Sampler)
    }

    /// The WGSL type used when declaring a value of this type
    pub fn wgsl_type(self) -> &'static str {
        match self {
            Self::Float => "f32",
            Self::Vec2f | Self::Uv => "vec2f",
            Self::Vec3f => "vec3f",
            Self::Vec4f => "vec4f",
            Self::Texture2D => "texture_2d<f32>",
            Self::Sampler => "sampler",
        }
    }

    /// Tag used by graph descriptors
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Float => "float",
            Self::Vec2f => "vec2f",
            Self::Vec3f => "vec3f",
            Self::Vec4f => "vec4f",
            Self::Texture2D => "texture2D",
            Self::Sampler => "sampler",
            Self::Uv => "uv",
        }
    }

    /// Check if an output of this type can feed an input of another type.
    ///
    /// Only consulted by the opt-in type diagnostics; binding edges never
    /// check types.
    pub fn can_connect_to(self, input: DataType) -> bool {
        if self == input {
            return true;
        }

        match (self, input) {
            // Texture coordinates are plain 2D vectors
            (Self::Uv, Self::Vec2f) | (Self::Vec2f, Self::Uv) => true,
            // Scalar widening
            (Self::Float, Self::Vec2f | Self::Vec3f | Self::Vec4f) => true,
            _ => false,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Addresses a port by its owning node and its index within that node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortRef {
    /// Owning node
    pub node: NodeHandle,
    /// Index into the node's input or output ports
    pub port: usize,
}

impl PortRef {
    /// Create a new port reference
    pub fn new(node: NodeHandle, port: usize) -> Self {
        Self { node, port }
    }
}

/// An input port on a node
#[derive(Debug, Clone, PartialEq)]
pub struct InputPort {
    /// Port name
    pub name: String,
    /// Data type
    pub data_type: DataType,
    /// Literal used when no edge is bound
    pub value: Option<Value>,
    /// Bound edge; supersedes `value`
    pub edge: Option<EdgeHandle>,
}

impl InputPort {
    /// Create a new input port without a literal
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            value: None,
            edge: None,
        }
    }

    /// Create an input port whose literal is the zero value of its type
    pub fn zeroed(name: impl Into<String>, data_type: DataType) -> Self {
        Self::new(name, data_type).with_default(Value::zero(data_type))
    }

    /// Set the default literal
    pub fn with_default(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    /// Whether an edge is bound to this port
    pub fn is_connected(&self) -> bool {
        self.edge.is_some()
    }
}

/// An output port on a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPort {
    /// Port name
    pub name: String,
    /// Data type
    pub data_type: DataType,
}

impl OutputPort {
    /// Create a new output port
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}
