// SPDX-License-Identifier: MIT OR Apache-2.0
//! Typed literals and their WGSL rendering.

use crate::port::DataType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw payload of a literal as it appears in descriptors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValueData {
    /// Scalar number
    Number(f64),
    /// Vector components
    Vector(Vec<f64>),
    /// Text, e.g. a texture location
    Text(String),
    /// Sampler description
    Sampler(SamplerDescriptor),
}

impl Default for ValueData {
    fn default() -> Self {
        Self::Number(0.0)
    }
}

/// Texture addressing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AddressMode {
    /// Clamp to the edge texel
    ClampToEdge,
    /// Repeat the texture
    Repeat,
    /// Repeat, mirroring every other tile
    MirrorRepeat,
}

impl AddressMode {
    /// Descriptor tag
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ClampToEdge => "clamp-to-edge",
            Self::Repeat => "repeat",
            Self::MirrorRepeat => "mirror-repeat",
        }
    }
}

/// Texel filtering mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Nearest texel
    Nearest,
    /// Linear interpolation
    Linear,
}

impl FilterMode {
    /// Descriptor tag
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Nearest => "nearest",
            Self::Linear => "linear",
        }
    }
}

/// Depth comparison of a comparison sampler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompareFunction {
    /// Never passes
    Never,
    /// `<`
    Less,
    /// `==`
    Equal,
    /// `<=`
    LessEqual,
    /// `>`
    Greater,
    /// `!=`
    NotEqual,
    /// `>=`
    GreaterEqual,
    /// Always passes
    Always,
}

impl CompareFunction {
    /// Descriptor tag
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Never => "never",
            Self::Less => "less",
            Self::Equal => "equal",
            Self::LessEqual => "less-equal",
            Self::Greater => "greater",
            Self::NotEqual => "not-equal",
            Self::GreaterEqual => "greater-equal",
            Self::Always => "always",
        }
    }
}

// Sampler enums are written as strings so that formats with bare
// identifiers (RON) still read them back through the untagged payload.
macro_rules! serialize_as_str {
    ($($ty:ty),*) => {
        $(
            impl Serialize for $ty {
                fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    serializer.serialize_str(self.as_str())
                }
            }
        )*
    };
}

serialize_as_str!(AddressMode, FilterMode, CompareFunction);

/// Description of a GPU sampler.
///
/// Unset fields take the device defaults. Keys that are not modelled here
/// are kept in `extra` and written back unchanged. Two samplers are
/// interchangeable when their serialized forms are equal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplerDescriptor {
    /// Addressing along U
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_mode_u: Option<AddressMode>,
    /// Addressing along V
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_mode_v: Option<AddressMode>,
    /// Addressing along W
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_mode_w: Option<AddressMode>,
    /// Magnification filter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mag_filter: Option<FilterMode>,
    /// Minification filter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_filter: Option<FilterMode>,
    /// Mipmap filter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mipmap_filter: Option<FilterMode>,
    /// Minimum level of detail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lod_min_clamp: Option<f32>,
    /// Maximum level of detail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lod_max_clamp: Option<f32>,
    /// Comparison function; set for depth comparison samplers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare: Option<CompareFunction>,
    /// Maximum anisotropy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_anisotropy: Option<u16>,
    /// Any other sampler keys
    #[serde(flatten, default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SamplerDescriptor {
    /// Serialized form used for equality between samplers
    pub fn key(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// A typed literal. The payload always matches the arity of its type.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    data_type: DataType,
    data: ValueData,
}

impl Value {
    /// Create a value, coercing the payload to the type.
    ///
    /// Vectors are truncated or zero-padded to the arity, a scalar given for
    /// a vector type is splatted, and a vector given for a float keeps its
    /// first component.
    pub fn new(data_type: DataType, data: ValueData) -> Self {
        let data = match (data_type.arity(), data) {
            (0, data) => data,
            (1, ValueData::Number(x)) => ValueData::Number(x),
            (1, ValueData::Vector(v)) => ValueData::Number(v.first().copied().unwrap_or(0.0)),
            (n, ValueData::Number(x)) => ValueData::Vector(vec![x; n]),
            (n, ValueData::Vector(mut v)) => {
                v.resize(n, 0.0);
                ValueData::Vector(v)
            }
            (n, ValueData::Text(_) | ValueData::Sampler(_)) => Self::zero_data(n),
        };

        Self { data_type, data }
    }

    /// The zero value of a type
    pub fn zero(data_type: DataType) -> Self {
        let data = match data_type {
            DataType::Texture2D => ValueData::Text(String::new()),
            DataType::Sampler => ValueData::Sampler(SamplerDescriptor::default()),
            _ => Self::zero_data(data_type.arity()),
        };
        Self { data_type, data }
    }

    /// Float scalar
    pub fn float(x: f64) -> Self {
        Self::new(DataType::Float, ValueData::Number(x))
    }

    /// Vector of the given type from components
    pub fn vector(data_type: DataType, components: &[f64]) -> Self {
        Self::new(data_type, ValueData::Vector(components.to_vec()))
    }

    /// Texture coordinates of the current fragment
    pub fn uv() -> Self {
        Self::new(DataType::Uv, ValueData::Number(0.0))
    }

    /// Texture location
    pub fn texture(location: impl Into<String>) -> Self {
        Self::new(DataType::Texture2D, ValueData::Text(location.into()))
    }

    /// Sampler literal
    pub fn sampler(descriptor: SamplerDescriptor) -> Self {
        Self::new(DataType::Sampler, ValueData::Sampler(descriptor))
    }

    fn zero_data(arity: usize) -> ValueData {
        if arity == 1 {
            ValueData::Number(0.0)
        } else {
            ValueData::Vector(vec![0.0; arity])
        }
    }

    /// Data type
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Raw payload
    pub fn data(&self) -> &ValueData {
        &self.data
    }

    /// Render as WGSL source text
    pub fn to_wgsl(&self) -> String {
        match (self.data_type, &self.data) {
            (DataType::Float, ValueData::Number(x)) => format_float(*x),
            (DataType::Vec2f | DataType::Vec3f | DataType::Vec4f, ValueData::Vector(v)) => {
                let components: Vec<String> = v.iter().map(|c| format_component(*c)).collect();
                format!("{}({})", self.data_type.wgsl_type(), components.join(", "))
            }
            (DataType::Uv, _) => "vertexOut.texcoord".to_string(),
            _ => String::new(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wgsl())
    }
}

/// Shortest form; the vector constructor fixes the component type
fn format_component(x: f64) -> String {
    format!("{x}")
}

/// A bare scalar needs a decimal point to be typed `f32`
fn format_float(x: f64) -> String {
    if x.is_finite() && x.fract() == 0.0 {
        format!("{x:.1}")
    } else {
        format!("{x}")
    }
}
