// SPDX-License-Identifier: MIT OR Apache-2.0
//! Materials: descriptors carrying a property table and a shader graph.

use crate::assembler::{generate_shader_code, ShaderCode};
use crate::builder::build_graph;
use crate::descriptor::GraphDescriptor;
use crate::generator::GenerateError;
use crate::property::{Property, PropertyDescriptor};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Kind of drawable a material applies to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialType {
    /// Screen-facing discs
    Circle,
    /// Line strips
    Line,
    /// Shaded meshes
    #[default]
    Lit,
    /// Particle trajectories
    Trajectory,
    /// Unshaded meshes
    Mesh,
}

/// Face culling
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CullMode {
    /// Cull back faces
    #[default]
    Back,
    /// Draw both faces
    None,
}

/// Persisted material
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialDescriptor {
    /// Drawable kind
    #[serde(rename = "type")]
    pub material_type: MaterialType,
    /// Face culling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cull_mode: Option<CullMode>,
    /// Base color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Vec<f32>>,
    /// Whether the material is blended
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transparent: Option<bool>,
    /// Use the lit template; unset means unlit whatever the type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lit: Option<bool>,
    /// Property table referenced by `property` nodes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<PropertyDescriptor>,
    /// Shader graph
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph: Option<GraphDescriptor>,
}

impl MaterialDescriptor {
    /// Parse a JSON material
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parse a RON material
    pub fn from_ron(text: &str) -> Result<Self> {
        Ok(ron::from_str(text)?)
    }

    /// Serialize to pretty RON
    pub fn to_ron(&self) -> Result<String> {
        let config = ron::ser::PrettyConfig::default().extensions(ron::extensions::Extensions::IMPLICIT_SOME);
        Ok(ron::ser::to_string_pretty(self, config)?)
    }

    /// Whether the shader needs the lighting varyings and `phong`.
    /// Only an explicit `lit` flag selects them.
    pub fn is_lit(&self) -> bool {
        self.lit.unwrap_or(false)
    }

    /// Materialize the property table
    pub fn property_table(&self) -> Vec<Arc<Property>> {
        self.properties.iter().map(PropertyDescriptor::to_property).collect()
    }
}

/// Compile a material's graph into a WGSL module
pub fn generate_material(descriptor: &MaterialDescriptor) -> Result<ShaderCode> {
    let properties = descriptor.property_table();
    let graph_descriptor = descriptor.graph.clone().unwrap_or_default();
    let mut graph = build_graph(&graph_descriptor, &properties);

    let code = generate_shader_code(&mut graph, descriptor.is_lit())?;
    tracing::debug!(
        "Generated {:?} material with {} properties",
        descriptor.material_type,
        code.properties.len()
    );
    Ok(code)
}

/// A device able to compile WGSL into shader modules
pub trait ShaderDevice {
    /// Compiled module handle
    type Module;
    /// Compilation error
    type Error: std::error::Error + Send + Sync + 'static;

    /// Compile a module from WGSL source
    fn create_shader_module(&self, label: &str, source: &str) -> std::result::Result<Self::Module, Self::Error>;
}

/// A material compiled on a device
#[derive(Debug)]
pub struct MaterialModule<M> {
    /// Device module
    pub module: M,
    /// Properties in binding order
    pub properties: Vec<Arc<Property>>,
    /// WGSL source the module was compiled from
    pub source: String,
}

/// Compile a material and hand the source to a device
pub fn generate_shader_module<D: ShaderDevice>(
    descriptor: &MaterialDescriptor,
    device: &D,
) -> Result<MaterialModule<D::Module>> {
    let ShaderCode { source, properties } = generate_material(descriptor)?;

    let module = device
        .create_shader_module("custom shader", &source)
        .map_err(|e| MaterialError::Device(Box::new(e)))?;

    Ok(MaterialModule {
        module,
        properties,
        source,
    })
}

/// Error while loading or compiling a material
#[derive(Debug, thiserror::Error)]
pub enum MaterialError {
    /// Graph generation failed
    #[error(transparent)]
    Generate(#[from] GenerateError),

    /// The device rejected the module
    #[error("Shader module creation failed: {0}")]
    Device(Box<dyn std::error::Error + Send + Sync>),

    /// Malformed JSON
    #[error("Invalid material JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed RON
    #[error("Invalid material RON: {0}")]
    Ron(#[from] ron::error::SpannedError),

    /// RON serialization failed
    #[error("Failed to write material RON: {0}")]
    RonWrite(#[from] ron::Error),
}

/// Result type for material operations
pub type Result<T> = std::result::Result<T, MaterialError>;
