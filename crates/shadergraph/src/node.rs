// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for the shader graph.

use crate::port::{DataType, InputPort, OutputPort};
use crate::property::Property;
use crate::value::{SamplerDescriptor, Value};
use std::sync::Arc;

/// Identifier of a node within a graph, as persisted in descriptors
pub type NodeId = u32;

/// Stable index of a node within its stage graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeHandle(pub usize);

/// Node type category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeCategory {
    /// Input nodes (uv, time, values, properties)
    Input,
    /// The display sink
    Output,
    /// Arithmetic
    Math,
    /// Vector construction and decomposition
    Vector,
    /// Texture sampling
    Texture,
    /// Procedural patterns and UV operations
    Procedural,
    /// Lighting
    Lighting,
}

/// The computation a node performs
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Final fragment output
    Display,
    /// Mesh texture coordinates
    Uv,
    /// Scene time in seconds
    Time,
    /// Inline literal
    Value(Value),
    /// Reference to a material property
    Property(Arc<Property>),
    /// `A + (B)`
    Add,
    /// `A - (B)`
    Subtract,
    /// `A * (B)`
    Multiply,
    /// `pow(base, exponent)`
    Power,
    /// `fract(input)`
    Fraction,
    /// `mix(A, B, t)`
    Lerp,
    /// Vector to components
    Split,
    /// Components to vector
    Combine,
    /// Swirl UVs around a center
    Twirl,
    /// Cellular noise
    Voronoi,
    /// Tile UVs and scroll them over time
    TileAndScroll,
    /// Texture lookup
    SampleTexture {
        /// Sampler the lookup requires
        sampler: SamplerDescriptor,
        /// Binding name resolved during generation
        sampler_name: Option<String>,
    },
    /// Phong lighting for lit materials
    PhongShading,
}

impl NodeKind {
    /// Type tag used by graph descriptors
    pub fn type_tag(&self) -> &'static str {
        match self {
            Self::Display => "display",
            Self::Uv => "uv",
            Self::Time => "time",
            Self::Value(_) => "value",
            Self::Property(_) => "property",
            Self::Add => "Add",
            Self::Subtract => "Subtract",
            Self::Multiply => "Multiply",
            Self::Power => "Power",
            Self::Fraction => "Fraction",
            Self::Lerp => "Lerp",
            Self::Split => "Split",
            Self::Combine => "Combine",
            Self::Twirl => "Twirl",
            Self::Voronoi => "Voronoi",
            Self::TileAndScroll => "TileAndScroll",
            Self::SampleTexture { .. } => "SampleTexture",
            Self::PhongShading => "PhongShading",
        }
    }

    /// Whether the node's result is stored in a `let` variable.
    /// Literals and properties are inlined; the sink returns.
    pub fn declares_variable(&self) -> bool {
        !matches!(self, Self::Display | Self::Value(_) | Self::Property(_))
    }
}

/// Node type definition
#[derive(Debug, Clone)]
pub struct NodeType {
    /// Type tag
    pub id: String,
    /// Display name
    pub name: String,
    /// Category
    pub category: NodeCategory,
    /// Description
    pub description: String,
    /// Kind instantiated for new nodes
    pub kind: NodeKind,
    /// Default input ports
    pub inputs: Vec<InputPort>,
    /// Default output ports
    pub outputs: Vec<OutputPort>,
}

/// A node instance in a stage graph
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    /// Identifier, unique within the graph
    pub id: NodeId,
    /// Computation
    pub kind: NodeKind,
    /// Editor position; ignored by compilation
    pub position: [f32; 2],
    /// Distance to the sink, set during generation
    pub priority: Option<u32>,
    /// Variable holding the result, set during generation
    pub var_name: Option<String>,
    /// Input ports
    pub inputs: Vec<InputPort>,
    /// Output ports
    pub outputs: Vec<OutputPort>,
}

impl GraphNode {
    /// Create a node from a type definition
    pub fn new(id: NodeId, node_type: &NodeType) -> Self {
        Self {
            id,
            kind: node_type.kind.clone(),
            position: [0.0, 0.0],
            priority: None,
            var_name: None,
            inputs: node_type.inputs.clone(),
            outputs: node_type.outputs.clone(),
        }
    }

    /// Create a literal node. Vector literals get one float input per
    /// component for the editor to display; they do not affect the output.
    pub fn value(id: NodeId, value: Value) -> Self {
        let data_type = value.data_type();
        let inputs = if data_type.arity() > 1 {
            ["X", "Y", "Z", "W"]
                .iter()
                .take(data_type.arity())
                .map(|label| InputPort::zeroed(*label, DataType::Float))
                .collect()
        } else {
            Vec::new()
        };

        Self {
            id,
            kind: NodeKind::Value(value),
            position: [0.0, 0.0],
            priority: None,
            var_name: None,
            inputs,
            outputs: vec![OutputPort::new("value", data_type)],
        }
    }

    /// Create a node reading a property
    pub fn property(id: NodeId, property: Arc<Property>) -> Self {
        let output = OutputPort::new(property.name.clone(), property.data_type());
        Self {
            id,
            kind: NodeKind::Property(property),
            position: [0.0, 0.0],
            priority: None,
            var_name: None,
            inputs: Vec::new(),
            outputs: vec![output],
        }
    }

    /// Set the position
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = [x, y];
        self
    }

    /// Type tag
    pub fn type_tag(&self) -> &'static str {
        self.kind.type_tag()
    }

    /// Find an input port index by name
    pub fn input_index(&self, name: &str) -> Option<usize> {
        self.inputs.iter().position(|p| p.name == name)
    }

    /// Find an output port index by name
    pub fn output_index(&self, name: &str) -> Option<usize> {
        self.outputs.iter().position(|p| p.name == name)
    }

    /// Find an input port by name
    pub fn input_mut(&mut self, name: &str) -> Option<&mut InputPort> {
        self.inputs.iter_mut().find(|p| p.name == name)
    }

    /// Clear the state left by a generation pass
    pub fn reset(&mut self) {
        self.priority = None;
        self.var_name = None;
        if let NodeKind::SampleTexture { sampler_name, .. } = &mut self.kind {
            *sampler_name = None;
        }
    }

    /// Expression producing the value of an output port
    pub fn output_expression(&self, port: usize) -> String {
        match &self.kind {
            NodeKind::Value(value) => value.to_wgsl(),
            NodeKind::Property(property) => property.expression(),
            NodeKind::Split => match (&self.var_name, self.outputs.get(port)) {
                (Some(var), Some(output)) => format!("{var}.{}", output.name),
                _ => String::new(),
            },
            _ => self.var_name.clone().unwrap_or_default(),
        }
    }

    /// The statement this node contributes to the stage body, given the
    /// resolved expression of each input port in order
    pub fn statement(&self, inputs: &[String]) -> String {
        let arg = |i: usize| inputs.get(i).map_or("", String::as_str);

        let expression = match &self.kind {
            NodeKind::Value(_) | NodeKind::Property(_) => return String::new(),
            NodeKind::Display => return format!("return {};\n", arg(0)),
            NodeKind::Uv => "vertexOut.texcoord".to_string(),
            NodeKind::Time => "time".to_string(),
            NodeKind::Add => format!("{} + ({})", arg(0), arg(1)),
            NodeKind::Subtract => format!("{} - ({})", arg(0), arg(1)),
            NodeKind::Multiply => format!("{} * ({})", arg(0), arg(1)),
            NodeKind::Power => format!("pow({}, {})", arg(0), arg(1)),
            NodeKind::Fraction => format!("fract({})", arg(0)),
            NodeKind::Lerp => format!("mix({}, {}, {})", arg(0), arg(1), arg(2)),
            NodeKind::Split => arg(0).to_string(),
            NodeKind::Combine => format!("vec4f({}, {}, {}, {})", arg(0), arg(1), arg(2), arg(3)),
            NodeKind::Twirl => format!("twirl({}, {}, {}, {})", arg(0), arg(1), arg(2), arg(3)),
            NodeKind::Voronoi => format!("voronoi({}, {}, {})", arg(0), arg(1), arg(2)),
            NodeKind::TileAndScroll => {
                format!("fract({} * {} + time * {})", arg(0), arg(1), arg(2))
            }
            NodeKind::SampleTexture { sampler_name, .. } => format!(
                "textureSample({}, {}, {})",
                arg(0),
                sampler_name.as_deref().unwrap_or_default(),
                arg(1)
            ),
            NodeKind::PhongShading => {
                format!("phong(vertexOut.fragPos, vertexOut.normal, {})", arg(0))
            }
        };

        match &self.var_name {
            Some(var) => format!("let {var} = {expression};\n"),
            None => String::new(),
        }
    }
}

/// Registry of available node types
pub struct NodeRegistry {
    /// Registered node types by tag
    types: indexmap::IndexMap<String, NodeType>,
}

impl NodeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            types: indexmap::IndexMap::new(),
        }
    }

    /// Register a node type
    pub fn register(&mut self, node_type: NodeType) {
        self.types.insert(node_type.id.clone(), node_type);
    }

    /// Get a node type by tag
    pub fn get(&self, id: &str) -> Option<&NodeType> {
        self.types.get(id)
    }

    /// Get all registered types
    pub fn types(&self) -> impl Iterator<Item = &NodeType> {
        self.types.values()
    }

    /// Get types by category
    pub fn types_in_category(&self, category: NodeCategory) -> impl Iterator<Item = &NodeType> {
        self.types.values().filter(move |t| t.category == category)
    }

    /// Create a node from a type tag
    pub fn create_node(&self, type_id: &str, id: NodeId) -> Option<GraphNode> {
        self.get(type_id).map(|node_type| GraphNode::new(id, node_type))
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
