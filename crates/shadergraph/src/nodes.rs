// SPDX-License-Identifier: MIT OR Apache-2.0
//! Built-in shader node types.
//!
//! Literal (`value`) and `property` nodes are not registered here: the
//! builder creates them directly because they need a value or a property.

use crate::node::{NodeCategory, NodeKind, NodeRegistry, NodeType};
use crate::port::{DataType, InputPort, OutputPort};
use crate::value::{SamplerDescriptor, Value};

/// Create the registry with every operator node type
pub fn create_shader_registry() -> NodeRegistry {
    let mut registry = NodeRegistry::new();

    // ========================================================================
    // Output
    // ========================================================================

    registry.register(NodeType {
        id: "display".to_string(),
        name: "Display".to_string(),
        category: NodeCategory::Output,
        description: "Final fragment color".to_string(),
        kind: NodeKind::Display,
        inputs: vec![InputPort::new("rgba", DataType::Vec4f)
            .with_default(Value::vector(DataType::Vec4f, &[0.0, 0.0, 0.0, 1.0]))],
        outputs: vec![],
    });

    // ========================================================================
    // Inputs
    // ========================================================================

    registry.register(NodeType {
        id: "uv".to_string(),
        name: "UV".to_string(),
        category: NodeCategory::Input,
        description: "Mesh texture coordinates".to_string(),
        kind: NodeKind::Uv,
        inputs: vec![],
        outputs: vec![OutputPort::new("uv", DataType::Vec2f)],
    });

    registry.register(NodeType {
        id: "time".to_string(),
        name: "Time".to_string(),
        category: NodeCategory::Input,
        description: "Scene time in seconds".to_string(),
        kind: NodeKind::Time,
        inputs: vec![],
        outputs: vec![OutputPort::new("time", DataType::Float)],
    });

    // ========================================================================
    // Math
    // ========================================================================

    registry.register(NodeType {
        id: "Add".to_string(),
        name: "Add".to_string(),
        category: NodeCategory::Math,
        description: "A + B".to_string(),
        kind: NodeKind::Add,
        inputs: vec![
            InputPort::zeroed("A", DataType::Vec2f),
            InputPort::zeroed("B", DataType::Vec2f),
        ],
        outputs: vec![OutputPort::new("result", DataType::Vec2f)],
    });

    registry.register(NodeType {
        id: "Subtract".to_string(),
        name: "Subtract".to_string(),
        category: NodeCategory::Math,
        description: "A - B".to_string(),
        kind: NodeKind::Subtract,
        inputs: vec![
            InputPort::zeroed("A", DataType::Vec2f),
            InputPort::zeroed("B", DataType::Vec2f),
        ],
        outputs: vec![OutputPort::new("result", DataType::Vec2f)],
    });

    registry.register(NodeType {
        id: "Multiply".to_string(),
        name: "Multiply".to_string(),
        category: NodeCategory::Math,
        description: "Component-wise A * B".to_string(),
        kind: NodeKind::Multiply,
        inputs: vec![
            InputPort::new("A", DataType::Vec4f).with_default(Value::vector(DataType::Vec4f, &[1.0; 4])),
            InputPort::new("B", DataType::Vec4f).with_default(Value::vector(DataType::Vec4f, &[1.0; 4])),
        ],
        outputs: vec![OutputPort::new("result", DataType::Vec4f)],
    });

    registry.register(NodeType {
        id: "Power".to_string(),
        name: "Power".to_string(),
        category: NodeCategory::Math,
        description: "Raise base to an exponent".to_string(),
        kind: NodeKind::Power,
        inputs: vec![
            InputPort::new("base", DataType::Float).with_default(Value::float(1.0)),
            InputPort::new("exponent", DataType::Float).with_default(Value::float(1.0)),
        ],
        outputs: vec![OutputPort::new("result", DataType::Float)],
    });

    registry.register(NodeType {
        id: "Fraction".to_string(),
        name: "Fraction".to_string(),
        category: NodeCategory::Math,
        description: "Fractional part of each component".to_string(),
        kind: NodeKind::Fraction,
        inputs: vec![InputPort::zeroed("input", DataType::Vec2f)],
        outputs: vec![OutputPort::new("result", DataType::Vec2f)],
    });

    registry.register(NodeType {
        id: "Lerp".to_string(),
        name: "Lerp".to_string(),
        category: NodeCategory::Math,
        description: "Linear interpolation between A and B".to_string(),
        kind: NodeKind::Lerp,
        inputs: vec![
            InputPort::zeroed("A", DataType::Vec4f),
            InputPort::new("B", DataType::Vec4f).with_default(Value::vector(DataType::Vec4f, &[1.0; 4])),
            InputPort::new("t", DataType::Float).with_default(Value::float(0.5)),
        ],
        outputs: vec![OutputPort::new("result", DataType::Vec4f)],
    });

    // ========================================================================
    // Vector
    // ========================================================================

    registry.register(NodeType {
        id: "Split".to_string(),
        name: "Split".to_string(),
        category: NodeCategory::Vector,
        description: "Separate a color into its channels".to_string(),
        kind: NodeKind::Split,
        inputs: vec![InputPort::zeroed("input", DataType::Vec4f)],
        outputs: vec![
            OutputPort::new("r", DataType::Float),
            OutputPort::new("g", DataType::Float),
            OutputPort::new("b", DataType::Float),
            OutputPort::new("a", DataType::Float),
        ],
    });

    registry.register(NodeType {
        id: "Combine".to_string(),
        name: "Combine".to_string(),
        category: NodeCategory::Vector,
        description: "Build a color from channels".to_string(),
        kind: NodeKind::Combine,
        inputs: vec![
            InputPort::zeroed("r", DataType::Float),
            InputPort::zeroed("g", DataType::Float),
            InputPort::zeroed("b", DataType::Float),
            InputPort::new("a", DataType::Float).with_default(Value::float(1.0)),
        ],
        outputs: vec![OutputPort::new("rgba", DataType::Vec4f)],
    });

    // ========================================================================
    // Procedural
    // ========================================================================

    registry.register(NodeType {
        id: "Twirl".to_string(),
        name: "Twirl".to_string(),
        category: NodeCategory::Procedural,
        description: "Swirl UV coordinates around a center".to_string(),
        kind: NodeKind::Twirl,
        inputs: vec![
            InputPort::new("uv", DataType::Uv).with_default(Value::uv()),
            InputPort::new("center", DataType::Vec2f).with_default(Value::vector(DataType::Vec2f, &[0.5, 0.5])),
            InputPort::new("strength", DataType::Float).with_default(Value::float(10.0)),
            InputPort::zeroed("offset", DataType::Vec2f),
        ],
        outputs: vec![OutputPort::new("result", DataType::Vec2f)],
    });

    registry.register(NodeType {
        id: "Voronoi".to_string(),
        name: "Voronoi".to_string(),
        category: NodeCategory::Procedural,
        description: "Cellular noise distance".to_string(),
        kind: NodeKind::Voronoi,
        inputs: vec![
            InputPort::new("uv", DataType::Uv).with_default(Value::uv()),
            InputPort::new("angleOffset", DataType::Float).with_default(Value::float(2.0)),
            InputPort::new("density", DataType::Float).with_default(Value::float(5.0)),
        ],
        outputs: vec![OutputPort::new("result", DataType::Float)],
    });

    registry.register(NodeType {
        id: "TileAndScroll".to_string(),
        name: "Tile and Scroll".to_string(),
        category: NodeCategory::Procedural,
        description: "Tile UV coordinates and scroll them over time".to_string(),
        kind: NodeKind::TileAndScroll,
        inputs: vec![
            InputPort::new("uv", DataType::Uv).with_default(Value::uv()),
            InputPort::new("tile", DataType::Vec2f).with_default(Value::vector(DataType::Vec2f, &[1.0, 1.0])),
            InputPort::zeroed("scroll", DataType::Vec2f),
        ],
        outputs: vec![OutputPort::new("result", DataType::Vec2f)],
    });

    // ========================================================================
    // Texture
    // ========================================================================

    registry.register(NodeType {
        id: "SampleTexture".to_string(),
        name: "Sample Texture".to_string(),
        category: NodeCategory::Texture,
        description: "Sample a texture property at UV coordinates".to_string(),
        kind: NodeKind::SampleTexture {
            sampler: SamplerDescriptor::default(),
            sampler_name: None,
        },
        inputs: vec![
            InputPort::new("texture", DataType::Texture2D),
            InputPort::new("uv", DataType::Uv).with_default(Value::uv()),
        ],
        outputs: vec![OutputPort::new("rgba", DataType::Vec4f)],
    });

    // ========================================================================
    // Lighting
    // ========================================================================

    registry.register(NodeType {
        id: "PhongShading".to_string(),
        name: "Phong Shading".to_string(),
        category: NodeCategory::Lighting,
        description: "Shade a color with the scene's directional light".to_string(),
        kind: NodeKind::PhongShading,
        inputs: vec![InputPort::new("color", DataType::Vec4f)
            .with_default(Value::vector(DataType::Vec4f, &[0.8, 0.8, 0.8, 1.0]))],
        outputs: vec![OutputPort::new("rgba", DataType::Vec4f)],
    });

    registry
}
