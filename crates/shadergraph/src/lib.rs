// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shader graph compiler.
//!
//! Turns node graph descriptors into WGSL modules:
//! - Descriptors are rebuilt into stage graphs of typed nodes and edges
//! - The fragment stage is ordered by distance to its display node
//! - Each node contributes one statement to the fragment body
//! - The body is wrapped in a template with bindings for the properties it reads
//!
//! ## Architecture
//!
//! Graphs are arenas addressed by handles:
//! - [`StageGraph`] owns [`GraphNode`]s and [`Edge`]s
//! - Nodes are a closed set of [`NodeKind`]s instantiated from a [`NodeRegistry`]
//! - [`Property`] values are shared between nodes and the material that owns them
//!
//! Building is lenient and never fails; generation fails only on cycles.

pub mod value;
pub mod port;
pub mod property;
pub mod connection;
pub mod node;
pub mod nodes;
pub mod graph;
pub mod descriptor;
pub mod builder;
pub mod generator;
pub mod wgsl;
pub mod assembler;
pub mod material;
pub mod validation;

pub use assembler::{assemble, generate_shader_code, ShaderCode};
pub use builder::{build_graph, build_stage_graph, GraphBuilder};
pub use connection::{Edge, EdgeHandle};
pub use descriptor::{create_descriptor, EdgeDescriptor, GraphDescriptor, NodeDescriptor, StageDescriptor};
pub use generator::{generate_stage, GenerateError, StageCode};
pub use graph::{ConnectionError, ShaderGraph, StageGraph};
pub use material::{generate_material, generate_shader_module, MaterialDescriptor, MaterialError, ShaderDevice};
pub use node::{GraphNode, NodeHandle, NodeId, NodeKind, NodeRegistry, NodeType};
pub use nodes::create_shader_registry;
pub use port::{DataType, PortRef};
pub use property::{Property, PropertyDescriptor};
pub use validation::{check_port_types, TypeDiagnostic};
pub use value::{SamplerDescriptor, Value, ValueData};
