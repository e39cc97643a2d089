// SPDX-License-Identifier: MIT OR Apache-2.0
//! Reconstruction of live graphs from descriptors.
//!
//! Building never fails. Nodes of unknown type, properties missing from the
//! table, dangling edges and second edges into an input are dropped, so a
//! damaged descriptor still yields the part of the graph that makes sense.

use crate::descriptor::{GraphDescriptor, NodeDescriptor, PortValueDescriptor, StageDescriptor};
use crate::graph::{ShaderGraph, StageGraph};
use crate::node::{GraphNode, NodeId, NodeKind, NodeRegistry};
use crate::nodes::create_shader_registry;
use crate::port::{DataType, PortRef};
use crate::property::Property;
use crate::value::Value;
use std::sync::Arc;

/// Builds stage graphs from descriptors using a node registry
pub struct GraphBuilder {
    registry: NodeRegistry,
}

impl GraphBuilder {
    /// Create a builder over a custom registry
    pub fn new(registry: NodeRegistry) -> Self {
        Self { registry }
    }

    /// Build a shader graph. Only the fragment stage is built.
    pub fn build(&self, descriptor: &GraphDescriptor, properties: &[Arc<Property>]) -> ShaderGraph {
        ShaderGraph {
            vertex: None,
            fragment: descriptor
                .fragment
                .as_ref()
                .map(|stage| self.build_stage(stage, properties)),
        }
    }

    /// Build one stage graph
    pub fn build_stage(&self, descriptor: &StageDescriptor, properties: &[Arc<Property>]) -> StageGraph {
        let mut graph = StageGraph::new();

        for node_descriptor in &descriptor.nodes {
            let mut id = node_descriptor.id;

            // Renumbering keeps the node but edges naming the old id may now
            // resolve to the other node or be dropped.
            if graph.find_node(id).is_some() {
                let Some(renumbered) = graph.max_id().checked_add(1) else {
                    tracing::warn!(
                        "Duplicate node id {id} ({}) and no larger id left, dropping it",
                        node_descriptor.node_type
                    );
                    continue;
                };
                tracing::warn!(
                    "Duplicate node id {id} ({}), renumbered to {renumbered}",
                    node_descriptor.node_type
                );
                id = renumbered;
            }

            let Some(node) = self.create_node(node_descriptor, id, properties) else {
                continue;
            };
            let mut node = node.with_position(
                node_descriptor.x.unwrap_or_default(),
                node_descriptor.y.unwrap_or_default(),
            );

            if let Some(port_values) = &node_descriptor.port_values {
                for port_value in port_values {
                    apply_port_value(&mut node, port_value);
                }
            }

            graph.add_node(node);
        }

        for edge in &descriptor.edges {
            let (output, input) = (&edge.0, &edge.1);

            let resolved = graph.find_node(output.id).zip(graph.find_node(input.id)).and_then(
                |(output_node, input_node)| {
                    let output_port = graph.node(output_node)?.output_index(&output.port)?;
                    let input_port = graph.node(input_node)?.input_index(&input.port)?;
                    Some((PortRef::new(output_node, output_port), PortRef::new(input_node, input_port)))
                },
            );

            let Some((from, to)) = resolved else {
                tracing::debug!(
                    "Dropping edge {}.{} -> {}.{}: endpoint not found",
                    output.id,
                    output.port,
                    input.id,
                    input.port
                );
                continue;
            };

            if let Err(e) = graph.connect(from, to) {
                tracing::debug!(
                    "Dropping edge {}.{} -> {}.{}: {e}",
                    output.id,
                    output.port,
                    input.id,
                    input.port
                );
            }
        }

        graph
    }

    fn create_node(
        &self,
        descriptor: &NodeDescriptor,
        id: NodeId,
        properties: &[Arc<Property>],
    ) -> Option<GraphNode> {
        match descriptor.node_type.as_str() {
            "property" => {
                let name = descriptor.name.as_deref().unwrap_or_default();
                let Some(property) = properties.iter().find(|p| p.name == name) else {
                    tracing::debug!("Dropping node {id}: property '{name}' not found");
                    return None;
                };
                Some(GraphNode::property(id, Arc::clone(property)))
            }
            "value" => {
                let Some(data_type) = descriptor.data_type else {
                    tracing::debug!("Dropping node {id}: value without a data type");
                    return None;
                };
                let value = match &descriptor.value {
                    Some(data) => Value::new(data_type, data.clone()),
                    None => Value::zero(data_type),
                };
                Some(GraphNode::value(id, value))
            }
            node_type => {
                let Some(mut node) = self.registry.create_node(node_type, id) else {
                    tracing::debug!("Dropping node {id}: unknown type '{node_type}'");
                    return None;
                };
                if let (NodeKind::SampleTexture { sampler, .. }, Some(requested)) =
                    (&mut node.kind, &descriptor.sampler)
                {
                    *sampler = requested.clone();
                }
                Some(node)
            }
        }
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new(create_shader_registry())
    }
}

/// Apply a literal onto the input port with the same name
fn apply_port_value(node: &mut GraphNode, port_value: &PortValueDescriptor) {
    let Some(port) = node.input_mut(&port_value.port) else {
        return;
    };

    if port.data_type.is_numeric() {
        port.value = Some(Value::new(port.data_type, port_value.value.clone()));
    } else if port.data_type == DataType::Uv {
        port.value = Some(Value::uv());
    }
}

/// Build a stage graph with the built-in node types
pub fn build_stage_graph(descriptor: &StageDescriptor, properties: &[Arc<Property>]) -> StageGraph {
    GraphBuilder::default().build_stage(descriptor, properties)
}

/// Build a shader graph with the built-in node types
pub fn build_graph(descriptor: &GraphDescriptor, properties: &[Arc<Property>]) -> ShaderGraph {
    GraphBuilder::default().build(descriptor, properties)
}
