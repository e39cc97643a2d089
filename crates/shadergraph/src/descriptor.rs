// SPDX-License-Identifier: MIT OR Apache-2.0
//! Persisted graph descriptors and the live-graph to descriptor conversion.

use crate::graph::StageGraph;
use crate::node::{NodeId, NodeKind};
use crate::port::DataType;
use crate::value::{SamplerDescriptor, ValueData};
use serde::{Deserialize, Serialize};

/// Descriptor of a whole shader graph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDescriptor {
    /// Vertex stage; reserved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertex: Option<StageDescriptor>,
    /// Fragment stage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fragment: Option<StageDescriptor>,
}

/// Descriptor of one stage graph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageDescriptor {
    /// Nodes
    #[serde(default)]
    pub nodes: Vec<NodeDescriptor>,
    /// Edges
    #[serde(default)]
    pub edges: Vec<EdgeDescriptor>,
}

/// Descriptor of a node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDescriptor {
    /// Node id
    pub id: NodeId,
    /// Type tag
    #[serde(rename = "type")]
    pub node_type: String,
    /// Editor x position
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    /// Editor y position
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    /// Property name, for `property` nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Literal type, for `value` nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<DataType>,
    /// Literal, for `value` nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<ValueData>,
    /// Literals for unconnected inputs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port_values: Option<Vec<PortValueDescriptor>>,
    /// Sampler, for `SampleTexture` nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sampler: Option<SamplerDescriptor>,
}

impl NodeDescriptor {
    /// Create a descriptor with just an id and a type tag
    pub fn new(id: NodeId, node_type: impl Into<String>) -> Self {
        Self {
            id,
            node_type: node_type.into(),
            ..Default::default()
        }
    }
}

/// Literal assigned to an input port
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortValueDescriptor {
    /// Input port name
    pub port: String,
    /// Raw literal
    pub value: ValueData,
}

/// One end of an edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointDescriptor {
    /// Node id
    pub id: NodeId,
    /// Port name
    pub port: String,
}

impl EndpointDescriptor {
    /// Create an endpoint
    pub fn new(id: NodeId, port: impl Into<String>) -> Self {
        Self {
            id,
            port: port.into(),
        }
    }
}

/// An edge, persisted as `[output, input]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeDescriptor(pub EndpointDescriptor, pub EndpointDescriptor);

impl EdgeDescriptor {
    /// Create an edge from `(id, port)` pairs
    pub fn new(output: (NodeId, &str), input: (NodeId, &str)) -> Self {
        Self(
            EndpointDescriptor::new(output.0, output.1),
            EndpointDescriptor::new(input.0, input.1),
        )
    }
}

/// Describe a live stage graph as a fragment-stage graph descriptor
pub fn create_descriptor(graph: &StageGraph) -> GraphDescriptor {
    let nodes = graph
        .nodes()
        .map(|node| {
            let mut descriptor = NodeDescriptor {
                x: Some(node.position[0]),
                y: Some(node.position[1]),
                ..NodeDescriptor::new(node.id, node.type_tag())
            };

            match &node.kind {
                NodeKind::Property(property) => {
                    descriptor.name = Some(property.name.clone());
                    return descriptor;
                }
                NodeKind::Value(value) => {
                    descriptor.data_type = Some(value.data_type());
                    descriptor.value = Some(value.data().clone());
                    return descriptor;
                }
                NodeKind::SampleTexture { sampler, .. } => {
                    descriptor.sampler = Some(sampler.clone());
                }
                _ => {}
            }

            let port_values: Vec<PortValueDescriptor> = node
                .inputs
                .iter()
                .filter(|p| !p.is_connected())
                .filter_map(|p| {
                    p.value.as_ref().map(|value| PortValueDescriptor {
                        port: p.name.clone(),
                        value: value.data().clone(),
                    })
                })
                .collect();
            if !port_values.is_empty() {
                descriptor.port_values = Some(port_values);
            }

            descriptor
        })
        .collect();

    let edges = graph
        .edges()
        .filter_map(|edge| {
            let output = graph.node(edge.output.node)?;
            let input = graph.node(edge.input.node)?;
            Some(EdgeDescriptor(
                EndpointDescriptor::new(output.id, output.outputs.get(edge.output.port)?.name.clone()),
                EndpointDescriptor::new(input.id, input.inputs.get(edge.input.port)?.name.clone()),
            ))
        })
        .collect();

    GraphDescriptor {
        vertex: Some(StageDescriptor::default()),
        fragment: Some(StageDescriptor { nodes, edges }),
    }
}
