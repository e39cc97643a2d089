// SPDX-License-Identifier: MIT OR Apache-2.0
//! Stage graphs: arenas of nodes and the edges between their ports.

use crate::connection::{Edge, EdgeHandle};
use crate::node::{GraphNode, NodeHandle, NodeId, NodeKind};
use crate::port::{InputPort, PortRef};

/// Nodes and edges compiled for one shader stage.
///
/// Nodes and edges are never removed, so handles stay valid for the life of
/// the graph.
#[derive(Debug, Clone, Default)]
pub struct StageGraph {
    nodes: Vec<GraphNode>,
    edges: Vec<Edge>,
}

impl StageGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node to the graph
    pub fn add_node(&mut self, node: GraphNode) -> NodeHandle {
        self.nodes.push(node);
        NodeHandle(self.nodes.len() - 1)
    }

    /// Get a node by handle
    pub fn node(&self, handle: NodeHandle) -> Option<&GraphNode> {
        self.nodes.get(handle.0)
    }

    /// Get a mutable node by handle
    pub fn node_mut(&mut self, handle: NodeHandle) -> Option<&mut GraphNode> {
        self.nodes.get_mut(handle.0)
    }

    /// Get all nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter()
    }

    /// Get all node handles in insertion order
    pub fn node_handles(&self) -> impl Iterator<Item = NodeHandle> {
        (0..self.nodes.len()).map(NodeHandle)
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Find a node by its descriptor id
    pub fn find_node(&self, id: NodeId) -> Option<NodeHandle> {
        self.nodes.iter().position(|n| n.id == id).map(NodeHandle)
    }

    /// Largest node id, zero for an empty graph
    pub fn max_id(&self) -> NodeId {
        self.nodes.iter().map(|n| n.id).fold(0, NodeId::max)
    }

    /// The display sink, if any
    pub fn sink(&self) -> Option<NodeHandle> {
        self.nodes
            .iter()
            .position(|n| matches!(n.kind, NodeKind::Display))
            .map(NodeHandle)
    }

    /// Bind an edge from an output port to an input port.
    ///
    /// Port data types are not compared; see
    /// [`check_port_types`](crate::validation::check_port_types).
    pub fn connect(&mut self, output: PortRef, input: PortRef) -> Result<EdgeHandle, ConnectionError> {
        let source = self.node(output.node).ok_or(ConnectionError::NodeNotFound(output.node))?;
        if source.outputs.get(output.port).is_none() {
            return Err(ConnectionError::PortNotFound(output));
        }

        let target = self.node(input.node).ok_or(ConnectionError::NodeNotFound(input.node))?;
        let target_port = target.inputs.get(input.port).ok_or(ConnectionError::PortNotFound(input))?;

        // An input takes at most one edge; the first one wins
        if target_port.is_connected() {
            return Err(ConnectionError::PortAlreadyConnected(input));
        }

        let handle = EdgeHandle(self.edges.len());
        self.edges.push(Edge::new(output, input));
        self.nodes[input.node.0].inputs[input.port].edge = Some(handle);
        Ok(handle)
    }

    /// Get an edge by handle
    pub fn edge(&self, handle: EdgeHandle) -> Option<&Edge> {
        self.edges.get(handle.0)
    }

    /// Get all edges in insertion order
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// Get all edge handles in insertion order
    pub fn edge_handles(&self) -> impl Iterator<Item = EdgeHandle> {
        (0..self.edges.len()).map(EdgeHandle)
    }

    /// Get the number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Get edges involving a node
    pub fn edges_for_node(&self, node: NodeHandle) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.involves_node(node))
    }

    /// Clear the state left by a previous generation pass
    pub fn reset_generation_state(&mut self) {
        for node in &mut self.nodes {
            node.reset();
        }
        for edge in &mut self.edges {
            edge.cached_var_name = None;
        }
    }

    /// Cache the source expression on every edge feeding a visited node
    pub(crate) fn cache_edge_expressions(&mut self) {
        for index in 0..self.edges.len() {
            let edge = &self.edges[index];
            let visited = self
                .node(edge.input.node)
                .is_some_and(|n| n.priority.is_some());
            if visited {
                let expression = self.output_expression(edge.output);
                self.edges[index].cached_var_name = Some(expression);
            }
        }
    }

    /// Expression producing the value of an output port
    pub fn output_expression(&self, output: PortRef) -> String {
        self.node(output.node)
            .map(|n| n.output_expression(output.port))
            .unwrap_or_default()
    }

    /// Expression feeding an input port: the bound edge's source, or the
    /// literal when unbound
    pub fn input_expression(&self, input: &InputPort) -> String {
        match input.edge.and_then(|e| self.edge(e)) {
            Some(edge) => edge
                .cached_var_name
                .clone()
                .unwrap_or_else(|| self.output_expression(edge.output)),
            None => input.value.as_ref().map(|v| v.to_wgsl()).unwrap_or_default(),
        }
    }

    /// The statement a node contributes to the stage body
    pub fn statement(&self, handle: NodeHandle) -> String {
        let Some(node) = self.node(handle) else {
            return String::new();
        };
        let inputs: Vec<String> = node.inputs.iter().map(|p| self.input_expression(p)).collect();
        node.statement(&inputs)
    }
}

/// Stage graphs making up one shader
#[derive(Debug, Clone, Default)]
pub struct ShaderGraph {
    /// Vertex stage; reserved, never compiled
    pub vertex: Option<StageGraph>,
    /// Fragment stage
    pub fragment: Option<StageGraph>,
}

impl ShaderGraph {
    /// Create a new empty shader graph
    pub fn new() -> Self {
        Self::default()
    }
}

/// Error when binding an edge
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// Node not found
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeHandle),

    /// Port not found
    #[error("Port not found: {0:?}")]
    PortNotFound(PortRef),

    /// Input port already has an edge
    #[error("Port already connected: {0:?}")]
    PortAlreadyConnected(PortRef),
}
