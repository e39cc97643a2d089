// SPDX-License-Identifier: MIT OR Apache-2.0
//! Edge definitions for the graph.

use crate::node::NodeHandle;
use crate::port::PortRef;

/// Stable index of an edge within its stage graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeHandle(pub usize);

/// A directed connection from an output port to an input port
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// Source output port
    pub output: PortRef,
    /// Target input port
    pub input: PortRef,
    /// Expression of the source port, resolved during generation
    pub cached_var_name: Option<String>,
}

impl Edge {
    /// Create a new edge
    pub fn new(output: PortRef, input: PortRef) -> Self {
        Self {
            output,
            input,
            cached_var_name: None,
        }
    }

    /// Check if this edge involves a specific node
    pub fn involves_node(&self, node: NodeHandle) -> bool {
        self.output.node == node || self.input.node == node
    }
}
