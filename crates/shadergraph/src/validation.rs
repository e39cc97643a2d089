// SPDX-License-Identifier: MIT OR Apache-2.0
//! Opt-in port type diagnostics.
//!
//! Edges are bound without comparing port types, and generation trusts the
//! graph. These checks let tooling point at edges whose WGSL would not
//! typecheck before handing the module to a device.

use crate::connection::EdgeHandle;
use crate::graph::StageGraph;
use crate::node::NodeId;
use crate::port::DataType;
use std::fmt;

/// An edge whose output type cannot feed its input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDiagnostic {
    /// Offending edge
    pub edge: EdgeHandle,
    /// Source node id
    pub output_node: NodeId,
    /// Source port name
    pub output_port: String,
    /// Source port type
    pub output_type: DataType,
    /// Target node id
    pub input_node: NodeId,
    /// Target port name
    pub input_port: String,
    /// Target port type
    pub input_type: DataType,
}

impl fmt::Display for TypeDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} ({}) cannot feed {}.{} ({})",
            self.output_node,
            self.output_port,
            self.output_type,
            self.input_node,
            self.input_port,
            self.input_type
        )
    }
}

/// List every edge whose types are incompatible, in edge order
pub fn check_port_types(graph: &StageGraph) -> Vec<TypeDiagnostic> {
    graph
        .edge_handles()
        .filter_map(|handle| {
            let edge = graph.edge(handle)?;
            let source = graph.node(edge.output.node)?;
            let target = graph.node(edge.input.node)?;
            let output = source.outputs.get(edge.output.port)?;
            let input = target.inputs.get(edge.input.port)?;

            if output.data_type.can_connect_to(input.data_type) {
                return None;
            }

            Some(TypeDiagnostic {
                edge: handle,
                output_node: source.id,
                output_port: output.name.clone(),
                output_type: output.data_type,
                input_node: target.id,
                input_port: input.name.clone(),
                input_type: input.data_type,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::create_shader_registry;
    use crate::port::PortRef;

    #[test]
    fn test_texture_into_color_is_flagged() {
        let registry = create_shader_registry();
        let mut graph = StageGraph::new();
        let sample = graph.add_node(registry.create_node("SampleTexture", 1).unwrap());
        let display = graph.add_node(registry.create_node("display", 2).unwrap());
        let multiply = graph.add_node(registry.create_node("Multiply", 3).unwrap());

        // A color cannot stand in for a texture
        graph.connect(PortRef::new(sample, 0), PortRef::new(display, 0)).unwrap();
        graph.connect(PortRef::new(multiply, 0), PortRef::new(sample, 0)).unwrap();

        let diagnostics = check_port_types(&graph);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].input_port, "texture");
        assert_eq!(diagnostics[0].input_type, DataType::Texture2D);
        assert_eq!(
            diagnostics[0].to_string(),
            "3.result (vec4f) cannot feed 1.texture (texture2D)"
        );
    }

    #[test]
    fn test_widening_is_accepted() {
        let registry = create_shader_registry();
        let mut graph = StageGraph::new();
        let uv = graph.add_node(registry.create_node("uv", 1).unwrap());
        let twirl = graph.add_node(registry.create_node("Twirl", 2).unwrap());
        let time = graph.add_node(registry.create_node("time", 3).unwrap());
        let add = graph.add_node(registry.create_node("Add", 4).unwrap());

        graph.connect(PortRef::new(uv, 0), PortRef::new(twirl, 0)).unwrap();
        graph.connect(PortRef::new(time, 0), PortRef::new(add, 1)).unwrap();
        graph.connect(PortRef::new(twirl, 0), PortRef::new(add, 0)).unwrap();

        assert!(check_port_types(&graph).is_empty());
    }
}
