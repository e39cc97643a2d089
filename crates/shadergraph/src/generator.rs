// SPDX-License-Identifier: MIT OR Apache-2.0
//! Stage code generation.
//!
//! The generator walks from the display sink toward the producers, giving
//! each node a priority equal to the longest path from it to the sink. Nodes
//! are then emitted from the highest priority down so that every expression
//! appears after the expressions it reads.

use crate::graph::StageGraph;
use crate::node::{NodeHandle, NodeId, NodeKind};
use crate::property::Property;
use crate::value::{SamplerDescriptor, Value, ValueData};
use std::collections::VecDeque;
use std::sync::Arc;

/// Generated fragment body and the properties it reads
#[derive(Debug, Clone, Default)]
pub struct StageCode {
    /// Statements, producers before consumers, ending with the sink's return
    pub body: String,
    /// Properties referenced by the body, in discovery order, including
    /// synthesized samplers
    pub properties: Vec<Arc<Property>>,
}

/// Error during generation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    /// The graph feeding the sink contains a cycle
    #[error("Graph contains a cycle through node {id}")]
    CycleDetected {
        /// A node on the cycle
        id: NodeId,
    },
}

/// Result type for generation
pub type Result<T> = std::result::Result<T, GenerateError>;

/// State threaded through one generation pass
#[derive(Debug, Default)]
struct GenerationContext {
    properties: Vec<Arc<Property>>,
    next_sampler_id: u32,
    next_var_id: u32,
}

impl GenerationContext {
    /// Record a property, once per identity
    fn use_property(&mut self, property: &Arc<Property>) {
        if !self.properties.iter().any(|p| Arc::ptr_eq(p, property)) {
            self.properties.push(Arc::clone(property));
        }
    }

    /// Name of a sampler binding matching the descriptor, created if needed
    fn sampler_for(&mut self, sampler: &SamplerDescriptor) -> String {
        let key = sampler.key();
        let existing = self.properties.iter().find(|p| {
            matches!(p.value.data(), ValueData::Sampler(s) if s.key() == key)
        });

        if let Some(property) = existing {
            return property.name.clone();
        }

        let name = format!("sampler{}", self.next_sampler_id);
        self.next_sampler_id += 1;
        self.properties
            .push(Property::shared(name.clone(), Value::sampler(sampler.clone())));
        name
    }

    fn next_var_name(&mut self) -> String {
        let name = format!("v{}", self.next_var_id);
        self.next_var_id += 1;
        name
    }
}

/// Generate the fragment body for a stage graph.
///
/// A graph without a display node yields an empty body and no properties.
/// Transient node and edge state is reset first, so repeated passes over an
/// unchanged graph produce the same output.
pub fn generate_stage(graph: &mut StageGraph) -> Result<StageCode> {
    graph.reset_generation_state();

    let Some(sink) = graph.sink() else {
        tracing::debug!("No display node, nothing to generate");
        return Ok(StageCode::default());
    };

    let mut ctx = GenerationContext::default();
    assign_priorities(graph, sink, &mut ctx)?;

    let mut visited: Vec<NodeHandle> = graph
        .node_handles()
        .filter(|h| graph.node(*h).is_some_and(|n| n.priority.is_some()))
        .collect();
    // Stable, so ties keep arena order
    visited.sort_by_key(|h| graph.node(*h).and_then(|n| n.priority));

    // Variables are numbered in the order they appear in the body
    for handle in visited.iter().rev() {
        let declares = graph.node(*handle).is_some_and(|n| n.kind.declares_variable());
        if declares {
            let name = ctx.next_var_name();
            if let Some(node) = graph.node_mut(*handle) {
                node.var_name = Some(name);
            }
        }
    }

    graph.cache_edge_expressions();

    let mut body = String::new();
    for handle in &visited {
        let text = graph.statement(*handle);
        body.insert_str(0, &text);
    }

    tracing::debug!(
        "Generated stage: {} nodes, {} properties",
        visited.len(),
        ctx.properties.len()
    );
    tracing::trace!("Stage body:\n{body}");

    Ok(StageCode {
        body,
        properties: ctx.properties,
    })
}

/// Label every node reachable from the sink with its longest distance to it.
///
/// Nodes are re-queued every time they are reached, and a priority only ever
/// grows. In an acyclic graph no priority can reach the node count, so
/// reaching it means the walk is going around a cycle.
fn assign_priorities(graph: &mut StageGraph, sink: NodeHandle, ctx: &mut GenerationContext) -> Result<()> {
    let ceiling = u32::try_from(graph.node_count()).unwrap_or(u32::MAX);

    if let Some(node) = graph.node_mut(sink) {
        node.priority = Some(0);
    }

    let mut worklist = VecDeque::from([sink]);

    while let Some(handle) = worklist.pop_front() {
        let Some(node) = graph.node(handle) else {
            continue;
        };
        let priority = node.priority.unwrap_or(0);

        match &node.kind {
            // Properties are leaves
            NodeKind::Property(property) => {
                ctx.use_property(property);
                continue;
            }
            NodeKind::SampleTexture { sampler, .. } => {
                let name = ctx.sampler_for(sampler);
                if let Some(NodeKind::SampleTexture { sampler_name, .. }) =
                    graph.node_mut(handle).map(|n| &mut n.kind)
                {
                    *sampler_name = Some(name);
                }
            }
            _ => {}
        }

        let sources: Vec<NodeHandle> = graph
            .node(handle)
            .map(|n| {
                n.inputs
                    .iter()
                    .filter_map(|p| p.edge)
                    .filter_map(|e| graph.edge(e))
                    .map(|e| e.output.node)
                    .collect()
            })
            .unwrap_or_default();

        for source in sources {
            let raised = priority + 1;
            let Some(node) = graph.node_mut(source) else {
                continue;
            };

            if raised >= ceiling {
                tracing::warn!("Cycle detected through node {}", node.id);
                return Err(GenerateError::CycleDetected { id: node.id });
            }

            if node.priority.map_or(true, |p| p < raised) {
                node.priority = Some(raised);
            }
            worklist.push_back(source);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::GraphNode;
    use crate::nodes::create_shader_registry;
    use crate::port::{DataType, PortRef};
    use crate::value::FilterMode;

    struct Fixture {
        graph: StageGraph,
        registry: crate::node::NodeRegistry,
        next_id: NodeId,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                graph: StageGraph::new(),
                registry: create_shader_registry(),
                next_id: 1,
            }
        }

        fn add(&mut self, node_type: &str) -> NodeHandle {
            let node = self.registry.create_node(node_type, self.next_id).unwrap();
            self.next_id += 1;
            self.graph.add_node(node)
        }

        fn add_node(&mut self, node: GraphNode) -> NodeHandle {
            self.next_id += 1;
            self.graph.add_node(node)
        }

        fn connect(&mut self, from: NodeHandle, output: &str, to: NodeHandle, input: &str) {
            let output = self.graph.node(from).unwrap().output_index(output).unwrap();
            let input = self.graph.node(to).unwrap().input_index(input).unwrap();
            self.graph
                .connect(PortRef::new(from, output), PortRef::new(to, input))
                .unwrap();
        }
    }

    #[test]
    fn test_no_sink_yields_empty_code() {
        let mut f = Fixture::new();
        let uv = f.add("uv");
        let fraction = f.add("Fraction");
        f.connect(uv, "uv", fraction, "input");

        let code = generate_stage(&mut f.graph).unwrap();
        assert!(code.body.is_empty());
        assert!(code.properties.is_empty());
    }

    #[test]
    fn test_chain_is_emitted_producers_first() {
        let mut f = Fixture::new();
        let display = f.add("display");
        let uv = f.add("uv");
        let twirl = f.add("Twirl");
        let texture = f.add_node(GraphNode::property(
            10,
            Property::shared("albedo", Value::texture("albedo.png")),
        ));
        let sample = f.add("SampleTexture");
        f.connect(uv, "uv", twirl, "uv");
        f.connect(twirl, "result", sample, "uv");
        f.connect(texture, "albedo", sample, "texture");
        f.connect(sample, "rgba", display, "rgba");

        let code = generate_stage(&mut f.graph).unwrap();
        assert_eq!(
            code.body,
            "let v0 = vertexOut.texcoord;\n\
             let v1 = twirl(v0, vec2f(0.5, 0.5), 10.0, vec2f(0, 0));\n\
             let v2 = textureSample(albedo, sampler0, v1);\n\
             return v2;\n"
        );

        let names: Vec<&str> = code.properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["sampler0", "albedo"]);
    }

    #[test]
    fn test_priority_is_longest_path() {
        // uv feeds the sink's producer directly and through a longer chain
        let mut f = Fixture::new();
        let display = f.add("display");
        let uv = f.add("uv");
        let fraction = f.add("Fraction");
        let add = f.add("Add");
        let combine = f.add("Combine");
        let split = f.add("Split");
        f.connect(uv, "uv", add, "A");
        f.connect(uv, "uv", fraction, "input");
        f.connect(fraction, "result", add, "B");
        f.connect(add, "result", split, "input");
        f.connect(split, "r", combine, "r");
        f.connect(split, "g", combine, "g");
        f.connect(combine, "rgba", display, "rgba");

        let code = generate_stage(&mut f.graph).unwrap();
        let priority = |h: NodeHandle| f.graph.node(h).unwrap().priority;
        assert_eq!(priority(display), Some(0));
        assert_eq!(priority(combine), Some(1));
        assert_eq!(priority(split), Some(2));
        assert_eq!(priority(add), Some(3));
        assert_eq!(priority(fraction), Some(4));
        assert_eq!(priority(uv), Some(5));

        let position = |needle: &str| code.body.find(needle).unwrap();
        assert!(position("vertexOut.texcoord") < position("fract("));
        assert!(position("fract(") < position("+ ("));
        assert!(position("+ (") < position("vec4f(v3.r, v3.g"));
        assert!(code.body.ends_with("return v4;\n"));
    }

    #[test]
    fn test_unreached_nodes_are_not_emitted() {
        let mut f = Fixture::new();
        f.add("display");
        f.add("Voronoi");

        let code = generate_stage(&mut f.graph).unwrap();
        assert_eq!(code.body, "return vec4f(0, 0, 0, 1);\n");
    }

    #[test]
    fn test_samplers_are_shared_by_descriptor() {
        let mut f = Fixture::new();
        let display = f.add("display");
        let lerp = f.add("Lerp");
        let first = f.add("SampleTexture");
        let second = f.add("SampleTexture");
        f.connect(first, "rgba", lerp, "A");
        f.connect(second, "rgba", lerp, "B");
        f.connect(lerp, "result", display, "rgba");

        let code = generate_stage(&mut f.graph).unwrap();
        let samplers: Vec<_> = code
            .properties
            .iter()
            .filter(|p| p.data_type() == DataType::Sampler)
            .collect();
        assert_eq!(samplers.len(), 1);
        assert_eq!(code.body.matches("sampler0").count(), 2);
    }

    #[test]
    fn test_distinct_samplers_get_distinct_bindings() {
        let mut f = Fixture::new();
        let display = f.add("display");
        let lerp = f.add("Lerp");
        let first = f.add("SampleTexture");
        let second = f.add("SampleTexture");
        if let NodeKind::SampleTexture { sampler, .. } = &mut f.graph.node_mut(second).unwrap().kind {
            sampler.mag_filter = Some(FilterMode::Nearest);
        }
        f.connect(first, "rgba", lerp, "A");
        f.connect(second, "rgba", lerp, "B");
        f.connect(lerp, "result", display, "rgba");

        let code = generate_stage(&mut f.graph).unwrap();
        let names: Vec<&str> = code.properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["sampler0", "sampler1"]);
    }

    #[test]
    fn test_sampler_property_from_table_is_reused() {
        let mut f = Fixture::new();
        let display = f.add("display");
        let multiply = f.add("Multiply");
        let sample = f.add("SampleTexture");
        let linear = Property::shared("linearSampler", Value::sampler(SamplerDescriptor::default()));
        let albedo = Property::shared("albedo", Value::texture("albedo.png"));
        let sampler_node = f.add_node(GraphNode::property(20, linear));
        let texture_node = f.add_node(GraphNode::property(21, albedo));
        // Reaches the sampler property before the texture node
        f.connect(sampler_node, "linearSampler", multiply, "A");
        f.connect(sample, "rgba", multiply, "B");
        f.connect(texture_node, "albedo", sample, "texture");
        f.connect(multiply, "result", display, "rgba");

        let code = generate_stage(&mut f.graph).unwrap();
        assert!(code.body.contains("textureSample(albedo, linearSampler, vertexOut.texcoord)"));
        let mut names: Vec<&str> = code.properties.iter().map(|p| p.name.as_str()).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["albedo", "linearSampler"]);
    }

    #[test]
    fn test_shared_property_recorded_once() {
        let mut f = Fixture::new();
        let display = f.add("display");
        let multiply = f.add("Multiply");
        let tint = Property::shared("tint", Value::vector(DataType::Vec4f, &[1.0, 0.5, 0.5, 1.0]));
        let a = f.add_node(GraphNode::property(20, Arc::clone(&tint)));
        let b = f.add_node(GraphNode::property(21, Arc::clone(&tint)));
        f.connect(a, "tint", multiply, "A");
        f.connect(b, "tint", multiply, "B");
        f.connect(multiply, "result", display, "rgba");

        let code = generate_stage(&mut f.graph).unwrap();
        assert_eq!(code.properties.len(), 1);
        assert!(code.body.contains("properties.tint * (properties.tint)"));
    }

    #[test]
    fn test_generation_is_idempotent() {
        let mut f = Fixture::new();
        let display = f.add("display");
        let sample = f.add("SampleTexture");
        let tile = f.add("TileAndScroll");
        let time = f.add("time");
        f.connect(time, "time", tile, "scroll");
        f.connect(tile, "result", sample, "uv");
        f.connect(sample, "rgba", display, "rgba");

        let first = generate_stage(&mut f.graph).unwrap();
        let second = generate_stage(&mut f.graph).unwrap();
        assert_eq!(first.body, second.body);
        assert_eq!(first.properties.len(), second.properties.len());
        assert_eq!(second.properties[0].name, "sampler0");
    }

    #[test]
    fn test_edges_cache_source_expressions() {
        let mut f = Fixture::new();
        let display = f.add("display");
        let split = f.add("Split");
        let combine = f.add("Combine");
        f.connect(split, "b", combine, "r");
        f.connect(combine, "rgba", display, "rgba");

        generate_stage(&mut f.graph).unwrap();
        let cached: Vec<Option<&str>> = f
            .graph
            .edges()
            .map(|e| e.cached_var_name.as_deref())
            .collect();
        assert_eq!(cached, vec![Some("v0.b"), Some("v1")]);
    }

    #[test]
    fn test_cycle_is_reported() {
        let mut f = Fixture::new();
        let display = f.add("display");
        let add = f.add("Add");
        let fraction = f.add("Fraction");
        let combine = f.add("Combine");
        let split = f.add("Split");
        f.connect(add, "result", fraction, "input");
        f.connect(fraction, "result", add, "A");
        f.connect(split, "r", combine, "r");
        f.connect(add, "result", split, "input");
        f.connect(combine, "rgba", display, "rgba");

        let result = generate_stage(&mut f.graph);
        assert!(matches!(result, Err(GenerateError::CycleDetected { .. })));
    }
}
