// SPDX-License-Identifier: MIT OR Apache-2.0
//! Assembly of complete WGSL modules around a generated fragment body.

use crate::generator::{generate_stage, GenerateError, StageCode};
use crate::graph::ShaderGraph;
use crate::property::Property;
use crate::wgsl;
use std::fmt::Write;
use std::sync::Arc;

/// A complete shader module and the properties its bindings expect
#[derive(Debug, Clone, Default)]
pub struct ShaderCode {
    /// WGSL source
    pub source: String,
    /// Properties in binding order
    pub properties: Vec<Arc<Property>>,
}

/// Compile a shader graph into a WGSL module.
///
/// Only the fragment stage is compiled. A graph without one still yields a
/// module, with an empty fragment body.
pub fn generate_shader_code(graph: &mut ShaderGraph, lit: bool) -> Result<ShaderCode, GenerateError> {
    let StageCode { body, properties } = match graph.fragment.as_mut() {
        Some(fragment) => generate_stage(fragment)?,
        None => StageCode::default(),
    };

    let source = assemble(&body, &properties, lit);
    Ok(ShaderCode { source, properties })
}

/// Wrap a fragment body in the shader template.
///
/// Texture and sampler properties become `@group(2)` bindings numbered from
/// zero in property order. The remaining properties are packed into a single
/// `Properties` uniform bound after them.
pub fn assemble(body: &str, properties: &[Arc<Property>], lit: bool) -> String {
    let mut bindings = String::new();
    let mut uniforms = String::new();
    let mut binding = 0;

    for property in properties {
        let wgsl_type = property.data_type().wgsl_type();
        if property.is_binding() {
            let _ = writeln!(
                bindings,
                "@group(2) @binding({binding}) var {}: {wgsl_type};",
                property.name
            );
            binding += 1;
        } else {
            let _ = writeln!(uniforms, "  {}: {wgsl_type},", property.name);
        }
    }

    if !uniforms.is_empty() {
        let _ = writeln!(
            bindings,
            "@group(2) @binding({binding}) var<uniform> properties: Properties;"
        );
        uniforms = format!("struct Properties {{\n{uniforms}}}\n");
    }

    let mut source = String::new();
    source.push_str(wgsl::VERTEX_STRUCT);
    source.push('\n');
    source.push_str(&vertex_out_struct(lit));
    source.push('\n');
    source.push_str(wgsl::COMMON);
    source.push('\n');
    source.push_str(&vertex_entry(lit));
    source.push('\n');

    if !uniforms.is_empty() {
        source.push_str(&uniforms);
        source.push('\n');
    }
    if !bindings.is_empty() {
        source.push_str(&bindings);
        source.push('\n');
    }
    if lit {
        source.push_str(wgsl::PHONG);
        source.push('\n');
    }
    source.push_str(wgsl::TWIRL);
    source.push('\n');
    source.push_str(wgsl::VORONOI);
    source.push('\n');

    let _ = write!(
        source,
        "@fragment\nfn fs(vertexOut: VertexOut) -> @location(0) vec4f\n{{\n{body}}}\n"
    );

    source
}

fn vertex_out_struct(lit: bool) -> String {
    let lit_fields = if lit {
        "  @location(1) fragPos: vec4f,\n  @location(2) normal: vec4f,\n"
    } else {
        ""
    };

    format!(
        "struct VertexOut {{\n  @builtin(position) position: vec4f,\n  @location(0) texcoord: vec2f,\n{lit_fields}}}\n"
    )
}

fn vertex_entry(lit: bool) -> String {
    let lit_outputs = if lit {
        "  output.fragPos = viewMatrix * modelMatrix[instanceIndex] * vert.position;\n  \
         output.normal = viewMatrix * modelMatrix[instanceIndex] * vert.normal;\n"
    } else {
        ""
    };

    format!(
        "@vertex
fn vs(
  @builtin(instance_index) instanceIndex: u32,
  vert: Vertex,
) -> VertexOut
{{
  var output: VertexOut;

  output.position = projectionMatrix * viewMatrix * modelMatrix[instanceIndex] * vert.position;
  output.texcoord = vert.texcoord;
{lit_outputs}
  return output;
}}
"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{SamplerDescriptor, Value};
    use crate::port::DataType;

    #[test]
    fn test_bindings_and_uniforms() {
        let properties = vec![
            Property::shared("albedo", Value::texture("albedo.png")),
            Property::shared("tint", Value::vector(DataType::Vec4f, &[1.0, 0.0, 0.0, 1.0])),
            Property::shared("sampler0", Value::sampler(SamplerDescriptor::default())),
            Property::shared("strength", Value::float(2.0)),
        ];

        let source = assemble("return vec4f(1, 1, 1, 1);\n", &properties, false);

        assert!(source.contains("@group(2) @binding(0) var albedo: texture_2d<f32>;"));
        assert!(source.contains("@group(2) @binding(1) var sampler0: sampler;"));
        assert!(source.contains("@group(2) @binding(2) var<uniform> properties: Properties;"));
        assert!(source.contains("struct Properties {\n  tint: vec4f,\n  strength: f32,\n}"));
    }

    #[test]
    fn test_no_uniform_struct_without_scalar_properties() {
        let properties = vec![Property::shared("albedo", Value::texture("albedo.png"))];
        let source = assemble("", &properties, false);

        assert!(!source.contains("struct Properties"));
        assert!(!source.contains("var<uniform> properties"));
    }

    #[test]
    fn test_fragment_body_is_verbatim() {
        let body = "let v0 = vertexOut.texcoord;\nreturn vec4f(v0, 0, 1);\n";
        let source = assemble(body, &[], false);
        assert!(source.ends_with(&format!("{{\n{body}}}\n")));
    }

    #[test]
    fn test_lit_adds_phong_and_varyings() {
        let unlit = assemble("", &[], false);
        let lit = assemble("", &[], true);

        assert!(!unlit.contains("fn phong("));
        assert!(!unlit.contains("fragPos"));
        assert!(lit.contains("fn phong("));
        assert!(lit.contains("@location(1) fragPos: vec4f,"));
        assert!(lit.contains("output.normal = viewMatrix * modelMatrix[instanceIndex] * vert.normal;"));

        for source in [&unlit, &lit] {
            assert!(source.contains("fn twirl("));
            assert!(source.contains("fn voronoi("));
            assert!(source.contains("@vertex\nfn vs("));
        }
    }

    #[test]
    fn test_missing_fragment_stage() {
        let code = generate_shader_code(&mut ShaderGraph::new(), false).unwrap();
        assert!(code.properties.is_empty());
        assert!(code.source.ends_with("{\n}\n"));
    }
}
