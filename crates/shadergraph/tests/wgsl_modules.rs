// SPDX-License-Identifier: MIT OR Apache-2.0
//! Assembled modules must be accepted by a WGSL front end.

use shadergraph::{generate_material, MaterialDescriptor};

fn parse(source: &str) -> naga::Module {
    match naga::front::wgsl::parse_str(source) {
        Ok(module) => module,
        Err(e) => panic!("WGSL rejected:\n{}\n{source}", e.emit_to_string(source)),
    }
}

fn entry_points(module: &naga::Module) -> Vec<&str> {
    module.entry_points.iter().map(|e| e.name.as_str()).collect()
}

#[test]
fn test_textured_material_parses() {
    let material = MaterialDescriptor::from_json(
        r#"{
            "type": "Mesh",
            "properties": [
                { "name": "albedo", "dataType": "texture2D", "value": "textures/albedo.png" },
                { "name": "tint", "dataType": "vec4f", "value": [1, 0.5, 0.5, 1] }
            ],
            "graph": {
                "fragment": {
                    "nodes": [
                        { "id": 1, "type": "property", "name": "albedo" },
                        { "id": 2, "type": "property", "name": "tint" },
                        { "id": 3, "type": "SampleTexture", "sampler": { "magFilter": "linear", "minFilter": "linear" } },
                        { "id": 4, "type": "Multiply" },
                        { "id": 5, "type": "Split" },
                        { "id": 6, "type": "Combine" },
                        { "id": 7, "type": "display" }
                    ],
                    "edges": [
                        [{ "id": 1, "port": "albedo" }, { "id": 3, "port": "texture" }],
                        [{ "id": 2, "port": "tint" }, { "id": 4, "port": "A" }],
                        [{ "id": 3, "port": "rgba" }, { "id": 4, "port": "B" }],
                        [{ "id": 4, "port": "result" }, { "id": 5, "port": "input" }],
                        [{ "id": 5, "port": "r" }, { "id": 6, "port": "r" }],
                        [{ "id": 5, "port": "g" }, { "id": 6, "port": "g" }],
                        [{ "id": 5, "port": "b" }, { "id": 6, "port": "b" }],
                        [{ "id": 6, "port": "rgba" }, { "id": 7, "port": "rgba" }]
                    ]
                }
            }
        }"#,
    )
    .unwrap();

    let code = generate_material(&material).unwrap();
    let names: Vec<&str> = code.properties.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["tint", "sampler0", "albedo"]);

    let module = parse(&code.source);
    assert_eq!(entry_points(&module), ["vs", "fs"]);
}

#[test]
fn test_lit_procedural_material_parses() {
    let material = MaterialDescriptor::from_json(
        r#"{
            "type": "Lit",
            "lit": true,
            "properties": [{ "name": "sharpness", "dataType": "float", "value": 2 }],
            "graph": {
                "fragment": {
                    "nodes": [
                        { "id": 1, "type": "uv" },
                        { "id": 2, "type": "TileAndScroll", "portValues": [{ "port": "scroll", "value": [0.1, 0] }] },
                        { "id": 3, "type": "Subtract", "portValues": [{ "port": "B", "value": [0.5, 0.5] }] },
                        { "id": 4, "type": "Fraction" },
                        { "id": 5, "type": "Twirl" },
                        { "id": 6, "type": "Voronoi" },
                        { "id": 7, "type": "property", "name": "sharpness" },
                        { "id": 8, "type": "Power" },
                        { "id": 9, "type": "time" },
                        { "id": 10, "type": "Combine" },
                        { "id": 11, "type": "Lerp" },
                        { "id": 12, "type": "PhongShading" },
                        { "id": 13, "type": "display" }
                    ],
                    "edges": [
                        [{ "id": 1, "port": "uv" }, { "id": 2, "port": "uv" }],
                        [{ "id": 1, "port": "uv" }, { "id": 3, "port": "A" }],
                        [{ "id": 3, "port": "result" }, { "id": 4, "port": "input" }],
                        [{ "id": 2, "port": "result" }, { "id": 5, "port": "uv" }],
                        [{ "id": 4, "port": "result" }, { "id": 5, "port": "offset" }],
                        [{ "id": 5, "port": "result" }, { "id": 6, "port": "uv" }],
                        [{ "id": 6, "port": "result" }, { "id": 8, "port": "base" }],
                        [{ "id": 7, "port": "sharpness" }, { "id": 8, "port": "exponent" }],
                        [{ "id": 8, "port": "result" }, { "id": 10, "port": "r" }],
                        [{ "id": 9, "port": "time" }, { "id": 10, "port": "g" }],
                        [{ "id": 6, "port": "result" }, { "id": 10, "port": "b" }],
                        [{ "id": 10, "port": "rgba" }, { "id": 11, "port": "A" }],
                        [{ "id": 11, "port": "result" }, { "id": 12, "port": "color" }],
                        [{ "id": 12, "port": "rgba" }, { "id": 13, "port": "rgba" }]
                    ]
                }
            }
        }"#,
    )
    .unwrap();

    assert!(material.is_lit());
    let code = generate_material(&material).unwrap();
    assert!(code.source.contains("fn phong("));
    assert!(code.source.contains("pow(v5, properties.sharpness)"));

    let module = parse(&code.source);
    assert_eq!(entry_points(&module), ["vs", "fs"]);
    assert!(module.functions.iter().any(|(_, f)| f.name.as_deref() == Some("voronoi")));
}

#[test]
fn test_unlit_template_without_properties_parses() {
    let material = MaterialDescriptor::from_json(
        r#"{
            "type": "Circle",
            "graph": {
                "fragment": {
                    "nodes": [{ "id": 1, "type": "display", "portValues": [{ "port": "rgba", "value": [1, 0, 0, 1] }] }],
                    "edges": []
                }
            }
        }"#,
    )
    .unwrap();

    let code = generate_material(&material).unwrap();
    assert!(code.source.contains("return vec4f(1, 0, 0, 1);"));
    parse(&code.source);
}
