// SPDX-License-Identifier: MIT OR Apache-2.0
//! WGSL snippets shared by every assembled shader.

/// Maximum number of instances per draw; sizes the model matrix array
pub const MAX_INSTANCES: u32 = 1000;

/// Vertex input layout
pub const VERTEX_STRUCT: &str = "struct Vertex {
  @location(0) position: vec4f,
  @location(1) normal: vec4f,
  @location(2) texcoord: vec2f,
}
";

/// Scene uniforms bound by the renderer (groups 0 and 1)
pub const COMMON: &str = "struct Lights {
  directional: vec4f,
  directionalColor: vec4f,
}

@group(0) @binding(0) var<uniform> projectionMatrix: mat4x4f;
@group(0) @binding(1) var<uniform> viewMatrix: mat4x4f;
@group(0) @binding(2) var<uniform> time: f32;
@group(0) @binding(3) var<uniform> pointLights: Lights;

@group(1) @binding(0) var<uniform> modelMatrix: array<mat4x4f, 1000>;
";

/// Phong shading against the scene's directional light
pub const PHONG: &str = "fn phong(fragPos: vec4f, normal: vec4f, color: vec4f) -> vec4f
{
  var ambientStrength = f32(0.1);
  var specularStrength = 0.5;
  var shininess = 32.0;

  var normal2 = normalize(normal);
  var viewDir = normalize(-fragPos);

  var lightColor = pointLights.directionalColor;
  var lightDir = normalize(pointLights.directional);
  var reflectDir = reflect(-lightDir, normal2);

  var diffuse = max(dot(normal2, lightDir), 0.0);
  var specular = specularStrength * pow(max(dot(viewDir, reflectDir), 0.0), shininess);

  return (ambientStrength + diffuse + specular) * lightColor * color;
}
";

/// Rotate UVs around a center by an angle proportional to the distance
pub const TWIRL: &str = "fn twirl(uv: vec2f, center: vec2f, strength: f32, offset: vec2f) -> vec2f
{
  let delta = uv - center;
  let angle = strength * length(delta);
  let x = cos(angle) * delta.x - sin(angle) * delta.y;
  let y = sin(angle) * delta.x + cos(angle) * delta.y;
  return vec2f(x + center.x + offset.x, y + center.y + offset.y);
}
";

/// Distance to the nearest cell point of a jittered grid
pub const VORONOI: &str = "fn voronoiRandomVector(uv: vec2f, offset: f32) -> vec2f
{
  let m = mat2x2f(15.27, 47.63, 99.41, 89.98);
  let r = fract(sin(m * uv) * 46839.32);
  return vec2f(sin(r.y * offset) * 0.5 + 0.5, cos(r.x * offset) * 0.5 + 0.5);
}

fn voronoi(uv: vec2f, angleOffset: f32, density: f32) -> f32
{
  let g = floor(uv * density);
  let f = fract(uv * density);
  var result = 8.0;

  for (var y = -1; y <= 1; y += 1) {
    for (var x = -1; x <= 1; x += 1) {
      let lattice = vec2f(f32(x), f32(y));
      let offset = voronoiRandomVector(lattice + g, angleOffset);
      let d = distance(lattice + offset, f);
      result = min(result, d);
    }
  }

  return result;
}
";
