//! The shader pair and its buffer-layout contract.
//!
//! The vertex/fragment program is generated as WGSL, but the attribute and
//! uniform layout it expects is declared here as typed structs. The particle
//! field fills [`ParticleInstance`] buffers and the render pipeline consumes
//! them through [`QuadVertex::desc`]/[`ParticleInstance::desc`], so the two
//! sides can never disagree about strides, offsets or shader locations.
//!
//! The vertex stage displaces each instance by three independent terms:
//! static jitter scaled by the `randomness` uniform, a slow time-correlated
//! depth drift scaled by `depth`, and the touch-texture reaction pushed along
//! the instance's fixed random angle. The fragment stage draws a soft
//! greyscale dot.

use bytemuck::{Pod, Zeroable};

/// Greyscale weights applied to the sampled color texture, in RGB order.
///
/// These exact luma weights are part of the visual contract; the point size
/// and fragment color both derive from the result.
pub const LUMA_WEIGHTS: [f32; 3] = [0.21, 0.71, 0.07];

/// Rust reference of the shader's greyscale mapping. Channels are in [0, 1].
pub fn luma(r: f32, g: f32, b: f32) -> f32 {
    r * LUMA_WEIGHTS[0] + g * LUMA_WEIGHTS[1] + b * LUMA_WEIGHTS[2]
}

/// One corner of the shared quad, instanced once per particle.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    /// Corner position in quad-local units (±0.5, z = 0).
    pub position: [f32; 3],
    /// Corner UV used by the fragment stage for the dot falloff.
    pub uv: [f32; 2],
}

impl QuadVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Per-particle instance attributes.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ParticleInstance {
    /// Particle position in image pixel space (z = 0 at rest).
    pub offset: [f32; 3],
    /// Fixed displacement direction in radians, [0, π).
    pub angle: f32,
    /// Source pixel index, used only as a per-particle random seed.
    pub pindex: f32,
}

impl ParticleInstance {
    const ATTRIBS: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![2 => Float32x3, 3 => Float32, 4 => Float32];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ParticleInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Uniform block shared by both shader stages.
///
/// Layout must match the WGSL `Uniforms` struct: two mat4x4, a vec2, four
/// scalars, padded to the struct's 16-byte-aligned size.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct Uniforms {
    pub projection: [[f32; 4]; 4],
    pub model_view: [[f32; 4]; 4],
    pub texture_size: [f32; 2],
    pub time: f32,
    pub randomness: f32,
    pub depth: f32,
    pub size: f32,
    pub _padding: [f32; 2],
}

/// Generate the WGSL source for the reveal shader pair.
pub fn shader_source() -> String {
    let [luma_r, luma_g, luma_b] = LUMA_WEIGHTS;

    format!(
        r#"struct Uniforms {{
    projection: mat4x4<f32>,
    model_view: mat4x4<f32>,
    texture_size: vec2<f32>,
    time: f32,
    randomness: f32,
    depth: f32,
    size: f32,
}}

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

@group(1) @binding(0)
var tex_color: texture_2d<f32>;
@group(1) @binding(1)
var tex_color_sampler: sampler;
@group(1) @binding(2)
var tex_touch: texture_2d<f32>;
@group(1) @binding(3)
var tex_touch_sampler: sampler;

fn random(n: f32) -> f32 {{
    return fract(sin(n) * 43758.5453123);
}}

fn snoise(v: vec2<f32>) -> f32 {{
    return fract(sin(dot(v, vec2<f32>(12.9898, 78.233))) * 43758.5453);
}}

struct VertexInput {{
    @location(0) position: vec3<f32>,
    @location(1) uv: vec2<f32>,
    @location(2) offset: vec3<f32>,
    @location(3) angle: f32,
    @location(4) pindex: f32,
}}

struct VertexOutput {{
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) grey: f32,
}}

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {{
    // Color lookup uses the raw offset against the texture size so it stays
    // aligned with the instance grid even if filtering would round a
    // precomputed coordinate differently.
    let puv = in.offset.xy / uniforms.texture_size;
    let tex = textureSampleLevel(tex_color, tex_color_sampler, puv, 0.0);
    let grey = tex.r * {luma_r} + tex.g * {luma_g} + tex.b * {luma_b};

    var displaced = in.offset;
    displaced.x += (random(in.pindex) - 0.5) * uniforms.randomness;
    displaced.y += (random(in.offset.x + in.pindex) - 0.5) * uniforms.randomness;

    let rndz = random(in.pindex) + snoise(vec2<f32>(in.pindex * 0.1, uniforms.time * 0.1));
    displaced.z += rndz * (random(in.pindex) * 2.0 * uniforms.depth);

    // Touch reaction scales with the particle's own depth noise, so
    // depth-jittered particles react more dramatically.
    let t = textureSampleLevel(tex_touch, tex_touch_sampler, puv, 0.0).r;
    displaced.z += t * 20.0 * rndz;
    displaced.x += cos(in.angle) * t * 20.0 * rndz;
    displaced.y += sin(in.angle) * t * 20.0 * rndz;

    let psize = (snoise(vec2<f32>(uniforms.time, in.pindex) * 0.5) + 2.0)
        * max(grey, 0.2)
        * uniforms.size;

    var view_pos = uniforms.model_view * vec4<f32>(displaced, 1.0);
    view_pos.x += in.position.x * psize;
    view_pos.y += in.position.y * psize;

    var out: VertexOutput;
    out.clip_position = uniforms.projection * view_pos;
    out.uv = in.uv;
    out.grey = grey;
    return out;
}}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {{
    let dist = 0.5 - distance(in.uv, vec2<f32>(0.5, 0.5));
    let alpha = smoothstep(0.0, 0.3, dist);
    return vec4<f32>(in.grey, in.grey, in.grey, alpha);
}}
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Validates WGSL code using naga.
    fn validate_wgsl(code: &str) -> Result<(), String> {
        let module = naga::front::wgsl::parse_str(code)
            .map_err(|e| format!("WGSL parse error: {:?}", e))?;

        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        );
        validator
            .validate(&module)
            .map_err(|e| format!("WGSL validation error: {:?}", e))?;

        Ok(())
    }

    #[test]
    fn test_shader_is_valid_wgsl() {
        let source = shader_source();
        validate_wgsl(&source).expect("reveal shader should be valid");
    }

    #[test]
    fn test_luma_of_white_is_sum_of_weights() {
        let g = luma(1.0, 1.0, 1.0);
        assert!((g - 0.99).abs() < 1e-6);
    }

    #[test]
    fn test_luma_of_pure_red() {
        let g = luma(1.0, 0.0, 0.0);
        assert!((g - 0.21).abs() < 1e-6);
    }

    #[test]
    fn test_shader_embeds_luma_weights() {
        let source = shader_source();
        assert!(source.contains("0.21"));
        assert!(source.contains("0.71"));
        assert!(source.contains("0.07"));
    }

    #[test]
    fn test_vertex_layouts() {
        let quad = QuadVertex::desc();
        assert_eq!(quad.array_stride, 20);
        assert_eq!(quad.step_mode, wgpu::VertexStepMode::Vertex);
        assert_eq!(quad.attributes.len(), 2);

        let instance = ParticleInstance::desc();
        assert_eq!(instance.array_stride, 20);
        assert_eq!(instance.step_mode, wgpu::VertexStepMode::Instance);
        assert_eq!(instance.attributes.len(), 3);

        // Shader locations across both buffers must be unique and match the
        // WGSL declarations.
        let mut locations: Vec<u32> = quad
            .attributes
            .iter()
            .chain(instance.attributes.iter())
            .map(|a| a.shader_location)
            .collect();
        locations.sort_unstable();
        assert_eq!(locations, vec![0, 1, 2, 3, 4]);

        let source = shader_source();
        for loc in 0..5 {
            assert!(source.contains(&format!("@location({})", loc)));
        }
    }

    #[test]
    fn test_uniform_block_size() {
        // Two mat4x4 (128) + vec2 (8) + four f32 (16) rounded up to the
        // 16-byte struct alignment WGSL requires.
        assert_eq!(std::mem::size_of::<Uniforms>(), 160);
    }
}
