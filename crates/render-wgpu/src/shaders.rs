use crate::error::RenderError;
use std::path::Path;

/// WGSL shader for textured, lit cubes.
///
/// Group 0 holds the per-frame camera matrices, group 1 the per-object model
/// matrix (dynamic offset), group 2 the texture and sampler.
pub const CUBE_SHADER: &str = r#"
struct CameraUniforms {
    projection: mat4x4<f32>,
    view: mat4x4<f32>,
};

struct ModelUniforms {
    model: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> camera: CameraUniforms;

@group(1) @binding(0)
var<uniform> model_uniforms: ModelUniforms;

@group(2) @binding(0)
var main_texture: texture_2d<f32>;
@group(2) @binding(1)
var main_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_normal: vec3<f32>,
    @location(1) uv: vec2<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    let model = model_uniforms.model;
    let world_pos = model * vec4<f32>(vertex.position, 1.0);

    var out: VertexOutput;
    out.clip_position = camera.projection * camera.view * world_pos;
    out.world_normal = normalize((model * vec4<f32>(vertex.normal, 0.0)).xyz);
    out.uv = vertex.uv;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let base = textureSample(main_texture, main_sampler, in.uv);
    let light_dir = normalize(vec3<f32>(0.3, 1.0, 0.5));
    let ambient = 0.3;
    let diffuse = max(dot(in.world_normal, light_dir), 0.0);
    let lighting = ambient + diffuse * 0.7;
    return vec4<f32>(base.rgb * lighting, base.a);
}
"#;

/// Vertex entry point every cube shader must export.
pub const VERTEX_ENTRY: &str = "vs_main";
/// Fragment entry point every cube shader must export.
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// A compiled WGSL shader module.
pub struct Shader {
    module: wgpu::ShaderModule,
    label: String,
}

impl Shader {
    /// Compile WGSL source, reporting validation failures as errors instead
    /// of letting wgpu's uncaptured-error handler abort.
    pub fn from_wgsl(
        device: &wgpu::Device,
        label: &str,
        source: &str,
    ) -> Result<Self, RenderError> {
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(RenderError::ShaderCompile {
                label: label.to_string(),
                message: err.to_string(),
            });
        }
        tracing::debug!("compiled shader `{label}`");
        Ok(Self {
            module,
            label: label.to_string(),
        })
    }

    /// Read and compile a WGSL file.
    pub fn from_file(device: &wgpu::Device, path: &Path) -> Result<Self, RenderError> {
        let source = read_source(path)?;
        let label = path.display().to_string();
        Self::from_wgsl(device, &label, &source)
    }

    /// The built-in cube shader, or `path` when given.
    pub fn load(device: &wgpu::Device, path: Option<&Path>) -> Result<Self, RenderError> {
        match path {
            Some(path) => {
                tracing::info!("loading shader override from {}", path.display());
                Self::from_file(device, path)
            }
            None => Self::from_wgsl(device, "cube_shader", CUBE_SHADER),
        }
    }

    pub fn module(&self) -> &wgpu::ShaderModule {
        &self.module
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Load shader source text, checking that the cube entry points are present.
pub fn read_source(path: &Path) -> Result<String, RenderError> {
    let source = std::fs::read_to_string(path).map_err(|source| RenderError::ShaderSource {
        path: path.to_path_buf(),
        source,
    })?;
    for entry in [VERTEX_ENTRY, FRAGMENT_ENTRY] {
        if !source.contains(&format!("fn {entry}")) {
            return Err(RenderError::MissingEntryPoint {
                path: path.to_path_buf(),
                entry,
            });
        }
    }
    Ok(source)
}
