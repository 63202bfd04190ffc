use crate::error::RenderError;
use crate::mesh::{GpuMesh, MeshData, Vertex};
use crate::shaders::{FRAGMENT_ENTRY, Shader, VERTEX_ENTRY};
use crate::texture::{DEPTH_FORMAT, Texture};
use bytemuck::{Pod, Zeroable};
use flyview_camera::Camera;
use flyview_common::Scene;
use glam::Mat4;
use std::num::NonZeroU64;
use wgpu::util::DeviceExt;

/// Background clear color.
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.3,
    g: 0.4,
    b: 0.9,
    a: 1.0,
};

/// Edge length of every cube.
pub const CUBE_SIZE: f32 = 0.5;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct CameraUniforms {
    projection: [[f32; 4]; 4],
    view: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct ModelUniforms {
    model: [[f32; 4]; 4],
}

const MODEL_SIZE: u64 = std::mem::size_of::<ModelUniforms>() as u64;

/// Round `size` up to the next multiple of `alignment`.
pub fn align_to(size: u64, alignment: u64) -> u64 {
    let alignment = alignment.max(1);
    size.div_ceil(alignment) * alignment
}

/// Number of model slots that fit in one buffer of at most `max_buffer_size`
/// bytes, never less than one.
pub fn model_capacity(requested: usize, stride: u64, max_buffer_size: u64) -> usize {
    let fits = (max_buffer_size / stride.max(1)).min(usize::MAX as u64) as usize;
    requested.clamp(1, fits.max(1))
}

/// Draws the cube scene: one pipeline, one mesh, one draw call per cube.
///
/// Projection and view are uploaded once per frame; each cube's model matrix
/// sits in a slot of a shared uniform buffer selected by dynamic offset.
pub struct CubeRenderer {
    pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    model_buffer: wgpu::Buffer,
    model_bind_group: wgpu::BindGroup,
    model_stride: u64,
    capacity: usize,
    texture_bind_group: wgpu::BindGroup,
    _texture: Texture,
    cube: GpuMesh,
    depth_texture: wgpu::TextureView,
    surface_format: wgpu::TextureFormat,
}

impl CubeRenderer {
    /// Build the pipeline for `shader`, with room for `capacity` cubes.
    ///
    /// A shader whose bindings or vertex inputs do not match the cube layout
    /// is reported as [`RenderError::Pipeline`].
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        shader: &Shader,
        capacity: usize,
    ) -> Result<Self, RenderError> {

        // Camera uniforms (group 0)
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("camera_buffer"),
            contents: bytemuck::bytes_of(&CameraUniforms {
                projection: Mat4::IDENTITY.to_cols_array_2d(),
                view: Mat4::IDENTITY.to_cols_array_2d(),
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let camera_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("camera_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("camera_bind_group"),
            layout: &camera_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        // Per-object model matrices (group 1)
        let alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        let model_stride = align_to(MODEL_SIZE, alignment);
        let max_buffer_size = device.limits().max_buffer_size;
        let requested = capacity;
        let capacity = model_capacity(requested, model_stride, max_buffer_size);
        if capacity < requested {
            tracing::warn!(
                "{requested} cubes need more than {max_buffer_size} bytes of model data; \
                 only {capacity} will be drawn"
            );
        }
        let model_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("model_buffer"),
            size: model_stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let model_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("model_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: NonZeroU64::new(MODEL_SIZE),
                },
                count: None,
            }],
        });
        let model_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("model_bind_group"),
            layout: &model_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &model_buffer,
                    offset: 0,
                    size: NonZeroU64::new(MODEL_SIZE),
                }),
            }],
        });

        // Texture + sampler (group 2)
        let texture = Texture::checker(device, queue);
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        let texture_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("texture_bind_group"),
            layout: &texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("cube_pipeline_layout"),
            bind_group_layouts: &[&camera_layout, &model_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("cube_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: shader.module(),
                entry_point: Some(VERTEX_ENTRY),
                compilation_options: Default::default(),
                buffers: &[Vertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: shader.module(),
                entry_point: Some(FRAGMENT_ENTRY),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(RenderError::Pipeline {
                label: shader.label().to_string(),
                message: err.to_string(),
            });
        }

        let cube = GpuMesh::upload(device, "cube", &MeshData::cube(CUBE_SIZE));
        let depth_texture = Texture::create_depth(device, width, height);

        tracing::debug!(
            "cube renderer ready: shader `{}`, {} indices per cube, \
             {capacity} model slots of {model_stride} bytes",
            shader.label(),
            cube.index_count()
        );

        Ok(Self {
            pipeline,
            camera_buffer,
            camera_bind_group,
            model_buffer,
            model_bind_group,
            model_stride,
            capacity,
            texture_bind_group,
            _texture: texture,
            cube,
            depth_texture,
            surface_format,
        })
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Texture::create_depth(device, width, height);
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Render one frame: clear, then draw every cube with its model matrix.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        camera: &Camera,
        scene: &Scene,
    ) {
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&CameraUniforms {
                projection: camera.projection_matrix().to_cols_array_2d(),
                view: camera.view_matrix().to_cols_array_2d(),
            }),
        );

        if scene.len() > self.capacity {
            tracing::warn!(
                "scene has {} cubes but only {} model slots; extra cubes skipped",
                scene.len(),
                self.capacity
            );
        }
        let count = scene.len().min(self.capacity);
        let models = pack_models(scene.model_matrices().take(count), self.model_stride);
        if !models.is_empty() {
            queue.write_buffer(&self.model_buffer, 0, &models);
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.camera_bind_group, &[]);
            pass.set_bind_group(2, &self.texture_bind_group, &[]);
            for i in 0..count {
                let offset = (i as u64 * self.model_stride) as u32;
                pass.set_bind_group(1, &self.model_bind_group, &[offset]);
                self.cube.draw(&mut pass);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }
}

/// Lay model matrices out at `stride`-byte slots, zero-padding between them.
fn pack_models(models: impl Iterator<Item = Mat4>, stride: u64) -> Vec<u8> {
    let stride = stride as usize;
    let mut bytes = Vec::new();
    for model in models {
        let start = bytes.len();
        bytes.extend_from_slice(bytemuck::bytes_of(&ModelUniforms {
            model: model.to_cols_array_2d(),
        }));
        bytes.resize(start + stride, 0);
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_to_rounds_up() {
        assert_eq!(align_to(64, 256), 256);
        assert_eq!(align_to(256, 256), 256);
        assert_eq!(align_to(257, 256), 512);
        assert_eq!(align_to(64, 0), 64);
    }

    #[test]
    fn pack_models_places_each_matrix_at_its_slot() {
        let a = Mat4::from_translation(glam::Vec3::new(1.0, 2.0, 3.0));
        let b = Mat4::from_scale(glam::Vec3::splat(2.0));
        let bytes = pack_models([a, b].into_iter(), 256);
        assert_eq!(bytes.len(), 512);

        let first: [f32; 16] = bytemuck::pod_read_unaligned(&bytes[..64]);
        assert_eq!(first, a.to_cols_array());
        let second: [f32; 16] = bytemuck::pod_read_unaligned(&bytes[256..320]);
        assert_eq!(second, b.to_cols_array());
        assert!(bytes[64..256].iter().all(|&byte| byte == 0));
    }

    #[test]
    fn model_capacity_fits_buffer_limit() {
        let limit = wgpu::Limits::default().max_buffer_size;
        let fits = (limit / 256) as usize;
        assert_eq!(model_capacity(4, 256, limit), 4);
        assert_eq!(model_capacity(fits, 256, limit), fits);
        assert_eq!(model_capacity(fits + 1, 256, limit), fits);
        assert_eq!(model_capacity(0, 256, limit), 1);
        assert_eq!(model_capacity(10, 256, 100), 1);
    }

    fn test_device() -> Option<(wgpu::Device, wgpu::Queue)> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter =
            pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions::default()))?;
        pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("test_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .ok()
    }

    #[test]
    fn mismatched_shader_is_a_pipeline_error() {
        let Some((device, queue)) = test_device() else {
            eprintln!("no GPU adapter available, skipping");
            return;
        };
        let source = r#"
@group(0) @binding(0)
var<storage, read> m: array<vec4<f32>>;

@vertex
fn vs_main(@location(5) p: vec3<f32>) -> @builtin(position) vec4<f32> {
    return m[0] + vec4<f32>(p, 1.0);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0);
}
"#;
        let shader = Shader::from_wgsl(&device, "mismatched", source).unwrap();
        let result = CubeRenderer::new(
            &device,
            &queue,
            wgpu::TextureFormat::Rgba8UnormSrgb,
            64,
            64,
            &shader,
            4,
        );
        match result {
            Err(RenderError::Pipeline { label, .. }) => assert_eq!(label, "mismatched"),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("mismatched shader built a pipeline"),
        }
    }

    #[test]
    fn builtin_shader_builds_pipeline() {
        let Some((device, queue)) = test_device() else {
            eprintln!("no GPU adapter available, skipping");
            return;
        };
        let shader = Shader::load(&device, None).unwrap();
        let renderer = CubeRenderer::new(
            &device,
            &queue,
            wgpu::TextureFormat::Rgba8UnormSrgb,
            64,
            64,
            &shader,
            4,
        )
        .unwrap();
        assert_eq!(renderer.capacity(), 4);
    }

    #[test]
    fn pack_models_empty_scene() {
        assert!(pack_models(std::iter::empty(), 256).is_empty());
    }

    #[test]
    fn scene_models_fit_default_stride() {
        let scene = Scene::default();
        let bytes = pack_models(scene.model_matrices(), align_to(MODEL_SIZE, 256));
        assert_eq!(bytes.len(), scene.len() * 256);
    }
}
