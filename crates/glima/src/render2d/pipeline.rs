//! # Pipeline — The Full GPU Configuration for Drawing
//!
//! A render pipeline freezes everything the GPU needs to know about how to
//! draw sprites: shaders, vertex layout, blending, primitive topology. Once
//! created it is immutable; the renderer binds it and issues one draw per
//! [`RenderBatch`](super::RenderBatch).
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │ RenderPipeline                                              │
//! │                                                             │
//! │  Shader module ─── vs_main + fs_main from shader.wgsl      │
//! │                                                             │
//! │  Vertex layout ─── SpriteVertex { pos, uv, color }         │
//! │                                                             │
//! │  Bind group layouts                                         │
//! │    group 0: camera uniform (mat4x4, vertex-only)            │
//! │    group 1: texture + sampler (fragment-only)               │
//! │                                                             │
//! │  Blend state ─── ALPHA_BLENDING                             │
//! │    final = src.rgb × src.a + dst.rgb × (1 - src.a)         │
//! │                                                             │
//! │  Primitive ─── TriangleList, no culling                     │
//! │  Depth/stencil ─── None (CPU sort handles ordering)         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! No depth buffer: a semi-transparent sprite writing depth would block
//! sprites behind it from blending. The batch's CPU sort provides ordering
//! instead, so every sprite blends correctly.
//!
//! Hot-reload replaces the pipeline, never the bind group layouts. Layouts
//! define the CPU↔GPU contract that every existing texture bind group was
//! created against; a replacement shader must conform to them or its
//! pipeline is rejected by the validation scope and the old one stays.

use std::path::PathBuf;

use wgpu::util::DeviceExt;

use crate::gpu::GpuContext;

use super::batch::SpriteBatch;
use super::shader::{Shader, ShaderError};
use super::texture::TextureStore;
use super::vertex::{CameraUniform, SpriteVertex};

/// GPU resources for the 2D sprite renderer.
pub struct SpriteRenderer {
    pipeline: wgpu::RenderPipeline,
    camera_bind_group_layout: wgpu::BindGroupLayout,
    texture_bind_group_layout: wgpu::BindGroupLayout,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    sampler: wgpu::Sampler,
    /// Shader source on disk, for hot-reload. `None` when the source file
    /// isn't present at runtime (release builds without source).
    shader_path: Option<PathBuf>,
}

impl SpriteRenderer {
    /// Create the sprite renderer with the built-in sprite shader.
    pub fn new(gpu: &GpuContext) -> Result<Self, ShaderError> {
        let device = &gpu.device;

        let shader = Shader::from_source(gpu, "sprite shader", include_str!("shader.wgsl"))?;

        // Bind group layout 0: camera uniform
        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("camera bind group layout"),
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

        // Bind group layout 1: texture + sampler
        let texture_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("texture bind group layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            multisampled: false,
                            view_dimension: wgpu::TextureViewDimension::D2,
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
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

        let pipeline = build_pipeline(
            gpu,
            &shader,
            &camera_bind_group_layout,
            &texture_bind_group_layout,
        )?;

        // Camera uniform buffer (identity initially)
        let camera_uniform = CameraUniform {
            view_proj: glam::Mat4::IDENTITY.to_cols_array_2d(),
        };
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("camera uniform buffer"),
            contents: bytemuck::cast_slice(&[camera_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("camera bind group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        // Shared sampler for all sprite textures
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("sprite sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        // Locate shader source on disk for hot-reload (dev builds only).
        let shader_path = {
            let p = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
                .join("src")
                .join("render2d")
                .join("shader.wgsl");
            if p.exists() { Some(p) } else { None }
        };

        Ok(Self {
            pipeline,
            camera_bind_group_layout,
            texture_bind_group_layout,
            camera_buffer,
            camera_bind_group,
            sampler,
            shader_path,
        })
    }

    /// Upload a new camera view-projection matrix.
    pub fn update_camera(&self, gpu: &GpuContext, view_proj: glam::Mat4) {
        let uniform = CameraUniform {
            view_proj: view_proj.to_cols_array_2d(),
        };
        gpu.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    /// Draw a finished batch: one `draw` per texture run, all reading from
    /// the batch's shared vertex buffer.
    pub fn render(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        batch: &SpriteBatch,
        textures: &TextureStore,
    ) {
        let Some(vertex_buffer) = batch.vertex_buffer() else {
            return;
        };

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.camera_bind_group, &[]);
        pass.set_vertex_buffer(0, vertex_buffer.slice(..));

        for b in batch.batches() {
            pass.set_bind_group(1, textures.bind_group(b.texture), &[]);
            pass.draw(b.vertex_offset..b.vertex_offset + b.vertex_count, 0..1);
        }
    }

    /// Build a pipeline from a replacement shader and swap it in, keeping
    /// the old pipeline if the new one fails validation.
    pub fn rebuild_pipeline(&mut self, gpu: &GpuContext, shader: &Shader) -> Result<(), ShaderError> {
        let candidate = build_pipeline(
            gpu,
            shader,
            &self.camera_bind_group_layout,
            &self.texture_bind_group_layout,
        )?;
        self.pipeline = candidate;
        Ok(())
    }

    pub(crate) fn texture_bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.texture_bind_group_layout
    }

    pub(crate) fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }

    pub(crate) fn shader_path(&self) -> Option<&PathBuf> {
        self.shader_path.as_ref()
    }
}

/// Create the sprite pipeline inside a validation scope, so a shader whose
/// interface doesn't match the layouts is reported instead of crashing.
fn build_pipeline(
    gpu: &GpuContext,
    shader: &Shader,
    camera_layout: &wgpu::BindGroupLayout,
    texture_layout: &wgpu::BindGroupLayout,
) -> Result<wgpu::RenderPipeline, ShaderError> {
    let pipeline_layout = gpu
        .device
        .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sprite pipeline layout"),
            bind_group_layouts: &[camera_layout, texture_layout],
            push_constant_ranges: &[],
        });

    gpu.device.push_error_scope(wgpu::ErrorFilter::Validation);

    let pipeline = gpu
        .device
        .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("sprite pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader.module,
                entry_point: Some("vs_main"),
                buffers: &[SpriteVertex::LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader.module,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.surface_format(),
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None, // 2D sprites are double-sided
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

    if let Some(err) = pollster::block_on(gpu.device.pop_error_scope()) {
        return Err(ShaderError::Compile {
            label: shader.label.clone(),
            log: err.to_string(),
        });
    }

    Ok(pipeline)
}
