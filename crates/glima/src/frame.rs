//! One frame's render target and command recording.
//!
//! [`Frame`] owns the acquired surface texture, its view, and a command
//! encoder. It owns them outright rather than borrowing the GPU context, so
//! a screen can hold `&mut Context` and `&mut Frame` at the same time.
//!
//! Acquisition can fail ([`wgpu::SurfaceError`]); the frontend maps
//! `Lost`/`Outdated` to a surface reconfigure and retries next frame.

use crate::gpu::GpuContext;
use crate::render2d::{Color, SpriteBatch, SpriteRenderer, TextureStore};

/// An in-progress frame: surface texture, view, and command encoder.
pub struct Frame {
    surface_texture: wgpu::SurfaceTexture,
    view: wgpu::TextureView,
    encoder: wgpu::CommandEncoder,
}

impl Frame {
    /// Acquire the next surface texture and record an initial clear pass.
    pub fn begin(gpu: &GpuContext, clear: Color) -> Result<Self, wgpu::SurfaceError> {
        let surface_texture = gpu.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame encoder"),
            });

        {
            let _clear_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("clear pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: clear.r as f64 / 255.0,
                            g: clear.g as f64 / 255.0,
                            b: clear.b as f64 / 255.0,
                            a: clear.a as f64 / 255.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
        }

        Ok(Self {
            surface_texture,
            view,
            encoder,
        })
    }

    /// Record a sprite pass over whatever has been drawn so far.
    ///
    /// The batch must be ended and uploaded. Callable multiple times per
    /// frame; later passes composite over earlier ones.
    pub fn draw_sprites(
        &mut self,
        renderer: &SpriteRenderer,
        batch: &SpriteBatch,
        textures: &TextureStore,
    ) {
        let mut pass = self.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("sprite pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        renderer.render(&mut pass, batch, textures);
    }

    /// Submit the recorded commands and present the frame.
    pub fn present(self, gpu: &GpuContext) {
        gpu.queue.submit(std::iter::once(self.encoder.finish()));
        self.surface_texture.present();
    }
}
