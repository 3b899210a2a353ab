//! Per-vertex data sent to the GPU.
//!
//! Each sprite quad contributes six [`SpriteVertex`] values (two triangles,
//! no index buffer). The struct is `#[repr(C)]` with `bytemuck` Pod/Zeroable
//! so the frame's vertex array can be cast to bytes for upload without a
//! copy.
//!
//! ```text
//! SpriteVertex (20 bytes per vertex)
//! ┌──────────────┬──────────────┬──────────────┐
//! │ position     │ uv           │ color        │
//! │ [f32; 2]     │ [f32; 2]     │ [u8; 4]      │
//! │ offset 0     │ offset 8     │ offset 16    │
//! │ location(0)  │ location(1)  │ location(2)  │
//! └──────────────┴──────────────┴──────────────┘
//! ```
//!
//! Color is packed as four unsigned bytes and declared `Unorm8x4`, so the
//! shader receives it already normalized to [0, 1].

use bytemuck::{Pod, Zeroable};

/// One corner of a sprite quad: world-space position, texture coordinate,
/// and packed RGBA color.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct SpriteVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [u8; 4],
}

impl SpriteVertex {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<SpriteVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x2,
            },
            // uv
            wgpu::VertexAttribute {
                offset: 8,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x2,
            },
            // color, normalized to [0, 1] by the vertex fetcher
            wgpu::VertexAttribute {
                offset: 16,
                shader_location: 2,
                format: wgpu::VertexFormat::Unorm8x4,
            },
        ],
    };
}

/// Camera view-projection matrix uploaded as a uniform buffer once per frame.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}
