//! # Texture — Image Data on the GPU
//!
//! Games never hold a `wgpu::Texture` directly. Loading returns a
//! [`TextureHandle`] — a `Copy` index into the [`TextureStore`] — so handles
//! can live in game entities without lifetime headaches, and the store can
//! swap GPU resources underneath them (hot-reload) without anyone noticing.
//!
//! ```text
//! TextureStore
//! ┌───────────────────────────────────────────────┐
//! │ entries: Vec<TextureEntry>                    │
//! │   [0] 1x1 white (default)   ◄── always here  │
//! │   [1] "player.png"                            │
//! │   [2] "tileset.png"                           │
//! │   ...                                         │
//! │                                               │
//! │ path_cache: HashMap<PathBuf, TextureHandle>   │
//! │   "player.png"  → Handle(1)                   │
//! │   "tileset.png" → Handle(2)                   │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! Entry 0 is always a single white pixel. An untextured quad binds it, the
//! fragment shader samples white, and the multiply by vertex color produces
//! a solid rectangle — no separate "untextured" shader path.
//!
//! The store caches by path, so loading the same file twice returns the same
//! handle without a second decode or GPU upload.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use wgpu::util::DeviceExt;

use crate::gpu::GpuContext;

use super::pipeline::SpriteRenderer;

/// A texture could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to read texture '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode texture '{path}': {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Handle to a loaded texture in the [`TextureStore`].
///
/// Ordered by allocation index so the renderer can sort glyphs by texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextureHandle(pub(crate) usize);

impl Default for TextureHandle {
    /// The 1x1 white texture every store holds at index 0.
    fn default() -> Self {
        Self(0)
    }
}

/// Internal entry for a loaded GPU texture.
pub(crate) struct TextureEntry {
    pub bind_group: wgpu::BindGroup,
    pub width: u32,
    pub height: u32,
}

/// Owns every loaded GPU texture and its bind group.
pub struct TextureStore {
    entries: Vec<TextureEntry>,
    path_cache: HashMap<PathBuf, TextureHandle>,
}

impl TextureStore {
    /// Create a new store with a 1x1 white default texture at index 0.
    pub fn new(gpu: &GpuContext, renderer: &SpriteRenderer) -> Self {
        let entry = upload_rgba8(gpu, renderer, "white 1x1", 1, 1, &[255u8, 255, 255, 255]);
        Self {
            entries: vec![entry],
            path_cache: HashMap::new(),
        }
    }

    /// The default 1x1 white texture handle. Always valid.
    pub fn white(&self) -> TextureHandle {
        TextureHandle(0)
    }

    /// Load a texture from disk. Cached by path: loading the same file twice
    /// returns the same handle without a second decode or upload.
    pub fn load(
        &mut self,
        gpu: &GpuContext,
        renderer: &SpriteRenderer,
        path: impl AsRef<Path>,
    ) -> Result<TextureHandle, TextureError> {
        let path = path.as_ref();
        if let Some(&handle) = self.path_cache.get(path) {
            return Ok(handle);
        }

        let bytes = std::fs::read(path).map_err(|source| TextureError::Io {
            path: path.to_owned(),
            source,
        })?;
        let img = image::load_from_memory(&bytes)
            .map_err(|source| TextureError::Decode {
                path: path.to_owned(),
                source,
            })?
            .to_rgba8();
        let (width, height) = img.dimensions();

        let handle = self.insert(upload_rgba8(
            gpu,
            renderer,
            &path.display().to_string(),
            width,
            height,
            &img.into_raw(),
        ));
        self.path_cache.insert(path.to_owned(), handle);
        log::debug!("loaded texture '{}' ({width}x{height}) as {handle:?}", path.display());
        Ok(handle)
    }

    /// Create a texture from raw RGBA8 pixel data. Not path-cached.
    ///
    /// `data` must be exactly `width * height * 4` bytes.
    pub fn from_rgba8(
        &mut self,
        gpu: &GpuContext,
        renderer: &SpriteRenderer,
        label: &str,
        width: u32,
        height: u32,
        data: &[u8],
    ) -> TextureHandle {
        assert_eq!(
            data.len(),
            (width * height * 4) as usize,
            "rgba8 data size does not match {width}x{height}"
        );
        self.insert(upload_rgba8(gpu, renderer, label, width, height, data))
    }

    /// Replace the GPU data behind an existing handle (hot-reload). Every
    /// quad referencing the handle sees the new image next frame.
    pub fn reload(
        &mut self,
        gpu: &GpuContext,
        renderer: &SpriteRenderer,
        handle: TextureHandle,
        path: &Path,
    ) -> Result<(), TextureError> {
        let bytes = std::fs::read(path).map_err(|source| TextureError::Io {
            path: path.to_owned(),
            source,
        })?;
        let img = image::load_from_memory(&bytes)
            .map_err(|source| TextureError::Decode {
                path: path.to_owned(),
                source,
            })?
            .to_rgba8();
        let (width, height) = img.dimensions();
        self.entries[handle.0] = upload_rgba8(
            gpu,
            renderer,
            &path.display().to_string(),
            width,
            height,
            &img.into_raw(),
        );
        Ok(())
    }

    /// The handle previously returned for `path`, if any.
    pub fn handle_for_path(&self, path: &Path) -> Option<TextureHandle> {
        self.path_cache.get(path).copied()
    }

    /// Pixel dimensions of a loaded texture.
    pub fn dimensions(&self, handle: TextureHandle) -> (u32, u32) {
        let entry = &self.entries[handle.0];
        (entry.width, entry.height)
    }

    pub(crate) fn bind_group(&self, handle: TextureHandle) -> &wgpu::BindGroup {
        &self.entries[handle.0].bind_group
    }

    fn insert(&mut self, entry: TextureEntry) -> TextureHandle {
        let handle = TextureHandle(self.entries.len());
        self.entries.push(entry);
        handle
    }
}

fn upload_rgba8(
    gpu: &GpuContext,
    renderer: &SpriteRenderer,
    label: &str,
    width: u32,
    height: u32,
    data: &[u8],
) -> TextureEntry {
    let texture = gpu.device.create_texture_with_data(
        &gpu.queue,
        &wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        wgpu::util::TextureDataOrder::LayerMajor,
        data,
    );

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout: renderer.texture_bind_group_layout(),
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(renderer.sampler()),
            },
        ],
    });

    TextureEntry {
        bind_group,
        width,
        height,
    }
}
