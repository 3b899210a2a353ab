//! Engine context handed to screens each frame.
//!
//! [`Context`] bundles everything a screen needs to update and draw: the GPU
//! context, sprite renderer, texture store, camera, input, timing, and the
//! asset server. It exists once the window and GPU are up, and is passed as
//! `&mut` to every [`Screen`](crate::screen::Screen) callback.

use std::path::Path;

use crate::asset::AssetServer;
use crate::gpu::GpuContext;
use crate::input::InputState;
use crate::render2d::{
    Camera2d, SpriteRenderer, TextureError, TextureHandle, TextureStore,
};
use crate::time::Time;

pub struct Context {
    pub gpu: GpuContext,
    pub renderer: SpriteRenderer,
    pub textures: TextureStore,
    pub camera: Camera2d,
    pub input: InputState,
    pub time: Time,
    pub assets: AssetServer,
}

impl Context {
    /// Load a texture from disk, registering it for hot-reload.
    pub fn load_texture(&mut self, path: impl AsRef<Path>) -> Result<TextureHandle, TextureError> {
        let path = path.as_ref();
        let handle = self.textures.load(&self.gpu, &self.renderer, path)?;
        self.assets.watch_texture(path, handle);
        Ok(handle)
    }

    /// Create a texture from raw RGBA8 pixels (procedural textures).
    pub fn texture_from_rgba8(
        &mut self,
        label: &str,
        width: u32,
        height: u32,
        data: &[u8],
    ) -> TextureHandle {
        self.textures
            .from_rgba8(&self.gpu, &self.renderer, label, width, height, data)
    }

    /// The always-available 1x1 white texture, for solid-color quads.
    pub fn white_texture(&self) -> TextureHandle {
        self.textures.white()
    }

    /// The cursor position unprojected into world coordinates.
    pub fn cursor_world(&self) -> glam::Vec2 {
        self.camera.screen_to_world(self.input.cursor)
    }
}
