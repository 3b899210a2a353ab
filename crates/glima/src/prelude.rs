//! Convenience re-exports — `use glima::prelude::*` for the common items.

pub use glam::{Vec2, Vec3, Vec4};

pub use crate::asset::AssetServer;
pub use crate::context::Context;
pub use crate::frame::Frame;
pub use crate::game::{Game, GameError};
pub use crate::gpu::{GpuContext, GpuError};
pub use crate::input::{Input, InputState, KeyCode, MouseButton};
pub use crate::render2d::{
    Camera2d, Color, Glyph, Rect, RenderBatch, Shader, ShaderError, SortPolicy, SpriteBatch,
    SpriteRenderer, SpriteVertex, TextureError, TextureHandle, TextureStore,
};
pub use crate::screen::{Screen, ScreenList, Transition};
pub use crate::time::{FpsLimiter, Time};
