//! # Render2d — Batched 2D Sprite Rendering
//!
//! The 2D renderer turns a frame's worth of textured quads into as few GPU
//! draw calls as possible. Games submit quads ("glyphs") through a
//! [`SpriteBatch`] between `begin()` and `end()`; the batch sorts them,
//! merges runs that share a texture, expands them into a single vertex
//! array, and uploads it in one bulk transfer. The renderer then walks the
//! batch list issuing one draw per texture run.
//!
//! ## Per-Frame Flow
//!
//! ```text
//!  begin(policy)          draw() × N                end()
//!      │                      │                       │
//!      ▼                      ▼                       ▼
//!  clear lists ──► append glyphs (no GPU work) ──► stable sort
//!                                                   │
//!                                                   ▼
//!                                          merge adjacent same-
//!                                          texture glyphs into
//!                                          RenderBatch runs
//!                                                   │
//!                                                   ▼
//!                                          expand 6 vertices/quad
//!                                                   │
//!                    upload() ── one write_buffer ◄─┘
//!                       │
//!                       ▼
//!              SpriteRenderer: per batch,
//!              bind texture + draw(range)
//! ```
//!
//! ## Why Batching Matters
//!
//! Every draw call and texture bind carries driver overhead. A scene with
//! 500 sprites across 3 textures is far cheaper as 3 draws than as 500.
//! Sorting by texture maximizes merging; sorting by depth trades batch count
//! for painter's-algorithm layering. The sort is *stable*, so glyphs with
//! equal keys keep their submission order and "last submitted wins
//! visually" stays deterministic.

pub mod batch;
pub mod camera;
pub mod glyph;
pub mod pipeline;
pub mod shader;
pub mod texture;
pub mod vertex;

pub use batch::{RenderBatch, SortPolicy, SpriteBatch};
pub use camera::Camera2d;
pub use glyph::{Glyph, Rect};
pub use pipeline::SpriteRenderer;
pub use shader::{Shader, ShaderError};
pub use texture::{TextureError, TextureHandle, TextureStore};
pub use vertex::SpriteVertex;

/// An RGBA color with 8-bit channels, applied uniformly to a quad's vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);

    /// Create a color from RGB (alpha = 255).
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a color from RGBA.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub(crate) const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}
