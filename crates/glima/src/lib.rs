//! # Glima — Batched 2D Sprite Engine
//!
//! A small 2D game engine built around one idea done well: collecting a
//! frame's sprites, sorting them, merging same-texture runs into as few
//! draw calls as possible, and uploading everything in one bulk transfer.
//! Around the renderer sit the pieces a game needs to use it: a window and
//! frame loop, screens with transitions, input, timing, textures with
//! hot-reload, and a 2D camera.
//!
//! Start with `use glima::prelude::*` and build a [`Game`](game::Game).

pub mod asset;
pub mod context;
pub mod frame;
pub mod game;
pub mod gpu;
pub mod input;
pub mod prelude;
pub mod render2d;
pub mod screen;
pub mod time;
pub(crate) mod window;
