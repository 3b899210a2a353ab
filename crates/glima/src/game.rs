//! Game builder and entry point.
//!
//! Configure a window, register screens, then call [`run()`](Game::run):
//!
//! ```ignore
//! use glima::prelude::*;
//!
//! fn main() -> Result<(), GameError> {
//!     Game::new()
//!         .title("my game")
//!         .size(1280, 720)
//!         .clear_color(Color::rgb(25, 25, 38))
//!         .screen(MenuScreen::new())
//!         .screen(GameplayScreen::new())
//!         .start_screen(0)
//!         .run()
//! }
//! ```

use winit::event_loop::EventLoop;

use crate::gpu::GpuError;
use crate::render2d::{Color, ShaderError};
use crate::screen::Screen;
use crate::window::WinitApp;

/// The game failed to start or aborted while running.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error(transparent)]
    Gpu(#[from] GpuError),
    #[error(transparent)]
    Shader(#[from] ShaderError),
    #[error("no screens registered")]
    NoScreens,
}

/// Window and loop configuration, fixed before `run()`.
pub(crate) struct GameConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub clear_color: Color,
    pub vsync: bool,
    pub max_fps: Option<f32>,
}

/// The game builder. Register screens, then call [`run()`](Game::run).
pub struct Game {
    config: GameConfig,
    screens: Vec<Box<dyn Screen>>,
    start: usize,
}

impl Game {
    pub fn new() -> Self {
        Self {
            config: GameConfig {
                title: String::from("glima"),
                width: 1280,
                height: 720,
                clear_color: Color::rgb(25, 25, 38),
                vsync: true,
                max_fps: None,
            },
            screens: Vec::new(),
            start: 0,
        }
    }

    /// Set the window title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    /// Set the initial window size in logical pixels.
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    /// Set the background clear color.
    pub fn clear_color(mut self, color: Color) -> Self {
        self.config.clear_color = color;
        self
    }

    /// Enable or disable vsync (on by default).
    pub fn vsync(mut self, vsync: bool) -> Self {
        self.config.vsync = vsync;
        self
    }

    /// Cap the frame rate. Mostly useful with vsync off.
    pub fn max_fps(mut self, fps: f32) -> Self {
        self.config.max_fps = Some(fps);
        self
    }

    /// Register a screen. Screens are indexed in registration order.
    pub fn screen(mut self, screen: impl Screen + 'static) -> Self {
        self.screens.push(Box::new(screen));
        self
    }

    /// Which screen to start on (defaults to the first registered).
    pub fn start_screen(mut self, index: usize) -> Self {
        self.start = index;
        self
    }

    /// Run the game. Blocks until the window closes or a screen exits.
    pub fn run(self) -> Result<(), GameError> {
        if self.screens.is_empty() {
            return Err(GameError::NoScreens);
        }

        let event_loop = EventLoop::new()?;
        let mut app = WinitApp::new(self.config, self.screens, self.start);
        event_loop.run_app(&mut app)?;

        app.into_result()
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
