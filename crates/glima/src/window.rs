//! Window management via winit.
//!
//! Implements [`winit::application::ApplicationHandler`] to drive the event
//! loop: window creation, input forwarding, resize, and the per-frame
//! sequence (timing, hot-reload, screen update, transition, draw, present).

use std::sync::Arc;

use glam::Vec2;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use crate::asset::{process_asset_reloads, AssetServer};
use crate::context::Context;
use crate::frame::Frame;
use crate::game::{GameConfig, GameError};
use crate::gpu::GpuContext;
use crate::input::InputState;
use crate::render2d::{Camera2d, SpriteRenderer, TextureStore};
use crate::screen::{Screen, ScreenList, Transition};
use crate::time::{FpsLimiter, Time};

/// The application state that winit drives.
pub(crate) struct WinitApp {
    config: GameConfig,
    /// Taken by `resumed` when the window and GPU come up.
    pending_screens: Option<(Vec<Box<dyn Screen>>, usize)>,
    window: Option<Arc<Window>>,
    ctx: Option<Context>,
    screens: Option<ScreenList>,
    limiter: FpsLimiter,
    /// Set when startup fails inside the event loop; surfaced by `run()`.
    error: Option<GameError>,
}

impl WinitApp {
    pub fn new(config: GameConfig, screens: Vec<Box<dyn Screen>>, start: usize) -> Self {
        let limiter = FpsLimiter::new(config.max_fps);
        Self {
            config,
            pending_screens: Some((screens, start)),
            window: None,
            ctx: None,
            screens: None,
            limiter,
            error: None,
        }
    }

    /// Consume the app after the loop ends, surfacing any startup error.
    pub fn into_result(self) -> Result<(), GameError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), GameError> {
        let attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.width as f64,
                self.config.height as f64,
            ));
        let window = Arc::new(event_loop.create_window(attrs)?);

        let gpu = GpuContext::new(window.clone(), self.config.vsync)?;
        let renderer = SpriteRenderer::new(&gpu)?;
        let textures = TextureStore::new(&gpu, &renderer);

        let (width, height) = gpu.surface_size();
        let camera = Camera2d::new(width as f32, height as f32);

        let mut assets = AssetServer::new();
        if let Some(path) = renderer.shader_path() {
            assets.watch_sprite_shader(path.clone());
        }

        let mut ctx = Context {
            gpu,
            renderer,
            textures,
            camera,
            input: InputState::new(),
            time: Time::new(),
            assets,
        };

        let (screens, start) = self
            .pending_screens
            .take()
            .expect("screens already consumed");
        let mut screens = ScreenList::new(screens, start);
        screens.current_mut().on_entry(&mut ctx);

        self.window = Some(window);
        self.ctx = Some(ctx);
        self.screens = Some(screens);
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(ctx), Some(screens)) = (self.ctx.as_mut(), self.screens.as_mut()) else {
            return;
        };

        self.limiter.begin();
        ctx.time.update();

        process_asset_reloads(ctx);

        let transition = screens.current_mut().update(ctx);
        ctx.input.clear_just();

        if transition == Transition::Exit {
            log::info!("Screen requested exit.");
            event_loop.exit();
            return;
        }
        if let Some(target) = screens.resolve(transition) {
            log::debug!(
                "Screen transition: {} -> {target}",
                screens.current_index()
            );
            screens.switch_to(target, ctx);
        }

        let view_proj = ctx.camera.view_proj();
        ctx.renderer.update_camera(&ctx.gpu, view_proj);

        match Frame::begin(&ctx.gpu, self.config.clear_color) {
            Ok(mut frame) => {
                screens.current_mut().draw(ctx, &mut frame);
                frame.present(&ctx.gpu);
            }
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                // Reconfigure and try again next frame.
                let (w, h) = ctx.gpu.surface_size();
                ctx.gpu.resize(w, h);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of GPU memory!");
                event_loop.exit();
                return;
            }
            Err(e) => {
                log::warn!("Surface error: {e:?}");
            }
        }

        self.limiter.end();

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for WinitApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            log::error!("Startup failed: {e}");
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Window close requested, exiting.");
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(ctx) = self.ctx.as_mut() {
                    ctx.gpu.resize(size.width, size.height);
                    ctx.camera
                        .set_viewport(size.width as f32, size.height as f32);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    if let Some(ctx) = self.ctx.as_mut() {
                        match event.state {
                            ElementState::Pressed => ctx.input.keyboard.press(key_code),
                            ElementState::Released => ctx.input.keyboard.release(key_code),
                        }
                    }
                }
            }

            WindowEvent::MouseInput { button, state, .. } => {
                if let Some(ctx) = self.ctx.as_mut() {
                    match state {
                        ElementState::Pressed => ctx.input.mouse.press(button),
                        ElementState::Released => ctx.input.mouse.release(button),
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                if let Some(ctx) = self.ctx.as_mut() {
                    ctx.input.cursor = Vec2::new(position.x as f32, position.y as f32);
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }
}
