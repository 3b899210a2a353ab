//! # Asset Hot-Reload
//!
//! Watches registered files on disk and reloads them at runtime: save a
//! texture PNG or the sprite shader while the game runs and the change shows
//! up without a restart.
//!
//! ```text
//! AssetServer
//!   watcher ──► background thread (notify crate)
//!               watches registered file paths
//!               sends events over mpsc channel
//!   rx ◄──────── receives filesystem events
//!   watched_paths ── maps path → AssetKind
//!   pending_reloads ── debounce buffer (path → timestamp)
//!
//! Per-frame: process_asset_reloads(ctx)
//!   1. Poll: drain rx into pending_reloads
//!   2. Debounce: only act on entries quiet for 100ms
//!   3. Dispatch: reload by asset kind (texture, shader)
//! ```
//!
//! ## Debounce
//!
//! Editors often perform atomic saves (write temp file, rename over the
//! original), producing several filesystem events in quick succession. The
//! debounce buffer collects events per path and waits 100ms of quiet before
//! reloading, so one burst of saves triggers exactly one reload.
//!
//! ## Graceful degradation
//!
//! If the watcher fails to initialize (e.g., inotify limit reached), assets
//! still load normally; they just won't hot-reload. Errors are logged, not
//! panicked. A broken replacement shader is rejected and the old pipeline
//! stays live.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Instant;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};

use crate::context::Context;
use crate::render2d::{Shader, TextureHandle};

/// Events within this duration of each other collapse into a single reload.
const DEBOUNCE_DURATION: std::time::Duration = std::time::Duration::from_millis(100);

/// What kind of asset a watched path corresponds to.
#[derive(Debug, Clone)]
enum AssetKind {
    /// A texture at a specific handle index.
    Texture(TextureHandle),
    /// The sprite shader.
    SpriteShader,
}

/// Manages filesystem watching and hot-reload dispatch.
pub struct AssetServer {
    /// The filesystem watcher. `None` if initialization failed.
    watcher: Option<RecommendedWatcher>,
    rx: mpsc::Receiver<Result<notify::Event, notify::Error>>,
    watched_paths: HashMap<PathBuf, AssetKind>,
    /// Debounce buffer: path → (asset kind, timestamp of last event).
    pending_reloads: HashMap<PathBuf, (AssetKind, Instant)>,
    /// Set once the sender side is gone (log once, then stop polling).
    rx_disconnected: bool,
}

impl AssetServer {
    /// Create a new asset server. Starts the filesystem watcher.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        let watcher = notify::recommended_watcher(move |res| {
            // Ignore send errors (receiver dropped during shutdown).
            let _ = tx.send(res);
        });

        let watcher = match watcher {
            Ok(w) => Some(w),
            Err(e) => {
                log::warn!("Failed to create file watcher: {e}. Hot-reload disabled.");
                None
            }
        };

        Self {
            watcher,
            rx,
            watched_paths: HashMap::new(),
            pending_reloads: HashMap::new(),
            rx_disconnected: false,
        }
    }

    /// Watch a texture file; changes reload the data behind `handle`.
    pub fn watch_texture(&mut self, path: impl Into<PathBuf>, handle: TextureHandle) {
        self.watch(path.into(), AssetKind::Texture(handle));
    }

    /// Watch the sprite shader source; changes rebuild the pipeline.
    pub fn watch_sprite_shader(&mut self, path: impl Into<PathBuf>) {
        self.watch(path.into(), AssetKind::SpriteShader);
    }

    fn watch(&mut self, path: PathBuf, kind: AssetKind) {
        // Canonicalize so we match events correctly.
        let canonical = match path.canonicalize() {
            Ok(p) => p,
            Err(e) => {
                log::warn!("Cannot watch '{}': {e}", path.display());
                return;
            }
        };

        if let Some(watcher) = &mut self.watcher {
            if let Err(e) = watcher.watch(&canonical, RecursiveMode::NonRecursive) {
                log::warn!("Failed to watch '{}': {e}", canonical.display());
                return;
            }
        }

        self.watched_paths.insert(canonical, kind);
    }

    /// Drain filesystem events from the receiver into the debounce buffer.
    fn poll(&mut self) {
        if self.rx_disconnected {
            return;
        }

        loop {
            match self.rx.try_recv() {
                Ok(Ok(event)) => {
                    // Modify and create both matter (atomic saves appear as create).
                    use notify::EventKind;
                    match event.kind {
                        EventKind::Modify(_) | EventKind::Create(_) => {
                            for path in &event.paths {
                                let canonical =
                                    path.canonicalize().unwrap_or_else(|_| path.clone());
                                if let Some(kind) = self.watched_paths.get(&canonical) {
                                    self.pending_reloads
                                        .insert(canonical, (kind.clone(), Instant::now()));
                                }
                            }
                        }
                        _ => {}
                    }
                }
                Ok(Err(e)) => {
                    log::warn!("File watcher error: {e}");
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    log::warn!("File watcher disconnected. Hot-reload disabled.");
                    self.rx_disconnected = true;
                    break;
                }
            }
        }
    }

    /// Return entries that have been quiet for at least the debounce duration.
    fn drain_ready(&mut self) -> Vec<(PathBuf, AssetKind)> {
        let now = Instant::now();
        let mut ready = Vec::new();

        self.pending_reloads.retain(|path, (kind, timestamp)| {
            if now.duration_since(*timestamp) >= DEBOUNCE_DURATION {
                ready.push((path.clone(), kind.clone()));
                false
            } else {
                true
            }
        });

        ready
    }
}

impl Default for AssetServer {
    fn default() -> Self {
        Self::new()
    }
}

/// Poll for filesystem changes and dispatch reloads. Called once per frame
/// by the frontend, before the screen updates.
pub(crate) fn process_asset_reloads(ctx: &mut Context) {
    ctx.assets.poll();
    let ready = ctx.assets.drain_ready();

    for (path, kind) in ready {
        match kind {
            AssetKind::Texture(handle) => reload_texture(ctx, &path, handle),
            AssetKind::SpriteShader => reload_sprite_shader(ctx, &path),
        }
    }
}

fn reload_texture(ctx: &mut Context, path: &Path, handle: TextureHandle) {
    match ctx.textures.reload(&ctx.gpu, &ctx.renderer, handle, path) {
        Ok(()) => log::info!("Hot-reloaded texture: {}", path.display()),
        Err(e) => log::warn!("Hot-reload failed for '{}': {e}", path.display()),
    }
}

/// Compile the replacement shader and swap the pipeline only if both the
/// module and the pipeline pass validation.
fn reload_sprite_shader(ctx: &mut Context, path: &Path) {
    let shader = match Shader::from_file(&ctx.gpu, path) {
        Ok(s) => s,
        Err(e) => {
            log::warn!("Shader error in '{}': {e}. Keeping old pipeline.", path.display());
            return;
        }
    };

    match ctx.renderer.rebuild_pipeline(&ctx.gpu, &shader) {
        Ok(()) => log::info!("Hot-reloaded sprite shader: {}", path.display()),
        Err(e) => {
            log::warn!("Shader error in '{}': {e}. Keeping old pipeline.", path.display());
        }
    }
}
