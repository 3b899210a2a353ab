//! Platformer — two screens (menu, gameplay), AABB collision, and
//! rotated crates.
//!
//! Menu: Enter starts, Escape quits. Gameplay: A/D move, Space jumps,
//! Escape returns to the menu.

use glima::prelude::*;

const MOVE_SPEED: f32 = 300.0;
const JUMP_SPEED: f32 = 620.0;
const GRAVITY: f32 = -1600.0;

/// Solid ground and platform geometry.
struct Platform {
    rect: Rect,
    color: Color,
}

/// Decorative crates that slowly spin.
struct Crate {
    rect: Rect,
    angle: f32,
    spin: f32,
}

struct Player {
    position: Vec2,
    velocity: Vec2,
    size: Vec2,
    on_ground: bool,
}

impl Player {
    fn rect(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.size.x, self.size.y)
    }
}

fn overlaps(a: Rect, b: Rect) -> bool {
    a.x < b.x + b.w && a.x + a.w > b.x && a.y < b.y + b.h && a.y + a.h > b.y
}

// ── Menu ───────────────────────────────────────────────────────────────────

struct MenuScreen {
    batch: SpriteBatch,
    pulse: f32,
}

impl MenuScreen {
    fn new() -> Self {
        Self {
            batch: SpriteBatch::new(),
            pulse: 0.0,
        }
    }
}

impl Screen for MenuScreen {
    fn update(&mut self, ctx: &mut Context) -> Transition {
        self.pulse = ctx.time.elapsed_secs();
        if ctx.input.keyboard.just_pressed(KeyCode::Enter) {
            return Transition::Next;
        }
        if ctx.input.keyboard.just_pressed(KeyCode::Escape) {
            return Transition::Exit;
        }
        Transition::None
    }

    fn draw(&mut self, ctx: &mut Context, frame: &mut Frame) {
        let white = ctx.white_texture();
        let level = ((self.pulse * 2.0).sin() * 0.5 + 0.5) * 155.0 + 100.0;
        let prompt = Color::rgb(level as u8, level as u8, 60);

        self.batch.begin(SortPolicy::BackToFront);
        // Title block and pulsing "start" bar, solid quads off the white texture.
        self.batch.draw(
            Rect::new(-220.0, 60.0, 440.0, 120.0),
            Rect::FULL_UV,
            white,
            0.0,
            Color::rgb(70, 110, 200),
        );
        self.batch.draw(
            Rect::new(-140.0, -80.0, 280.0, 40.0),
            Rect::FULL_UV,
            white,
            1.0,
            prompt,
        );
        self.batch.end();
        self.batch.upload(&ctx.gpu.device, &ctx.gpu.queue);

        frame.draw_sprites(&ctx.renderer, &self.batch, &ctx.textures);
    }
}

// ── Gameplay ───────────────────────────────────────────────────────────────

struct GameplayScreen {
    batch: SpriteBatch,
    player: Player,
    platforms: Vec<Platform>,
    crates: Vec<Crate>,
}

impl GameplayScreen {
    fn new() -> Self {
        let platforms = vec![
            Platform {
                rect: Rect::new(-600.0, -340.0, 1200.0, 60.0),
                color: Color::rgb(60, 140, 60),
            },
            Platform {
                rect: Rect::new(-420.0, -180.0, 240.0, 30.0),
                color: Color::rgb(110, 80, 50),
            },
            Platform {
                rect: Rect::new(-60.0, -60.0, 240.0, 30.0),
                color: Color::rgb(110, 80, 50),
            },
            Platform {
                rect: Rect::new(260.0, 60.0, 240.0, 30.0),
                color: Color::rgb(110, 80, 50),
            },
        ];
        let crates = vec![
            Crate {
                rect: Rect::new(-380.0, -120.0, 48.0, 48.0),
                angle: 0.3,
                spin: 0.6,
            },
            Crate {
                rect: Rect::new(40.0, 10.0, 48.0, 48.0),
                angle: 1.1,
                spin: -0.4,
            },
            Crate {
                rect: Rect::new(330.0, 130.0, 48.0, 48.0),
                angle: 0.0,
                spin: 0.9,
            },
        ];
        Self {
            batch: SpriteBatch::new(),
            player: Player {
                position: Vec2::new(-40.0, -280.0),
                velocity: Vec2::ZERO,
                size: Vec2::new(36.0, 54.0),
                on_ground: false,
            },
            platforms,
            crates,
        }
    }

    /// Move one axis at a time and resolve against every platform, so
    /// horizontal motion can't tunnel through a corner during a fall.
    fn move_and_collide(&mut self, dt: f32) {
        self.player.position.x += self.player.velocity.x * dt;
        for platform in &self.platforms {
            if overlaps(self.player.rect(), platform.rect) {
                if self.player.velocity.x > 0.0 {
                    self.player.position.x = platform.rect.x - self.player.size.x;
                } else if self.player.velocity.x < 0.0 {
                    self.player.position.x = platform.rect.x + platform.rect.w;
                }
            }
        }

        self.player.position.y += self.player.velocity.y * dt;
        self.player.on_ground = false;
        for platform in &self.platforms {
            if overlaps(self.player.rect(), platform.rect) {
                if self.player.velocity.y <= 0.0 {
                    self.player.position.y = platform.rect.y + platform.rect.h;
                    self.player.on_ground = true;
                } else {
                    self.player.position.y = platform.rect.y - self.player.size.y;
                }
                self.player.velocity.y = 0.0;
            }
        }
    }
}

impl Screen for GameplayScreen {
    fn on_entry(&mut self, ctx: &mut Context) {
        ctx.camera.set_position(Vec2::ZERO);
        self.player.position = Vec2::new(-40.0, -280.0);
        self.player.velocity = Vec2::ZERO;
    }

    fn update(&mut self, ctx: &mut Context) -> Transition {
        let dt = ctx.time.delta_secs().min(1.0 / 30.0);

        if ctx.input.keyboard.just_pressed(KeyCode::Escape) {
            return Transition::Previous;
        }

        let mut dir = 0.0;
        if ctx.input.keyboard.pressed(KeyCode::KeyA) {
            dir -= 1.0;
        }
        if ctx.input.keyboard.pressed(KeyCode::KeyD) {
            dir += 1.0;
        }
        self.player.velocity.x = dir * MOVE_SPEED;

        if ctx.input.keyboard.just_pressed(KeyCode::Space) && self.player.on_ground {
            self.player.velocity.y = JUMP_SPEED;
        }
        self.player.velocity.y += GRAVITY * dt;

        self.move_and_collide(dt);

        // Fell off the world: respawn.
        if self.player.position.y < -800.0 {
            self.player.position = Vec2::new(-40.0, -280.0);
            self.player.velocity = Vec2::ZERO;
        }

        for c in &mut self.crates {
            c.angle += c.spin * dt;
        }

        // Camera tracks the player horizontally.
        let mut cam = ctx.camera.position();
        cam.x += (self.player.position.x - cam.x) * (5.0 * dt).min(1.0);
        ctx.camera.set_position(cam);

        Transition::None
    }

    fn draw(&mut self, ctx: &mut Context, frame: &mut Frame) {
        let white = ctx.white_texture();

        self.batch.begin(SortPolicy::BackToFront);

        for platform in &self.platforms {
            if ctx.camera.is_box_in_view(platform.rect) {
                self.batch
                    .draw(platform.rect, Rect::FULL_UV, white, 2.0, platform.color);
            }
        }

        for c in &self.crates {
            self.batch.draw_rotated(
                c.rect,
                Rect::FULL_UV,
                white,
                1.0,
                Color::rgb(170, 120, 60),
                c.angle,
            );
        }

        self.batch.draw(
            self.player.rect(),
            Rect::FULL_UV,
            white,
            0.0,
            Color::rgb(220, 220, 240),
        );

        self.batch.end();
        self.batch.upload(&ctx.gpu.device, &ctx.gpu.queue);

        frame.draw_sprites(&ctx.renderer, &self.batch, &ctx.textures);
    }
}

fn main() -> Result<(), GameError> {
    env_logger::init();

    Game::new()
        .title("glima — platformer")
        .size(1280, 720)
        .clear_color(Color::rgb(24, 30, 44))
        .screen(MenuScreen::new())
        .screen(GameplayScreen::new())
        .start_screen(0)
        .run()
}
