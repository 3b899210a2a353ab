//! Ball pit — bouncing balls with gravity, mouse attraction, and
//! swappable rendering styles.
//!
//! Hold the left mouse button to pull balls toward the cursor. Press
//! 1-4 to switch rendering style (plain, momentum, velocity, trippy),
//! G to toggle gravity.

use glima::prelude::*;

const BALL_COUNT: usize = 400;
const GRAVITY: f32 = -600.0;
const RESTITUTION: f32 = 0.85;
const ATTRACT_STRENGTH: f32 = 900.0;

struct Ball {
    position: Vec2,
    velocity: Vec2,
    radius: f32,
    mass: f32,
    color: Color,
}

/// How a ball's draw color is derived. Each style is a pure function of the
/// ball's state, so styles can be swapped mid-flight.
trait BallRenderer {
    fn name(&self) -> &'static str;
    fn color(&self, ball: &Ball, time: f32) -> Color;
}

struct Plain;

impl BallRenderer for Plain {
    fn name(&self) -> &'static str {
        "plain"
    }
    fn color(&self, ball: &Ball, _time: f32) -> Color {
        ball.color
    }
}

/// Brightness scales with momentum, so heavy fast balls glow.
struct Momentum;

impl BallRenderer for Momentum {
    fn name(&self) -> &'static str {
        "momentum"
    }
    fn color(&self, ball: &Ball, _time: f32) -> Color {
        let momentum = ball.velocity.length() * ball.mass;
        let level = (momentum * 0.4).min(255.0) as u8;
        Color::rgb(level, level, level)
    }
}

/// Velocity components map to color channels.
struct Velocity;

impl BallRenderer for Velocity {
    fn name(&self) -> &'static str {
        "velocity"
    }
    fn color(&self, ball: &Ball, _time: f32) -> Color {
        let r = (ball.velocity.x.abs() * 0.5).min(255.0) as u8;
        let b = (ball.velocity.y.abs() * 0.5).min(255.0) as u8;
        Color::rgb(r, 80, b)
    }
}

/// Hue cycles with time and position.
struct Trippy;

impl BallRenderer for Trippy {
    fn name(&self) -> &'static str {
        "trippy"
    }
    fn color(&self, ball: &Ball, time: f32) -> Color {
        let phase = time * 2.0 + ball.position.x * 0.01;
        let r = ((phase.sin() * 0.5 + 0.5) * 255.0) as u8;
        let g = (((phase + 2.0).sin() * 0.5 + 0.5) * 255.0) as u8;
        let b = (((phase + 4.0).sin() * 0.5 + 0.5) * 255.0) as u8;
        Color::rgb(r, g, b)
    }
}

struct BallScreen {
    balls: Vec<Ball>,
    batch: SpriteBatch,
    ball_texture: TextureHandle,
    renderers: Vec<Box<dyn BallRenderer>>,
    active_renderer: usize,
    gravity_on: bool,
    bounds: Vec2,
}

impl BallScreen {
    fn new() -> Self {
        Self {
            balls: Vec::new(),
            batch: SpriteBatch::new(),
            ball_texture: TextureHandle::default(),
            renderers: vec![
                Box::new(Plain),
                Box::new(Momentum),
                Box::new(Velocity),
                Box::new(Trippy),
            ],
            active_renderer: 0,
            gravity_on: true,
            bounds: Vec2::new(640.0, 360.0),
        }
    }
}

/// Radial-gradient circle, opaque in the middle, fading to transparent at
/// the rim.
fn ball_texture_rgba(size: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity((size * size * 4) as usize);
    let center = (size as f32 - 1.0) * 0.5;
    for y in 0..size {
        for x in 0..size {
            let dx = (x as f32 - center) / center;
            let dy = (y as f32 - center) / center;
            let d = (dx * dx + dy * dy).sqrt();
            let alpha = ((1.0 - d) * 4.0).clamp(0.0, 1.0);
            // Slight shading toward the rim gives the balls depth.
            let shade = (1.0 - d * 0.35).clamp(0.0, 1.0);
            let level = (255.0 * shade) as u8;
            data.extend_from_slice(&[level, level, level, (alpha * 255.0) as u8]);
        }
    }
    data
}

/// Deterministic pseudo-random stream, good enough for scattering balls.
struct Rng(u64);

impl Rng {
    fn next_f32(&mut self) -> f32 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((self.0 >> 33) as f32) / (u32::MAX >> 1) as f32
    }

    fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + self.next_f32() * (hi - lo)
    }
}

impl Screen for BallScreen {
    fn on_entry(&mut self, ctx: &mut Context) {
        let pixels = ball_texture_rgba(64);
        self.ball_texture = ctx.texture_from_rgba8("ball", 64, 64, &pixels);

        let mut rng = Rng(0x5eed);
        self.balls = (0..BALL_COUNT)
            .map(|_| {
                let radius = rng.range(4.0, 14.0);
                Ball {
                    position: Vec2::new(
                        rng.range(-self.bounds.x + radius, self.bounds.x - radius),
                        rng.range(-self.bounds.y + radius, self.bounds.y - radius),
                    ),
                    velocity: Vec2::new(rng.range(-150.0, 150.0), rng.range(-150.0, 150.0)),
                    radius,
                    mass: radius * radius,
                    color: Color::rgb(
                        rng.range(60.0, 255.0) as u8,
                        rng.range(60.0, 255.0) as u8,
                        rng.range(60.0, 255.0) as u8,
                    ),
                }
            })
            .collect();
    }

    fn update(&mut self, ctx: &mut Context) -> Transition {
        let dt = ctx.time.delta_secs().min(1.0 / 30.0);

        if ctx.input.keyboard.just_pressed(KeyCode::Escape) {
            return Transition::Exit;
        }
        if ctx.input.keyboard.just_pressed(KeyCode::KeyG) {
            self.gravity_on = !self.gravity_on;
        }
        for (i, key) in [KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3, KeyCode::Digit4]
            .into_iter()
            .enumerate()
        {
            if ctx.input.keyboard.just_pressed(key) {
                self.active_renderer = i;
                log::info!("ball renderer: {}", self.renderers[i].name());
            }
        }

        let attract = ctx
            .input
            .mouse
            .pressed(MouseButton::Left)
            .then(|| ctx.cursor_world());

        for ball in &mut self.balls {
            if self.gravity_on {
                ball.velocity.y += GRAVITY * dt;
            }
            if let Some(target) = attract {
                let to_target = target - ball.position;
                let dist = to_target.length().max(20.0);
                ball.velocity += to_target / dist * ATTRACT_STRENGTH * dt;
            }

            ball.position += ball.velocity * dt;

            // Wall bounce: clamp inside the box and reflect.
            if ball.position.x - ball.radius < -self.bounds.x {
                ball.position.x = -self.bounds.x + ball.radius;
                ball.velocity.x = ball.velocity.x.abs() * RESTITUTION;
            } else if ball.position.x + ball.radius > self.bounds.x {
                ball.position.x = self.bounds.x - ball.radius;
                ball.velocity.x = -ball.velocity.x.abs() * RESTITUTION;
            }
            if ball.position.y - ball.radius < -self.bounds.y {
                ball.position.y = -self.bounds.y + ball.radius;
                ball.velocity.y = ball.velocity.y.abs() * RESTITUTION;
            } else if ball.position.y + ball.radius > self.bounds.y {
                ball.position.y = self.bounds.y - ball.radius;
                ball.velocity.y = -ball.velocity.y.abs() * RESTITUTION;
            }
        }

        // Pairwise collisions, heavier ball wins the pushout split.
        for i in 0..self.balls.len() {
            for j in (i + 1)..self.balls.len() {
                let (a, b) = self.balls.split_at_mut(j);
                let (a, b) = (&mut a[i], &mut b[0]);

                let delta = b.position - a.position;
                let dist = delta.length();
                let overlap = a.radius + b.radius - dist;
                if overlap <= 0.0 || dist == 0.0 {
                    continue;
                }

                let normal = delta / dist;
                let total = a.mass + b.mass;
                a.position -= normal * overlap * (b.mass / total);
                b.position += normal * overlap * (a.mass / total);

                // Elastic impulse along the collision normal.
                let relative = (b.velocity - a.velocity).dot(normal);
                if relative < 0.0 {
                    let impulse = 2.0 * relative / total;
                    a.velocity += normal * impulse * b.mass;
                    b.velocity -= normal * impulse * a.mass;
                }
            }
        }

        Transition::None
    }

    fn draw(&mut self, ctx: &mut Context, frame: &mut Frame) {
        let renderer = &self.renderers[self.active_renderer];
        let time = ctx.time.elapsed_secs();

        self.batch.begin(SortPolicy::Texture);
        for ball in &self.balls {
            let dest = Rect::new(
                ball.position.x - ball.radius,
                ball.position.y - ball.radius,
                ball.radius * 2.0,
                ball.radius * 2.0,
            );
            if !ctx.camera.is_box_in_view(dest) {
                continue;
            }
            self.batch.draw(
                dest,
                Rect::FULL_UV,
                self.ball_texture,
                0.0,
                renderer.color(ball, time),
            );
        }
        self.batch.end();
        self.batch.upload(&ctx.gpu.device, &ctx.gpu.queue);

        frame.draw_sprites(&ctx.renderer, &self.batch, &ctx.textures);
    }
}

fn main() -> Result<(), GameError> {
    env_logger::init();

    Game::new()
        .title("glima — ball pit")
        .size(1280, 720)
        .clear_color(Color::rgb(12, 12, 20))
        .screen(BallScreen::new())
        .run()
}
