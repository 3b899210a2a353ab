//! Zombie survival — a tile level parsed from ASCII, humans to protect,
//! zombies that convert them, and bullets fired toward the cursor.
//!
//! WASD moves, the player faces the cursor, left mouse fires. Zombies
//! chase the nearest human (or you). Clear every zombie to win; getting
//! caught restarts the level.

use glima::prelude::*;

const TILE: f32 = 64.0;
const PLAYER_SPEED: f32 = 260.0;
const HUMAN_SPEED: f32 = 70.0;
const ZOMBIE_SPEED: f32 = 110.0;
const BULLET_SPEED: f32 = 900.0;
const AGENT_SIZE: f32 = 42.0;
const BULLET_SIZE: f32 = 12.0;
const FIRE_COOLDOWN: f32 = 0.12;

const LEVEL: &[&str] = &[
    "####################",
    "#........##........#",
    "#..H..Z..##...H....#",
    "#....####..####....#",
    "#....#........#..Z.#",
    "#.H..#..@.....#....#",
    "#....#........#..H.#",
    "#....####..####....#",
    "#..Z.....##....Z...#",
    "#...H....##..H.....#",
    "####################",
];

struct Level {
    solid: Vec<Vec<bool>>,
    width: usize,
    height: usize,
}

impl Level {
    /// Parse the ASCII map. Returns the level plus spawn points for the
    /// player, humans, and zombies in world coordinates.
    fn parse(rows: &[&str]) -> (Level, Vec2, Vec<Vec2>, Vec<Vec2>) {
        let height = rows.len();
        let width = rows[0].len();
        let mut solid = vec![vec![false; width]; height];
        let mut player = Vec2::ZERO;
        let mut humans = Vec::new();
        let mut zombies = Vec::new();

        for (row, line) in rows.iter().enumerate() {
            assert_eq!(line.len(), width, "ragged level row {row}");
            for (col, ch) in line.chars().enumerate() {
                // Row 0 is the top of the map; world y grows upward.
                let world = Vec2::new(
                    col as f32 * TILE + TILE * 0.5,
                    (height - 1 - row) as f32 * TILE + TILE * 0.5,
                );
                match ch {
                    '#' => solid[row][col] = true,
                    '@' => player = world,
                    'H' => humans.push(world),
                    'Z' => zombies.push(world),
                    '.' => {}
                    other => panic!("unknown level tile '{other}' at {row},{col}"),
                }
            }
        }

        (
            Level {
                solid,
                width,
                height,
            },
            player,
            humans,
            zombies,
        )
    }

    fn is_solid_at(&self, world: Vec2) -> bool {
        let col = (world.x / TILE).floor();
        let row = self.height as f32 - 1.0 - (world.y / TILE).floor();
        if col < 0.0 || row < 0.0 {
            return true;
        }
        let (col, row) = (col as usize, row as usize);
        if col >= self.width || row >= self.height {
            return true;
        }
        self.solid[row][col]
    }

    /// Whether an axis-aligned box centered at `center` touches a wall.
    fn box_hits_wall(&self, center: Vec2, half: f32) -> bool {
        self.is_solid_at(center + Vec2::new(-half, -half))
            || self.is_solid_at(center + Vec2::new(half, -half))
            || self.is_solid_at(center + Vec2::new(-half, half))
            || self.is_solid_at(center + Vec2::new(half, half))
    }
}

struct Agent {
    position: Vec2,
    direction: Vec2,
    alive: bool,
}

struct Bullet {
    position: Vec2,
    velocity: Vec2,
    alive: bool,
}

/// Move per axis and cancel the component that would enter a wall.
fn walk(level: &Level, position: &mut Vec2, step: Vec2) {
    let half = AGENT_SIZE * 0.5;
    let tried_x = Vec2::new(position.x + step.x, position.y);
    if !level.box_hits_wall(tried_x, half) {
        position.x = tried_x.x;
    }
    let tried_y = Vec2::new(position.x, position.y + step.y);
    if !level.box_hits_wall(tried_y, half) {
        position.y = tried_y.y;
    }
}

struct Rng(u64);

impl Rng {
    fn next_f32(&mut self) -> f32 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((self.0 >> 33) as f32) / (u32::MAX >> 1) as f32
    }
}

struct ZombieScreen {
    batch: SpriteBatch,
    level: Level,
    player: Vec2,
    humans: Vec<Agent>,
    zombies: Vec<Agent>,
    bullets: Vec<Bullet>,
    fire_timer: f32,
    rng: Rng,
}

impl ZombieScreen {
    fn new() -> Self {
        let (level, player, humans, zombies) = Level::parse(LEVEL);
        Self {
            batch: SpriteBatch::new(),
            level,
            player,
            humans: spawn(humans),
            zombies: spawn(zombies),
            bullets: Vec::new(),
            fire_timer: 0.0,
            rng: Rng(0xdead),
        }
    }

    fn reset(&mut self) {
        let (level, player, humans, zombies) = Level::parse(LEVEL);
        self.level = level;
        self.player = player;
        self.humans = spawn(humans);
        self.zombies = spawn(zombies);
        self.bullets.clear();
        self.fire_timer = 0.0;
    }
}

fn spawn(points: Vec<Vec2>) -> Vec<Agent> {
    points
        .into_iter()
        .map(|position| Agent {
            position,
            direction: Vec2::X,
            alive: true,
        })
        .collect()
}

fn nearest_alive(from: Vec2, agents: &[Agent]) -> Option<usize> {
    agents
        .iter()
        .enumerate()
        .filter(|(_, a)| a.alive)
        .min_by(|(_, a), (_, b)| {
            let da = (a.position - from).length_squared();
            let db = (b.position - from).length_squared();
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(i, _)| i)
}

impl Screen for ZombieScreen {
    fn on_entry(&mut self, ctx: &mut Context) {
        ctx.camera.set_position(self.player);
    }

    fn update(&mut self, ctx: &mut Context) -> Transition {
        let dt = ctx.time.delta_secs().min(1.0 / 30.0);

        if ctx.input.keyboard.just_pressed(KeyCode::Escape) {
            return Transition::Exit;
        }

        // Player movement and aim.
        let mut step = Vec2::ZERO;
        if ctx.input.keyboard.pressed(KeyCode::KeyW) {
            step.y += 1.0;
        }
        if ctx.input.keyboard.pressed(KeyCode::KeyS) {
            step.y -= 1.0;
        }
        if ctx.input.keyboard.pressed(KeyCode::KeyA) {
            step.x -= 1.0;
        }
        if ctx.input.keyboard.pressed(KeyCode::KeyD) {
            step.x += 1.0;
        }
        let step = step.normalize_or_zero() * PLAYER_SPEED * dt;
        walk(&self.level, &mut self.player, step);

        let aim = (ctx.cursor_world() - self.player).normalize_or_zero();

        // Firing.
        self.fire_timer -= dt;
        if ctx.input.mouse.pressed(MouseButton::Left)
            && self.fire_timer <= 0.0
            && aim != Vec2::ZERO
        {
            self.bullets.push(Bullet {
                position: self.player + aim * AGENT_SIZE,
                velocity: aim * BULLET_SPEED,
                alive: true,
            });
            self.fire_timer = FIRE_COOLDOWN;
        }

        // Humans wander, changing heading occasionally.
        for human in self.humans.iter_mut().filter(|h| h.alive) {
            if self.rng.next_f32() < 0.01 {
                let angle = self.rng.next_f32() * std::f32::consts::TAU;
                human.direction = Vec2::new(angle.cos(), angle.sin());
            }
            let step = human.direction * HUMAN_SPEED * dt;
            let before = human.position;
            walk(&self.level, &mut human.position, step);
            // Bounce off walls instead of hugging them.
            if human.position == before {
                human.direction = -human.direction;
            }
        }

        // Zombies chase the nearest human, or the player when none remain.
        for zombie in self.zombies.iter_mut().filter(|z| z.alive) {
            let target = nearest_alive(zombie.position, &self.humans)
                .map(|i| self.humans[i].position)
                .unwrap_or(self.player);
            zombie.direction = (target - zombie.position).normalize_or_zero();
            let step = zombie.direction * ZOMBIE_SPEED * dt;
            walk(&self.level, &mut zombie.position, step);
        }

        // Zombie contact: humans convert, the player restarts the level.
        let mut converted = Vec::new();
        for zombie in self.zombies.iter().filter(|z| z.alive) {
            for (i, human) in self.humans.iter().enumerate() {
                if human.alive
                    && (human.position - zombie.position).length() < AGENT_SIZE
                {
                    converted.push(i);
                }
            }
            if (self.player - zombie.position).length() < AGENT_SIZE {
                log::info!("Caught by a zombie. Restarting.");
                self.reset();
                return Transition::None;
            }
        }
        for i in converted {
            if self.humans[i].alive {
                self.humans[i].alive = false;
                self.zombies.push(Agent {
                    position: self.humans[i].position,
                    direction: Vec2::X,
                    alive: true,
                });
            }
        }

        // Bullets fly until they hit a wall or a target.
        for bullet in &mut self.bullets {
            bullet.position += bullet.velocity * dt;
            if self.level.box_hits_wall(bullet.position, BULLET_SIZE * 0.5) {
                bullet.alive = false;
                continue;
            }
            for zombie in self.zombies.iter_mut().filter(|z| z.alive) {
                if (zombie.position - bullet.position).length() < AGENT_SIZE * 0.5 {
                    zombie.alive = false;
                    bullet.alive = false;
                    break;
                }
            }
        }
        self.bullets.retain(|b| b.alive);

        if !self.zombies.iter().any(|z| z.alive) {
            log::info!("All zombies cleared. You win!");
            return Transition::Exit;
        }

        ctx.camera.set_position(self.player);
        Transition::None
    }

    fn draw(&mut self, ctx: &mut Context, frame: &mut Frame) {
        let white = ctx.white_texture();
        let aim = (ctx.cursor_world() - self.player).normalize_or_zero();

        self.batch.begin(SortPolicy::BackToFront);

        // Walls.
        for row in 0..self.level.height {
            for col in 0..self.level.width {
                if !self.level.solid[row][col] {
                    continue;
                }
                let dest = Rect::new(
                    col as f32 * TILE,
                    (self.level.height - 1 - row) as f32 * TILE,
                    TILE,
                    TILE,
                );
                if ctx.camera.is_box_in_view(dest) {
                    self.batch
                        .draw(dest, Rect::FULL_UV, white, 3.0, Color::rgb(120, 70, 50));
                }
            }
        }

        let half = AGENT_SIZE * 0.5;
        for human in self.humans.iter().filter(|h| h.alive) {
            self.batch.draw(
                Rect::new(human.position.x - half, human.position.y - half, AGENT_SIZE, AGENT_SIZE),
                Rect::FULL_UV,
                white,
                2.0,
                Color::rgb(80, 170, 240),
            );
        }
        for zombie in self.zombies.iter().filter(|z| z.alive) {
            self.batch.draw_with_direction(
                Rect::new(
                    zombie.position.x - half,
                    zombie.position.y - half,
                    AGENT_SIZE,
                    AGENT_SIZE,
                ),
                Rect::FULL_UV,
                white,
                2.0,
                Color::rgb(90, 200, 70),
                zombie.direction,
            );
        }

        self.batch.draw_with_direction(
            Rect::new(self.player.x - half, self.player.y - half, AGENT_SIZE, AGENT_SIZE),
            Rect::FULL_UV,
            white,
            1.0,
            Color::rgb(230, 200, 90),
            aim,
        );

        let bhalf = BULLET_SIZE * 0.5;
        for bullet in &self.bullets {
            self.batch.draw_with_direction(
                Rect::new(
                    bullet.position.x - bhalf,
                    bullet.position.y - bhalf,
                    BULLET_SIZE,
                    BULLET_SIZE,
                ),
                Rect::FULL_UV,
                white,
                0.0,
                Color::rgb(255, 240, 160),
                bullet.velocity,
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
        .title("glima — zombies")
        .size(1280, 720)
        .clear_color(Color::rgb(30, 26, 26))
        .screen(ZombieScreen::new())
        .run()
}
