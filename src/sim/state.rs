//! Game state and core simulation types
//!
//! Everything the tick mutates lives here, owned by one `GameState` that the
//! frame loop passes by exclusive reference into the step functions.

use glam::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::heading_vec;
use crate::maps::{SectorConfig, SectorId};

/// Current phase of the game shell + round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen
    Menu,
    /// Map/mode selection
    Lobby,
    /// Active gameplay
    Playing,
    /// Round frozen, toggled back by the same request
    Paused,
    /// Run ended, awaiting redeploy
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Menu => "MENU",
            GamePhase::Lobby => "LOBBY",
            GamePhase::Playing => "PLAYING",
            GamePhase::Paused => "PAUSED",
            GamePhase::GameOver => "GAMEOVER",
        }
    }
}

/// Asteroid size category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AsteroidSize {
    Large,
    Medium,
    Small,
}

impl AsteroidSize {
    /// Base collision radius before the sector size multiplier
    pub fn base_radius(&self) -> f32 {
        match self {
            AsteroidSize::Large => 60.0,
            AsteroidSize::Medium => 30.0,
            AsteroidSize::Small => 15.0,
        }
    }

    /// Points awarded on destruction; smaller rocks pay more
    pub fn points(&self) -> u64 {
        match self {
            AsteroidSize::Large => 20,
            AsteroidSize::Medium => 50,
            AsteroidSize::Small => 100,
        }
    }

    /// Next-smaller category, or None for Small (which does not split)
    pub fn split(&self) -> Option<AsteroidSize> {
        match self {
            AsteroidSize::Large => Some(AsteroidSize::Medium),
            AsteroidSize::Medium => Some(AsteroidSize::Small),
            AsteroidSize::Small => None,
        }
    }
}

/// A player ship
///
/// Ships are created at round start and never removed mid-round; a ship with
/// 0 lives stays in the vec but is skipped by rendering and collision.
#[derive(Debug, Clone)]
pub struct Ship {
    /// 0 or 1 (dual-ship mode)
    pub id: usize,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Heading, radians
    pub rot: f32,
    pub radius: f32,
    /// Render/VFX flag, refreshed every tick
    pub thrusting: bool,
    pub lives: u32,
    /// Collision immunity countdown; also drives the blink cue
    pub invulnerable: u32,
    /// Per-ship accumulator; single-ship mode reads the sum
    pub score: u64,
}

impl Ship {
    pub fn new(id: usize, multiplayer: bool) -> Self {
        Self {
            id,
            pos: Ship::spawn_pos(id, multiplayer),
            vel: Vec2::ZERO,
            rot: -std::f32::consts::FRAC_PI_2,
            radius: SHIP_RADIUS,
            thrusting: false,
            lives: SHIP_LIVES,
            invulnerable: SHIP_INVULN_TICKS,
            score: 0,
        }
    }

    /// Board center, offset sideways in dual-ship mode so the pair never
    /// respawns stacked
    pub fn spawn_pos(id: usize, multiplayer: bool) -> Vec2 {
        let center = Vec2::new(BOARD_WIDTH / 2.0, BOARD_HEIGHT / 2.0);
        if multiplayer {
            let offset = if id == 0 { -150.0 } else { 150.0 };
            center + Vec2::new(offset, 0.0)
        } else {
            center
        }
    }

    /// Still participating in collision and rendering
    pub fn alive(&self) -> bool {
        self.lives > 0
    }

    /// Send the ship back to its spawn point after a hit
    pub fn recenter(&mut self, multiplayer: bool) {
        self.pos = Ship::spawn_pos(self.id, multiplayer);
        self.vel = Vec2::ZERO;
        self.invulnerable = SHIP_INVULN_TICKS;
    }
}

/// A bullet in flight
#[derive(Debug, Clone)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Which ship fired it; scoring credits this ship
    pub owner: usize,
    /// Remaining ticks; strictly decreasing, removed at 0 or on impact
    pub life: u32,
}

/// An asteroid
#[derive(Debug, Clone)]
pub struct Asteroid {
    pub pos: Vec2,
    pub vel: Vec2,
    pub rot: f32,
    /// Per-tick rotation delta, cosmetic
    pub spin: f32,
    /// Collision radius: size base radius x sector size multiplier
    pub radius: f32,
    pub size: AsteroidSize,
    /// Per-vertex radius scale factors, fixed at spawn
    pub shape: Vec<f32>,
}

/// A cosmetic particle; no collision, no wraparound
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: u32,
    pub color: [f32; 4],
}

/// Notifications raised by the simulation, drained by the shell every frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Points were awarded (the status display is dirty)
    ScoreChanged { points: u64 },
    /// The field was cleared and a new wave spawned
    LevelUp { level: u32 },
    /// All ships out of lives; the round is over
    GameOver { score: u64 },
    /// A ship lost a life
    ShipHit { ship: usize },
    /// A rock was shot (for SFX)
    AsteroidDestroyed { size: AsteroidSize },
    /// A bullet left the barrel (for SFX)
    BulletFired { owner: usize },
}

pub const MAX_SHIPS: usize = 2;

/// Complete simulation state for one session
pub struct GameState {
    pub phase: GamePhase,
    pub multiplayer: bool,
    pub sector: SectorConfig,
    /// Wave counter, starts at 1, bumps on every field clear
    pub level: u32,
    pub ships: Vec<Ship>,
    pub bullets: Vec<Bullet>,
    pub asteroids: Vec<Asteroid>,
    pub particles: Vec<Particle>,
    /// Per-ship fire cooldown counters, indexed by ship id
    pub fire_cooldown: [u32; MAX_SHIPS],
    /// Per-ship "fire was held last frame" flags for edge-triggered fire
    pub fire_was_held: [bool; MAX_SHIPS],
    /// Pause request debounce countdown
    pub pause_debounce: u32,
    pub rng: Pcg32,
    events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(seed: u64) -> Self {
        Self {
            phase: GamePhase::Menu,
            multiplayer: false,
            sector: SectorId::Orion.config(),
            level: 1,
            ships: Vec::new(),
            bullets: Vec::new(),
            asteroids: Vec::new(),
            particles: Vec::new(),
            fire_cooldown: [0; MAX_SHIPS],
            fire_was_held: [false; MAX_SHIPS],
            pause_debounce: 0,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    /// Sum of per-ship scores; what the HUD and high score use
    pub fn total_score(&self) -> u64 {
        self.ships.iter().map(|s| s.score).sum()
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Hand the queued notifications to the shell
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Menu -> Lobby; ignored from anywhere else
    pub fn open_lobby(&mut self) {
        if self.phase == GamePhase::Menu {
            self.phase = GamePhase::Lobby;
        }
    }

    /// Return to the title screen without touching the round remnants
    pub fn back_to_menu(&mut self) {
        match self.phase {
            GamePhase::Lobby | GamePhase::Paused | GamePhase::GameOver => {
                self.phase = GamePhase::Menu;
            }
            _ => {}
        }
    }

    /// Full round reset, then straight into Playing
    ///
    /// Valid from Menu, Lobby, and GameOver (redeploy). The asteroid vec is
    /// wholly replaced; nothing from the previous round survives.
    pub fn start_round(&mut self, multiplayer: bool, sector: SectorConfig) {
        match self.phase {
            GamePhase::Menu | GamePhase::Lobby | GamePhase::GameOver => {}
            _ => return,
        }
        self.multiplayer = multiplayer;
        self.sector = sector;
        self.level = 1;
        let ship_count: usize = if multiplayer { 2 } else { 1 };
        self.ships = (0..ship_count).map(|id| Ship::new(id, multiplayer)).collect();
        self.bullets.clear();
        self.particles.clear();
        self.fire_cooldown = [0; MAX_SHIPS];
        self.fire_was_held = [false; MAX_SHIPS];
        self.pause_debounce = 0;
        self.asteroids.clear();
        self.spawn_field(4 + self.level as usize);
        self.phase = GamePhase::Playing;
        log::info!(
            "round start: sector={} multiplayer={} field={}",
            self.sector.name,
            multiplayer,
            self.asteroids.len()
        );
    }

    /// Playing <-> Paused toggle; a no-op in every other phase
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            other => other,
        };
    }

    /// Fresh irregular outline: per-vertex radius scales in [0.8, 1.2)
    pub fn roll_shape(&mut self) -> Vec<f32> {
        (0..ASTEROID_VERTEX_COUNT)
            .map(|_| self.rng.random_range(0.8..1.2))
            .collect()
    }

    /// Spawn one asteroid with velocity components drawn from
    /// [-speed_scale/2, speed_scale/2) x the sector speed multiplier
    pub fn spawn_asteroid(&mut self, size: AsteroidSize, pos: Vec2, speed_scale: f32) {
        let speed = speed_scale * self.sector.speed_mult;
        let vel = Vec2::new(
            (self.rng.random::<f32>() - 0.5) * speed,
            (self.rng.random::<f32>() - 0.5) * speed,
        );
        let rot = self.rng.random_range(0.0..std::f32::consts::TAU);
        let spin = self.rng.random_range(0.005..0.02);
        let shape = self.roll_shape();
        self.asteroids.push(Asteroid {
            pos,
            vel,
            rot,
            spin,
            radius: size.base_radius() * self.sector.size_mult,
            size,
            shape,
        });
    }

    /// Replace-or-extend the field with `count` large asteroids, each at
    /// least the safe distance from every live ship
    pub fn spawn_field(&mut self, count: usize) {
        let ship_positions: Vec<Vec2> =
            self.ships.iter().filter(|s| s.alive()).map(|s| s.pos).collect();
        let speed_scale = ASTEROID_SPEED_BASE * (1.0 + self.level as f32 * 0.1);
        for _ in 0..count {
            let pos = loop {
                let candidate = Vec2::new(
                    self.rng.random::<f32>() * BOARD_WIDTH,
                    self.rng.random::<f32>() * BOARD_HEIGHT,
                );
                let clear = ship_positions
                    .iter()
                    .all(|&p| candidate.distance(p) >= ASTEROID_SAFE_DISTANCE);
                if clear {
                    break candidate;
                }
            };
            self.spawn_asteroid(AsteroidSize::Large, pos, speed_scale);
        }
    }

    /// Exactly two next-smaller children at the parent position with fresh
    /// random velocity (independent of the parent's)
    pub fn spawn_children(&mut self, parent_pos: Vec2, parent_size: AsteroidSize) {
        if let Some(child_size) = parent_size.split() {
            for _ in 0..2 {
                self.spawn_asteroid(child_size, parent_pos, ASTEROID_SPEED_BASE * 2.0);
            }
        }
    }

    /// Radial particle burst at an impact point
    pub fn spawn_burst(&mut self, pos: Vec2, color: [f32; 4], count: usize) {
        for _ in 0..count {
            let vel = Vec2::new(
                (self.rng.random::<f32>() - 0.5) * 4.0,
                (self.rng.random::<f32>() - 0.5) * 4.0,
            );
            let life = 30 + self.rng.random_range(0..30);
            self.particles.push(Particle { pos, vel, life, color });
        }
    }

    /// Trailing exhaust puff behind a thrusting ship
    pub fn spawn_exhaust(&mut self, ship_pos: Vec2, ship_rot: f32, ship_radius: f32) {
        let back = -heading_vec(ship_rot);
        let jitter = Vec2::new(
            self.rng.random::<f32>() - 0.5,
            self.rng.random::<f32>() - 0.5,
        );
        self.particles.push(Particle {
            pos: ship_pos + back * ship_radius,
            vel: back * 2.0 + jitter,
            life: 15,
            color: crate::renderer::colors::EXHAUST,
        });
    }
}
