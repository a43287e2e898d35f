//! Nova Strike - a dual-ship asteroids shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (input fusion, physics, collisions, game state)
//! - `renderer`: WebGPU rendering pipeline
//! - `maps`: Sector catalog (per-round tuning + palette)
//! - `highscores`: Persisted high score
//! - `advice`: Post-game advisory text service
//! - `audio`: Procedural Web Audio effects

pub mod advice;
pub mod audio;
pub mod highscores;
pub mod maps;
pub mod renderer;
pub mod sim;

pub use highscores::HighScore;
pub use maps::{SectorConfig, SectorId};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one tick per 60 Hz frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 5;

    /// Logical playfield dimensions (renderer letterboxes to the surface)
    pub const BOARD_WIDTH: f32 = 1200.0;
    pub const BOARD_HEIGHT: f32 = 800.0;

    /// Ship defaults
    pub const SHIP_RADIUS: f32 = 20.0;
    pub const SHIP_THRUST: f32 = 0.15;
    pub const SHIP_ROTATION_SPEED: f32 = 0.1;
    /// Per-tick velocity decay; the only speed limit (asymptotic, not clamped)
    pub const SHIP_FRICTION: f32 = 0.985;
    /// Post-spawn/post-hit immunity window, in ticks
    pub const SHIP_INVULN_TICKS: u32 = 120;
    pub const SHIP_LIVES: u32 = 3;

    /// Bullet defaults
    pub const BULLET_SPEED: f32 = 8.0;
    pub const BULLET_RADIUS: f32 = 2.0;
    pub const BULLET_LIFE_TICKS: u32 = 60;
    pub const BULLET_COOLDOWN_TICKS: u32 = 10;

    /// Asteroid defaults
    pub const ASTEROID_SPEED_BASE: f32 = 1.5;
    /// Radius-scale factors per asteroid vertex
    pub const ASTEROID_VERTEX_COUNT: usize = 10;
    /// Minimum spawn distance from any live ship
    pub const ASTEROID_SAFE_DISTANCE: f32 = 200.0;

    /// Analog stick dead zone
    pub const STICK_DEAD_ZONE: f32 = 0.12;
    /// Pause button debounce, in ticks (~0.5 s)
    pub const PAUSE_DEBOUNCE_TICKS: u32 = 30;
}

/// Unit vector along a heading angle
#[inline]
pub fn heading_vec(rotation: f32) -> Vec2 {
    Vec2::new(rotation.cos(), rotation.sin())
}

/// Wrap a coordinate into [-pad, limit + pad], teleporting across edges
#[inline]
pub fn wrap_coord(value: f32, limit: f32, pad: f32) -> f32 {
    if value < -pad {
        limit + pad
    } else if value > limit + pad {
        -pad
    } else {
        value
    }
}

/// Wrap a position into the padded board bounds
#[inline]
pub fn wrap_position(pos: Vec2, pad: f32) -> Vec2 {
    Vec2::new(
        wrap_coord(pos.x, consts::BOARD_WIDTH, pad),
        wrap_coord(pos.y, consts::BOARD_HEIGHT, pad),
    )
}
