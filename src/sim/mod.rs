//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only, one tick per frame callback
//! - Seeded RNG only
//! - Stable iteration order (insertion order of the entity vecs)
//! - No rendering or platform dependencies; the shell feeds plain-data
//!   device snapshots in and drains events out

pub mod collision;
pub mod input;
pub mod state;
pub mod tick;

pub use collision::{bullet_hits_asteroid, circles_overlap, ship_hits_asteroid};
pub use input::{KeyboardState, PadButton, PadSnapshot, ShipControls, TickInput, fuse};
pub use state::{
    Asteroid, AsteroidSize, Bullet, GameEvent, GamePhase, GameState, Particle, Ship,
};
pub use tick::tick;
