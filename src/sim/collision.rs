//! Collision detection for the asteroid field
//!
//! Everything is circle-circle in the logical 1200x800 space. The asymmetry
//! worth knowing: ships collide on the sum of both radii, bullets only on the
//! asteroid's radius (a bullet is treated as a point).

use glam::Vec2;

use crate::sim::state::{Asteroid, Ship};

/// Circle-circle proximity test
#[inline]
pub fn circles_overlap(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> bool {
    a_pos.distance(b_pos) < a_radius + b_radius
}

/// Ship-asteroid test; the caller is responsible for skipping invulnerable
/// and out-of-lives ships
#[inline]
pub fn ship_hits_asteroid(ship: &Ship, asteroid: &Asteroid) -> bool {
    circles_overlap(ship.pos, ship.radius, asteroid.pos, asteroid.radius)
}

/// Bullet-asteroid test; the asteroid radius alone gates the hit
#[inline]
pub fn bullet_hits_asteroid(bullet_pos: Vec2, asteroid: &Asteroid) -> bool {
    bullet_pos.distance(asteroid.pos) < asteroid.radius
}
