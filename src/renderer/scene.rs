//! Scene assembly
//!
//! Reads the simulation state and emits the frame's vertex list. Strictly
//! read-only: the render pass never writes anything back into the sim.

use super::shapes::{asteroid_outline, circle, ship_outline, stroke_polyline, thrust_flame};
use super::vertex::{Vertex, colors};
use crate::consts::BULLET_RADIUS;
use crate::sim::GameState;

const STROKE_WIDTH: f32 = 2.0;

/// Build the vertex list for one frame.
/// Draw order matches the original: particles under everything, then rocks,
/// bullets, ships on top.
pub fn build_scene(state: &GameState) -> Vec<Vertex> {
    let mut vertices = Vec::new();

    for particle in &state.particles {
        let mut color = particle.color;
        // Fade out over the particle's life budget
        color[3] = (particle.life as f32 / 60.0).min(1.0);
        vertices.extend(circle(particle.pos, 2.0, color, 6));
    }

    let accent = state.sector.accent;
    for asteroid in &state.asteroids {
        let outline = asteroid_outline(asteroid);
        vertices.extend(stroke_polyline(&outline, true, STROKE_WIDTH, accent));
    }

    for bullet in &state.bullets {
        vertices.extend(circle(bullet.pos, BULLET_RADIUS, colors::BULLET, 8));
    }

    for ship in &state.ships {
        if !ship.alive() {
            continue;
        }
        // Blink cue while the immunity window runs down
        if ship.invulnerable % 10 >= 5 {
            continue;
        }
        let hull = ship_outline(ship.pos, ship.rot, ship.radius);
        vertices.extend(stroke_polyline(&hull, true, STROKE_WIDTH, colors::ship_color(ship.id)));
        if ship.thrusting {
            let flame = thrust_flame(ship.pos, ship.rot, ship.radius);
            vertices.extend(stroke_polyline(&flame, false, STROKE_WIDTH, colors::EXHAUST));
        }
    }

    vertices
}
