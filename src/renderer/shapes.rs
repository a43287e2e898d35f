//! Shape generation for 2D primitives
//!
//! The original look is all strokes: wireframe ships, outlined rocks, round
//! bullets. Outlines become one thin quad (two triangles) per edge.

use glam::Vec2;
use std::f32::consts::TAU;

use super::vertex::Vertex;
use crate::sim::Asteroid;

/// Generate vertices for a filled circle (triangle fan)
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * TAU;
        let theta2 = ((i + 1) as f32 / segments as f32) * TAU;

        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Stroke a polyline as thin quads, optionally closing the loop
pub fn stroke_polyline(
    points: &[Vec2],
    closed: bool,
    width: f32,
    color: [f32; 4],
) -> Vec<Vertex> {
    if points.len() < 2 {
        return Vec::new();
    }

    let segment_count = if closed { points.len() } else { points.len() - 1 };
    let mut vertices = Vec::with_capacity(segment_count * 6);
    let half = width / 2.0;

    for i in 0..segment_count {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        let dir = (b - a).normalize_or_zero();
        let perp = Vec2::new(-dir.y, dir.x) * half;

        let (a1, a2) = (a + perp, a - perp);
        let (b1, b2) = (b + perp, b - perp);

        vertices.push(Vertex::new(a1.x, a1.y, color));
        vertices.push(Vertex::new(a2.x, a2.y, color));
        vertices.push(Vertex::new(b1.x, b1.y, color));

        vertices.push(Vertex::new(b1.x, b1.y, color));
        vertices.push(Vertex::new(a2.x, a2.y, color));
        vertices.push(Vertex::new(b2.x, b2.y, color));
    }

    vertices
}

/// Rotate a local-space point and move it to the entity position
#[inline]
fn place(local: Vec2, pos: Vec2, rot: f32) -> Vec2 {
    pos + Vec2::from_angle(rot).rotate(local)
}

/// Hull outline: nose at +x, notched tail
pub fn ship_outline(pos: Vec2, rot: f32, radius: f32) -> Vec<Vec2> {
    [
        Vec2::new(radius, 0.0),
        Vec2::new(-radius, radius * 0.8),
        Vec2::new(-radius * 0.6, 0.0),
        Vec2::new(-radius, -radius * 0.8),
    ]
    .into_iter()
    .map(|p| place(p, pos, rot))
    .collect()
}

/// Exhaust flame behind a thrusting ship (open polyline)
pub fn thrust_flame(pos: Vec2, rot: f32, radius: f32) -> Vec<Vec2> {
    [
        Vec2::new(-radius * 0.8, -radius * 0.4),
        Vec2::new(-radius * 1.5, 0.0),
        Vec2::new(-radius * 0.8, radius * 0.4),
    ]
    .into_iter()
    .map(|p| place(p, pos, rot))
    .collect()
}

/// Irregular rock outline from the per-vertex radius scales
pub fn asteroid_outline(asteroid: &Asteroid) -> Vec<Vec2> {
    let n = asteroid.shape.len();
    (0..n)
        .map(|i| {
            let angle = asteroid.rot + (i as f32 / n as f32) * TAU;
            let r = asteroid.radius * asteroid.shape[i];
            asteroid.pos + Vec2::new(angle.cos(), angle.sin()) * r
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::AsteroidSize;

    #[test]
    fn test_circle_vertex_count() {
        let verts = circle(Vec2::ZERO, 5.0, [1.0; 4], 8);
        assert_eq!(verts.len(), 8 * 3);
    }

    #[test]
    fn test_stroke_open_vs_closed() {
        let points = [Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0)];
        assert_eq!(stroke_polyline(&points, false, 2.0, [1.0; 4]).len(), 2 * 6);
        assert_eq!(stroke_polyline(&points, true, 2.0, [1.0; 4]).len(), 3 * 6);
        assert!(stroke_polyline(&points[..1], false, 2.0, [1.0; 4]).is_empty());
    }

    #[test]
    fn test_ship_nose_points_along_heading() {
        let nose = ship_outline(Vec2::new(100.0, 100.0), 0.0, 20.0)[0];
        assert!((nose - Vec2::new(120.0, 100.0)).length() < 1e-4);

        let rotated = ship_outline(Vec2::new(100.0, 100.0), std::f32::consts::FRAC_PI_2, 20.0)[0];
        assert!((rotated - Vec2::new(100.0, 120.0)).length() < 1e-4);
    }

    #[test]
    fn test_asteroid_outline_respects_shape_scales() {
        let asteroid = Asteroid {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            rot: 0.0,
            spin: 0.0,
            radius: 10.0,
            size: AsteroidSize::Small,
            shape: vec![1.2, 0.8, 1.0, 1.0],
        };
        let outline = asteroid_outline(&asteroid);
        assert_eq!(outline.len(), 4);
        assert!((outline[0].length() - 12.0).abs() < 1e-4);
        assert!((outline[1].length() - 8.0).abs() < 1e-4);
    }
}
