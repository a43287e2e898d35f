//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements (asteroid stroke comes from the sector accent)
pub mod colors {
    pub const SHIP_ONE: [f32; 4] = [0.23, 0.51, 0.96, 1.0];
    pub const SHIP_TWO: [f32; 4] = [0.06, 0.73, 0.51, 1.0];
    pub const EXHAUST: [f32; 4] = [0.98, 0.80, 0.08, 1.0];
    pub const BULLET: [f32; 4] = [0.96, 0.25, 0.37, 1.0];

    /// Hull color by ship id
    pub fn ship_color(id: usize) -> [f32; 4] {
        if id == 0 { SHIP_ONE } else { SHIP_TWO }
    }
}
