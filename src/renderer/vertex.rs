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

/// Colors for game elements
pub mod colors {
    pub const SKY: [f32; 4] = [0.62, 0.82, 0.95, 1.0];
    pub const HEDGE: [f32; 4] = [0.18, 0.45, 0.2, 1.0];
    pub const HEDGE_DARK: [f32; 4] = [0.12, 0.36, 0.15, 1.0];
    pub const GRASS: [f32; 4] = [0.35, 0.7, 0.25, 1.0];
    pub const SOIL: [f32; 4] = [0.45, 0.32, 0.2, 1.0];
    pub const SOIL_DARK: [f32; 4] = [0.38, 0.26, 0.16, 1.0];
    pub const CHICKEN: [f32; 4] = [0.98, 0.96, 0.9, 1.0];
    pub const COMB: [f32; 4] = [0.9, 0.15, 0.15, 1.0];
    pub const BEAK: [f32; 4] = [0.96, 0.58, 0.11, 1.0];
    pub const EYE: [f32; 4] = [0.05, 0.05, 0.05, 1.0];
    pub const BIKER: [f32; 4] = [0.25, 0.3, 0.55, 1.0];
    pub const WHEEL: [f32; 4] = [0.1, 0.1, 0.1, 1.0];
    pub const LEAVES: [f32; 4] = [0.8, 0.5, 0.15, 1.0];
    pub const GNOME: [f32; 4] = [0.85, 0.2, 0.2, 1.0];
    pub const BIRDBATH: [f32; 4] = [0.7, 0.72, 0.75, 1.0];
    pub const STATUE: [f32; 4] = [0.55, 0.56, 0.6, 1.0];
    pub const POST: [f32; 4] = [0.55, 0.38, 0.22, 1.0];
    pub const TALL_POST: [f32; 4] = [0.45, 0.3, 0.18, 1.0];
    pub const DRAGONFLY: [f32; 4] = [0.2, 0.6, 0.9, 1.0];
    pub const WORM: [f32; 4] = [0.9, 0.55, 0.6, 1.0];
    pub const BONUS: [f32; 4] = [0.96, 0.58, 0.11, 1.0];
}
