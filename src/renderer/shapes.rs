//! Shape generation for 2D primitives
//!
//! All shapes are in canvas pixels (origin top-left, y down).

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Generate vertices for a filled axis-aligned rectangle
pub fn rect(pos: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let (x0, y0) = (pos.x, pos.y);
    let (x1, y1) = (pos.x + size.x, pos.y + size.y);
    vec![
        Vertex::new(x0, y0, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x1, y1, color),
    ]
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
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

/// Horizontal band tiled with alternating stripes, shifted by `offset`
pub fn striped_band(
    y: f32,
    height: f32,
    width: f32,
    tile: f32,
    offset: f32,
    base: [f32; 4],
    stripe: [f32; 4],
) -> Vec<Vertex> {
    let mut vertices = rect(Vec2::new(0.0, y), Vec2::new(width, height), base);

    let mut x = offset;
    while x < width {
        let start = x.max(0.0);
        let end = (x + tile * 0.5).min(width);
        if end > start {
            vertices.extend(rect(
                Vec2::new(start, y),
                Vec2::new(end - start, height),
                stripe,
            ));
        }
        x += tile;
    }

    vertices
}

/// Same colour with alpha multiplied
pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * alpha.clamp(0.0, 1.0)]
}
