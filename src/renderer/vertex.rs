//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
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

/// Scale a color's alpha
pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * alpha]
}

/// Colors for game elements (sRGB)
pub mod colors {
    /// #FF4D6D
    pub const RED: [f32; 4] = [1.0, 0.302, 0.427, 1.0];
    /// #2EC4B6
    pub const BLUE: [f32; 4] = [0.180, 0.769, 0.714, 1.0];
    /// Ball while ghost mode is active
    pub const GHOST: [f32; 4] = [1.0, 1.0, 1.0, 0.7];
    /// #FFF9F0
    pub const BACKGROUND: [f32; 4] = [1.0, 0.976, 0.941, 1.0];
    /// #E9E3D8
    pub const GRID: [f32; 4] = [0.914, 0.890, 0.847, 1.0];
    /// #7209B7
    pub const ACCENT_PURPLE: [f32; 4] = [0.447, 0.035, 0.718, 1.0];
    /// #FFB703
    pub const ACCENT_YELLOW: [f32; 4] = [1.0, 0.718, 0.012, 1.0];
    pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
}
