//! WebGPU rendering module
//!
//! Flat-coloured triangles in canvas pixel space. `scene` turns a simulation
//! snapshot into vertices; `pipeline` owns the GPU objects and draws them.

pub mod anim;
pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

use std::fmt;

pub use anim::{Animator, ChickenPose};
pub use pipeline::RenderState;
pub use vertex::Vertex;

/// GPU setup failure. Fatal for rendering only; the game keeps running.
#[derive(Debug)]
pub enum InitError {
    Surface(wgpu::CreateSurfaceError),
    Adapter(wgpu::RequestAdapterError),
    Device(wgpu::RequestDeviceError),
    /// Surface reports no usable texture format
    NoSurfaceFormat,
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitError::Surface(e) => write!(f, "failed to create surface: {}", e),
            InitError::Adapter(e) => write!(f, "no suitable GPU adapter: {}", e),
            InitError::Device(e) => write!(f, "failed to create device: {}", e),
            InitError::NoSurfaceFormat => write!(f, "surface has no supported format"),
        }
    }
}

impl std::error::Error for InitError {}

impl From<wgpu::CreateSurfaceError> for InitError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        InitError::Surface(e)
    }
}

impl From<wgpu::RequestAdapterError> for InitError {
    fn from(e: wgpu::RequestAdapterError) -> Self {
        InitError::Adapter(e)
    }
}

impl From<wgpu::RequestDeviceError> for InitError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        InitError::Device(e)
    }
}

/// Per-frame render failure. Never fatal: the loop logs it and carries on.
#[derive(Debug)]
pub enum FrameError {
    /// Could not acquire the next surface texture
    Surface(wgpu::SurfaceError),
    /// Canvas has no area (hidden or collapsed); nothing to draw
    ZeroSize,
}

impl FrameError {
    /// Surface needs reconfiguring before the next frame
    pub fn needs_reconfigure(&self) -> bool {
        matches!(
            self,
            FrameError::Surface(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)
        )
    }
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::Surface(e) => write!(f, "surface error: {}", e),
            FrameError::ZeroSize => write!(f, "canvas has zero size"),
        }
    }
}

impl std::error::Error for FrameError {}

impl From<wgpu::SurfaceError> for FrameError {
    fn from(e: wgpu::SurfaceError) -> Self {
        FrameError::Surface(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lost_and_outdated_reconfigure() {
        assert!(FrameError::Surface(wgpu::SurfaceError::Lost).needs_reconfigure());
        assert!(FrameError::Surface(wgpu::SurfaceError::Outdated).needs_reconfigure());
        assert!(!FrameError::Surface(wgpu::SurfaceError::Timeout).needs_reconfigure());
        assert!(!FrameError::ZeroSize.needs_reconfigure());
    }
}
