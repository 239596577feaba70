//! Error types for GPU initialisation

use thiserror::Error;

/// Failures while bringing up the GPU context
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create a window surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no compatible GPU adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to request a GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("the surface reports no supported texture formats")]
    UnsupportedSurface,

    #[error("pipeline '{name}' could not be created: {reason}")]
    Pipeline { name: String, reason: String },
}
