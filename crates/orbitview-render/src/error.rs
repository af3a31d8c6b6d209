//! Rendering error types.

use thiserror::Error;

/// Errors that can occur during rendering operations.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Failed to create wgpu adapter.
    #[error("failed to create graphics adapter")]
    AdapterCreationFailed,

    /// Failed to create wgpu device.
    #[error("failed to create graphics device: {0}")]
    DeviceCreationFailed(#[from] wgpu::RequestDeviceError),

    /// Failed to create surface.
    #[error("failed to create surface: {0}")]
    SurfaceCreationFailed(#[from] wgpu::CreateSurfaceError),

    /// The surface reports no usable texture format.
    #[error("surface has no supported texture format")]
    SurfaceConfigurationFailed,

    /// Acquiring the next frame failed for a reason other than a stale surface.
    #[error("failed to acquire frame: {0}")]
    FrameAcquisitionFailed(String),

    /// Out of memory.
    #[error("out of memory")]
    OutOfMemory,

    /// Reading the rendered frame back from the GPU failed.
    #[error("GPU buffer mapping failed")]
    BufferMapFailed,

    /// The operation needs a headless engine.
    #[error("engine has a window surface; offscreen capture needs a headless engine")]
    NotHeadless,
}

/// A specialized Result type for rendering operations.
pub type RenderResult<T> = std::result::Result<T, RenderError>;
