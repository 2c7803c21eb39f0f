//! Error taxonomy for render passes.
//!
//! Math-level code never fails; these only come from parameter validation
//! and from acquiring device, program or surface resources.

/// Invalid parameters, rejected before any pixel work starts.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("max iterations must be at least 1")]
    ZeroIterations,
    #[error("view scale must be positive, got {0}")]
    NonPositiveViewScale(f64),
    #[error("raster {width}x{height} has no pixels")]
    EmptyRaster { width: u32, height: u32 },
}

/// The parallel path could not be brought up. Absorbed by the dispatcher,
/// which falls back to the scalar path.
#[derive(thiserror::Error, Debug)]
pub enum DeviceInitializationError {
    #[error("no graphics adapter available")]
    NoAdapter,
    #[error("failed to open graphics device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("fractal program failed to compile:\n{0}")]
    ShaderCompilation(String),
    #[error("fractal program failed to link:\n{0}")]
    PipelineLink(String),
}

#[derive(thiserror::Error, Debug)]
pub enum SurfaceError {
    #[error("no drawable target: {0}")]
    Unavailable(String),
    #[error("frame is {actual:?} but the surface is {expected:?}")]
    SizeMismatch {
        expected: crate::screen::Size,
        actual: crate::screen::Size,
    },
    #[error("failed to read frame back from the device: {0}")]
    Readback(#[from] wgpu::BufferAsyncError),
}

/// Why a render pass produced no frame.
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}
