//! Error types for raster operations.

use thiserror::Error;

/// Error type for raster operations.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Kernel cannot be used for convolution.
    #[error("invalid kernel: {0}")]
    InvalidKernel(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Worker thread pool could not be built.
    #[error("thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Buffer-layer failure (allocation, dimensions, bounds).
    #[error(transparent)]
    Core(#[from] raster_core::Error),

    /// Matrix construction failure.
    #[error(transparent)]
    Matrix(#[from] raster_math::MatrixError),
}

impl OpsError {
    /// Returns `true` if this error comes from a failed allocation.
    pub fn is_allocation_error(&self) -> bool {
        matches!(self, Self::Core(e) if e.is_allocation_error())
    }
}

/// Result type for raster operations.
pub type OpsResult<T> = Result<T, OpsError>;
