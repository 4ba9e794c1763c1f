//! # raster-ops
//!
//! Row-parallel 2-D convolution for raster frames.
//!
//! # Modules
//!
//! - [`processor`] - [`ConvolutionProcessor`], the region-aware entry point
//! - [`engine`] - per-sample convolution with clamp-to-edge sampling
//! - [`parallel`] - static row bands executed on Rayon
//! - [`config`] - [`ProcessorConfig`] and its builder
//! - [`kernels`] - common kernels (blur, sharpen, edge detection)
//!
//! # Example
//!
//! ```rust
//! use raster_core::{Frame, Roi, Rgba};
//! use raster_ops::{convolve, kernels, ProcessorConfig};
//!
//! let mut frame: Frame<Rgba<u8>> = Frame::filled(64, 64, Rgba::new(10, 20, 30, 255));
//! let kernel = kernels::gaussian(5, 1.2).unwrap();
//! convolve(&mut frame, kernel, Roi::Full, true, &ProcessorConfig::default()).unwrap();
//! assert_eq!(frame.pixel(0, 0), Rgba::new(10, 20, 30, 255));
//! ```
//!
//! # Alpha
//!
//! With `preserve_alpha` the kernel is applied to R, G and B only and each
//! pixel keeps its original alpha. Without it all four channels are
//! convolved, which is what premultiplied data wants.
//!
//! # Boundaries
//!
//! Neighbors are clamped to the edges of the processed region, not the
//! frame. Convolving a sub-rectangle therefore never reads pixels outside
//! it.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod config;
pub mod engine;
pub mod kernels;
pub mod parallel;
pub mod processor;

pub use config::{ProcessorConfig, ProcessorConfigBuilder};
pub use error::{OpsError, OpsResult};
pub use parallel::{Parallelism, RowBand};
pub use processor::ConvolutionProcessor;

use raster_core::{Frame, Roi, VectorPixel};
use raster_math::DenseMatrix;

/// Convolves `frame` inside `roi` with a one-off processor.
///
/// Equivalent to [`ConvolutionProcessor::new`] followed by
/// [`ConvolutionProcessor::apply`]. Build a processor directly to reuse a
/// kernel across frames.
///
/// # Errors
///
/// Returns [`OpsError::InvalidKernel`] for an empty kernel, otherwise see
/// [`ConvolutionProcessor::apply`].
pub fn convolve<P: VectorPixel>(
    frame: &mut Frame<P>,
    kernel: DenseMatrix<f32>,
    roi: impl Into<Roi>,
    preserve_alpha: bool,
    config: &ProcessorConfig,
) -> OpsResult<()> {
    ConvolutionProcessor::new(kernel, preserve_alpha)?.apply(frame, roi, config)
}
