//! Convolution processor.
//!
//! [`ConvolutionProcessor`] applies a dense kernel to a rectangular region
//! of a [`Frame`]:
//!
//! 1. The region is resolved against the frame; an empty result is a no-op.
//! 2. The destination is reserved from the pool and duplicated from the frame.
//! 3. The region's rows are split into bands and convolved in parallel,
//!    always reading the untouched frame and writing the destination.
//! 4. The destination is committed with [`Frame::swap_or_copy`].
//!
//! Pixels outside the region are never written, and neighbors outside it
//! are never read: sampling clamps to the region's edges.
//!
//! # Example
//!
//! ```rust
//! use raster_core::{Frame, Rect, Rgba};
//! use raster_ops::{kernels, ConvolutionProcessor, ProcessorConfig};
//!
//! let mut frame: Frame<Rgba<u8>> = Frame::filled(32, 32, Rgba::new(200, 100, 50, 255));
//! let blur = ConvolutionProcessor::new(kernels::box_blur(3), true).unwrap();
//! blur.apply(&mut frame, Rect::new(8, 8, 16, 16), &ProcessorConfig::default()).unwrap();
//! assert_eq!(frame.pixel(16, 16), Rgba::new(200, 100, 50, 255));
//! ```

use crate::config::ProcessorConfig;
use crate::engine::{ConvolveFn, Window, convolve_row, convolve3, convolve4};
use crate::parallel::run_bands;
use crate::{OpsError, OpsResult};
use raster_core::{Frame, Roi, VectorPixel};
use raster_math::DenseMatrix;
use std::sync::Arc;
use tracing::{debug, trace};

/// Applies a fixed kernel to frames.
///
/// The processor is immutable and `Send + Sync`; one instance can serve
/// any number of frames and threads.
#[derive(Debug, Clone)]
pub struct ConvolutionProcessor {
    kernel: Arc<DenseMatrix<f32>>,
    preserve_alpha: bool,
}

impl ConvolutionProcessor {
    /// Creates a processor.
    ///
    /// With `preserve_alpha` only R, G and B are convolved and every pixel
    /// keeps its alpha; otherwise all four channels are convolved.
    ///
    /// # Errors
    ///
    /// Returns [`OpsError::InvalidKernel`] if the kernel has no rows or no
    /// columns.
    pub fn new(kernel: impl Into<Arc<DenseMatrix<f32>>>, preserve_alpha: bool) -> OpsResult<Self> {
        let kernel = kernel.into();
        if kernel.is_empty() {
            return Err(OpsError::InvalidKernel(format!(
                "kernel must have at least one row and column, got {}x{}",
                kernel.rows(),
                kernel.columns()
            )));
        }
        Ok(Self { kernel, preserve_alpha })
    }

    /// The kernel weights.
    #[inline]
    pub fn kernel(&self) -> &DenseMatrix<f32> {
        &self.kernel
    }

    /// Whether alpha is left unconvolved.
    #[inline]
    pub fn preserve_alpha(&self) -> bool {
        self.preserve_alpha
    }

    /// Convolves the pixels of `frame` inside `roi`.
    ///
    /// # Errors
    ///
    /// - [`OpsError::InvalidParameter`] for an unusable configuration
    /// - [`OpsError::Core`] if the destination or a scratch buffer cannot
    ///   be allocated
    /// - [`OpsError::ThreadPool`] if a pool has to be started for this call
    ///   and cannot be
    ///
    /// On error `frame` is left exactly as it was.
    pub fn apply<P: VectorPixel>(
        &self,
        frame: &mut Frame<P>,
        roi: impl Into<Roi>,
        config: &ProcessorConfig,
    ) -> OpsResult<()> {
        config.validate()?;
        let rect = roi.into().resolve(frame.width(), frame.height());
        let Some(window) = Window::from_rect(rect) else {
            trace!(width = frame.width(), height = frame.height(), "empty region, nothing to do");
            return Ok(());
        };

        debug!(
            width = frame.width(),
            height = frame.height(),
            %rect,
            kernel_rows = self.kernel.rows(),
            kernel_cols = self.kernel.columns(),
            preserve_alpha = self.preserve_alpha,
            "convolve"
        );

        let _reservation = config.pool.reserve(frame.byte_size())?;
        let mut dest = frame.try_duplicate()?;

        let convolve: ConvolveFn<P> = if self.preserve_alpha {
            convolve3::<P>
        } else {
            convolve4::<P>
        };
        let kernel = &*self.kernel;
        let conversion = config.conversion;
        let source: &Frame<P> = frame;
        let stride = source.width() as usize;

        run_bands(
            dest.rows_mut(rect.y..rect.bottom()),
            source.width(),
            rect,
            config.parallelism,
            config.thread_pool(),
            &config.pool,
            |band, rows, scratch| {
                for (y, row) in band.row_range().zip(rows.chunks_exact_mut(stride)) {
                    let row = &mut row[band.columns()];
                    P::load_row(row, scratch, conversion);
                    convolve_row(convolve, kernel, source, y, &window, conversion, scratch);
                    P::store_row(scratch, row, conversion);
                }
                Ok(())
            },
        )?;

        let commit = frame.swap_or_copy(dest)?;
        trace!(?commit, "committed");
        Ok(())
    }
}
