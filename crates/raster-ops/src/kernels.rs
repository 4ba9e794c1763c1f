//! Common convolution kernels.
//!
//! The processor applies weights exactly as given and never normalizes;
//! the blur kernels here are built to sum to 1.
//!
//! - [`box_blur`] - simple average
//! - [`gaussian`] - Gaussian blur
//! - [`sharpen`] - 4-neighbor sharpening
//! - [`laplacian`] - edge detection
//! - [`sobel_x`] / [`sobel_y`] - horizontal / vertical gradients
//! - [`emboss`] - relief effect
//!
//! # Example
//!
//! ```rust
//! use raster_ops::kernels;
//!
//! let k = kernels::gaussian(5, 1.5).unwrap();
//! assert_eq!((k.rows(), k.columns()), (5, 5));
//! assert!((k.sum() - 1.0).abs() < 1e-5);
//! ```

use crate::{OpsError, OpsResult};
use raster_math::DenseMatrix;

#[inline]
fn odd(size: usize) -> usize {
    if size % 2 == 0 { size + 1 } else { size }
}

fn square(values: [[f32; 3]; 3]) -> DenseMatrix<f32> {
    DenseMatrix::from_fn(3, 3, |r, c| values[r][c])
}

/// 1x1 kernel that leaves pixels unchanged.
pub fn identity() -> DenseMatrix<f32> {
    DenseMatrix::from_fn(1, 1, |_, _| 1.0)
}

/// `size x size` average. Even sizes grow to the next odd size.
///
/// ```rust
/// use raster_ops::kernels;
///
/// let k = kernels::box_blur(4);
/// assert_eq!(k.rows(), 5);
/// ```
pub fn box_blur(size: usize) -> DenseMatrix<f32> {
    let size = odd(size);
    let weight = 1.0 / (size * size) as f32;
    DenseMatrix::from_fn(size, size, |_, _| weight)
}

/// Normalized `size x size` Gaussian. Even sizes grow to the next odd size.
///
/// # Errors
///
/// Returns [`OpsError::InvalidParameter`] unless `sigma` is finite and
/// positive.
pub fn gaussian(size: usize, sigma: f32) -> OpsResult<DenseMatrix<f32>> {
    if !(sigma.is_finite() && sigma > 0.0) {
        return Err(OpsError::InvalidParameter(format!(
            "gaussian sigma must be positive, got {sigma}"
        )));
    }
    let size = odd(size);
    let half = (size / 2) as f32;
    let sigma2 = 2.0 * sigma * sigma;

    let weights = DenseMatrix::from_fn(size, size, |r, c| {
        let (dy, dx) = (r as f32 - half, c as f32 - half);
        (-(dx * dx + dy * dy) / sigma2).exp()
    });
    Ok(&weights * weights.sum().recip())
}

/// 3x3 sharpen; `amount` scales the neighbor weights. Sums to 1.
pub fn sharpen(amount: f32) -> DenseMatrix<f32> {
    let a = -amount;
    square([[0.0, a, 0.0], [a, 1.0 + 4.0 * amount, a], [0.0, a, 0.0]])
}

/// 3x3 Laplacian. Sums to 0.
pub fn laplacian() -> DenseMatrix<f32> {
    square([[0.0, -1.0, 0.0], [-1.0, 4.0, -1.0], [0.0, -1.0, 0.0]])
}

/// 3x3 Sobel operator for horizontal gradients.
pub fn sobel_x() -> DenseMatrix<f32> {
    square([[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]])
}

/// 3x3 Sobel operator for vertical gradients.
pub fn sobel_y() -> DenseMatrix<f32> {
    sobel_x().transpose()
}

/// 3x3 emboss.
pub fn emboss() -> DenseMatrix<f32> {
    square([[-2.0, -1.0, 0.0], [-1.0, 1.0, 1.0], [0.0, 1.0, 2.0]])
}
