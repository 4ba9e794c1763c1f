//! Per-sample convolution kernels.
//!
//! Two variants share one algorithm and differ only in how many channels
//! they write:
//!
//! - [`convolve3`] - weighted sum over R, G, B; the output vector's alpha is
//!   left as it was (the caller loads it from the unconvolved pixel)
//! - [`convolve4`] - weighted sum over all four channels
//!
//! # Boundary Policy
//!
//! Clamp-to-edge against a [`Window`]: for kernel cell `(i, j)` and output
//! `(x, y)` the sample is taken at
//!
//! ```text
//! sx = clamp(x + j - cx, min_x, max_x)
//! sy = clamp(y + i - cy, min_y, max_y)
//! ```
//!
//! where `(cy, cx)` is [`DenseMatrix::center`]. The window is the working
//! rectangle, not the frame, so pixels outside the processed region are
//! never sampled.
//!
//! Samples are always read from the source frame. Nothing here writes to
//! a frame, so outputs never depend on each other.

use raster_core::{Conversion, Frame, Rect, Vec4, VectorPixel};
use raster_math::DenseMatrix;

/// Inclusive bounds that neighbor coordinates are clamped into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// Smallest valid X
    pub min_x: u32,
    /// Largest valid X
    pub max_x: u32,
    /// Smallest valid Y
    pub min_y: u32,
    /// Largest valid Y
    pub max_y: u32,
}

impl Window {
    /// Window covering `rect`, or `None` if it is empty.
    pub fn from_rect(rect: Rect) -> Option<Self> {
        if rect.is_empty() {
            return None;
        }
        Some(Self {
            min_x: rect.x,
            max_x: rect.right() - 1,
            min_y: rect.y,
            max_y: rect.bottom() - 1,
        })
    }

    /// Clamps a column coordinate into the window.
    #[inline]
    pub fn clamp_x(&self, x: i64) -> u32 {
        x.clamp(self.min_x as i64, self.max_x as i64) as u32
    }

    /// Clamps a row coordinate into the window.
    #[inline]
    pub fn clamp_y(&self, y: i64) -> u32 {
        y.clamp(self.min_y as i64, self.max_y as i64) as u32
    }
}

/// Signature shared by [`convolve3`] and [`convolve4`].
pub type ConvolveFn<P> = fn(&DenseMatrix<f32>, &Frame<P>, u32, u32, &Window, Conversion, &mut Vec4);

/// Convolves R, G, B at `(x, y)` into `out`, leaving `out[3]` untouched.
#[inline]
pub fn convolve3<P: VectorPixel>(
    kernel: &DenseMatrix<f32>,
    source: &Frame<P>,
    x: u32,
    y: u32,
    window: &Window,
    conversion: Conversion,
    out: &mut Vec4,
) {
    convolve::<3, P>(kernel, source, x, y, window, conversion, out);
}

/// Convolves all four channels at `(x, y)` into `out`.
#[inline]
pub fn convolve4<P: VectorPixel>(
    kernel: &DenseMatrix<f32>,
    source: &Frame<P>,
    x: u32,
    y: u32,
    window: &Window,
    conversion: Conversion,
    out: &mut Vec4,
) {
    convolve::<4, P>(kernel, source, x, y, window, conversion, out);
}

/// Runs `f` for every column of the window on row `y`.
///
/// `row[i]` holds the vector for column `window.min_x + i` and is
/// overwritten in place.
pub fn convolve_row<P: VectorPixel>(
    f: ConvolveFn<P>,
    kernel: &DenseMatrix<f32>,
    source: &Frame<P>,
    y: u32,
    window: &Window,
    conversion: Conversion,
    row: &mut [Vec4],
) {
    debug_assert_eq!(row.len() as u32, window.max_x - window.min_x + 1);
    for (x, out) in (window.min_x..).zip(row.iter_mut()) {
        f(kernel, source, x, y, window, conversion, out);
    }
}

#[inline(always)]
fn accumulate<const N: usize>(acc: &mut [f32; N], weight: f32, sample: Vec4) {
    for c in 0..N {
        acc[c] += weight * sample[c];
    }
}

#[inline]
fn convolve<const N: usize, P: VectorPixel>(
    kernel: &DenseMatrix<f32>,
    source: &Frame<P>,
    x: u32,
    y: u32,
    window: &Window,
    conversion: Conversion,
    out: &mut Vec4,
) {
    debug_assert!(!kernel.is_empty(), "empty kernels are rejected by the processor");
    let (k_rows, k_cols) = (kernel.rows(), kernel.columns());
    let (cy, cx) = kernel.center();
    let weights = kernel.as_slice();
    let x0 = x as i64 - cx as i64;
    let y0 = y as i64 - cy as i64;
    let mut acc = [0.0f32; N];

    let interior = x0 >= window.min_x as i64
        && x0 + k_cols as i64 - 1 <= window.max_x as i64
        && y0 >= window.min_y as i64
        && y0 + k_rows as i64 - 1 <= window.max_y as i64;

    if interior {
        let x0 = x0 as usize;
        for (i, w_row) in weights.chunks_exact(k_cols).enumerate() {
            let src = &source.row(y0 as u32 + i as u32)[x0..x0 + k_cols];
            for (px, &w) in src.iter().zip(w_row) {
                accumulate(&mut acc, w, px.to_vector(conversion));
            }
        }
    } else {
        for (i, w_row) in weights.chunks_exact(k_cols).enumerate() {
            let src = source.row(window.clamp_y(y0 + i as i64));
            for (j, &w) in w_row.iter().enumerate() {
                let sx = window.clamp_x(x0 + j as i64) as usize;
                accumulate(&mut acc, w, src[sx].to_vector(conversion));
            }
        }
    }

    out[..N].copy_from_slice(&acc);
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use raster_core::{Luma, Rgba};

    fn ramp(width: u32, height: u32) -> Frame<Rgba<f32>> {
        let data = (0..width * height)
            .map(|i| {
                let v = i as f32 / 16.0;
                Rgba::new(v, v * 0.5, 1.0 - v, 0.25 + v * 0.01)
            })
            .collect();
        Frame::from_data(width, height, data).unwrap()
    }

    /// Straightforward clamped convolution used as a reference.
    fn reference(
        kernel: &DenseMatrix<f32>,
        src: &Frame<Rgba<f32>>,
        x: u32,
        y: u32,
        w: &Window,
    ) -> Vec4 {
        let (cy, cx) = kernel.center();
        let mut acc = [0.0f32; 4];
        for i in 0..kernel.rows() {
            for j in 0..kernel.columns() {
                let sx = w.clamp_x(x as i64 + j as i64 - cx as i64);
                let sy = w.clamp_y(y as i64 + i as i64 - cy as i64);
                let v = src.pixel(sx, sy).to_vector(Conversion::Linear);
                let k = kernel.get(i, j).unwrap();
                for c in 0..4 {
                    acc[c] += k * v[c];
                }
            }
        }
        acc
    }

    #[test]
    fn test_window_from_rect() {
        let w = Window::from_rect(Rect::new(2, 3, 4, 5)).unwrap();
        assert_eq!((w.min_x, w.max_x, w.min_y, w.max_y), (2, 5, 3, 7));
        assert_eq!(w.clamp_x(-4), 2);
        assert_eq!(w.clamp_x(9), 5);
        assert_eq!(w.clamp_y(4), 4);
        assert!(Window::from_rect(Rect::new(2, 3, 0, 5)).is_none());
    }

    #[test]
    fn test_convolve4_matches_reference_everywhere() {
        let src = ramp(7, 6);
        let kernel = DenseMatrix::from_fn(3, 5, |r, c| (r * 5 + c) as f32 * 0.01 - 0.05);
        let w = Window::from_rect(src.bounds()).unwrap();
        for y in 0..6 {
            for x in 0..7 {
                let mut out = [0.0; 4];
                convolve4(&kernel, &src, x, y, &w, Conversion::Linear, &mut out);
                let expected = reference(&kernel, &src, x, y, &w);
                for c in 0..4 {
                    assert_abs_diff_eq!(out[c], expected[c], epsilon = 1e-6);
                }
            }
        }
    }

    #[test]
    fn test_convolve3_leaves_alpha() {
        let src = ramp(4, 4);
        let kernel = DenseMatrix::from_fn(3, 3, |_, _| 1.0 / 9.0);
        let w = Window::from_rect(src.bounds()).unwrap();
        let mut out = [0.0, 0.0, 0.0, 0.75];
        convolve3(&kernel, &src, 1, 1, &w, Conversion::Linear, &mut out);
        assert_eq!(out[3], 0.75);
        let expected = reference(&kernel, &src, 1, 1, &w);
        assert_abs_diff_eq!(out[0], expected[0], epsilon = 1e-6);
    }

    #[test]
    fn test_corner_clamps_to_edge() {
        // 2x2 white with a black top-left corner, 3x3 box.
        let mut src: Frame<Luma<f32>> = Frame::filled(2, 2, Luma::new(1.0));
        src.set_pixel(0, 0, Luma::new(0.0));
        let kernel = DenseMatrix::from_fn(3, 3, |_, _| 1.0 / 9.0);
        let w = Window::from_rect(src.bounds()).unwrap();

        // At (0, 0) the corner is sampled four times through clamping.
        let mut out = [0.0; 4];
        convolve4(&kernel, &src, 0, 0, &w, Conversion::Linear, &mut out);
        assert_abs_diff_eq!(out[0], 5.0 / 9.0, epsilon = 1e-6);

        // At (1, 1) it is sampled once.
        convolve4(&kernel, &src, 1, 1, &w, Conversion::Linear, &mut out);
        assert_abs_diff_eq!(out[0], 8.0 / 9.0, epsilon = 1e-6);
    }

    #[test]
    fn test_window_limits_sampling() {
        // Column 0 is bright but outside the window; it must never be read.
        let mut src: Frame<Luma<f32>> = Frame::filled(4, 1, Luma::new(0.0));
        src.set_pixel(0, 0, Luma::new(100.0));
        let kernel = DenseMatrix::new(1, 3, vec![1.0, 1.0, 1.0]).unwrap();
        let w = Window::from_rect(Rect::new(1, 0, 3, 1)).unwrap();
        let mut out = [0.0; 4];
        convolve4(&kernel, &src, 1, 0, &w, Conversion::Linear, &mut out);
        assert_eq!(out[0], 0.0);
    }

    #[test]
    fn test_even_kernel_center() {
        // 1x2 kernel centered on column 1: samples x-1 and x.
        let data = (0..4).map(|i| Luma::new(i as f32)).collect();
        let src: Frame<Luma<f32>> = Frame::from_data(4, 1, data).unwrap();
        let kernel = DenseMatrix::new(1, 2, vec![1.0, 10.0]).unwrap();
        let w = Window::from_rect(src.bounds()).unwrap();
        let mut out = [0.0; 4];
        convolve4(&kernel, &src, 2, 0, &w, Conversion::Linear, &mut out);
        assert_eq!(out[0], 1.0 + 20.0);
        convolve4(&kernel, &src, 0, 0, &w, Conversion::Linear, &mut out);
        assert_eq!(out[0], 0.0);
    }

    #[test]
    fn test_convolve_row() {
        let src: Frame<Luma<f32>> = Frame::filled(5, 3, Luma::new(0.5));
        let kernel = DenseMatrix::from_fn(3, 3, |_, _| 1.0 / 9.0);
        let w = Window::from_rect(Rect::new(1, 0, 3, 3)).unwrap();
        let mut row = vec![[0.0, 0.0, 0.0, 0.3]; 3];
        convolve_row(convolve3, &kernel, &src, 1, &w, Conversion::Linear, &mut row);
        for v in row {
            assert_abs_diff_eq!(v[0], 0.5, epsilon = 1e-6);
            assert_eq!(v[3], 0.3);
        }
    }
}
