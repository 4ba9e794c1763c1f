//! Frame buffer types.
//!
//! - [`Frame`] - Owned, row-addressable pixel buffer
//! - [`FrameView`] - Immutable borrowed view into a sub-rectangle
//!
//! # Memory Layout
//!
//! Pixels are stored in **row-major** order, top-to-bottom, with no row
//! padding. Each element is one [`VectorPixel`] layout value, so an
//! `Frame<Rgba<u8>>` row is `[R G B A R G B A ...]` in memory.
//!
//! # Storage Identity
//!
//! The pixel buffer lives in an [`Arc<Vec<P>>`]. Cloning a frame is cheap
//! and shares storage; the first mutation of a shared frame copies it.
//! [`Frame::swap_or_copy`] replaces a frame's content with another frame's
//! while the frame object itself stays where it is, which is how
//! processors commit their results.
//!
//! # Usage
//!
//! ```rust
//! use raster_core::{Frame, Rgba};
//!
//! let mut frame: Frame<Rgba<u8>> = Frame::filled(64, 32, Rgba::black());
//! frame.set_pixel(3, 4, Rgba::white());
//! assert_eq!(frame.pixel(3, 4), Rgba::white());
//! assert_eq!(frame.row(4).len(), 64);
//! ```

use crate::{Error, Rect, Result, VectorPixel};
use std::ops::Range;
use std::sync::Arc;

/// Outcome of [`Frame::swap_or_copy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    /// Storage handles were exchanged in O(1).
    Swapped,
    /// Pixels were copied because the other storage was shared.
    Copied,
}

/// Owned pixel buffer.
///
/// # Example
///
/// ```rust
/// use raster_core::{Frame, Rgb};
///
/// let frame: Frame<Rgb<f32>> = Frame::new(1920, 1080);
/// assert_eq!(frame.dimensions(), (1920, 1080));
/// assert_eq!(frame.pixel(0, 0), Rgb::new(0.0, 0.0, 0.0));
/// ```
#[derive(Clone)]
pub struct Frame<P: VectorPixel> {
    data: Arc<Vec<P>>,
    width: u32,
    height: u32,
}

impl<P: VectorPixel> Frame<P> {
    /// Creates a frame of default (zero) pixels.
    ///
    /// # Panics
    ///
    /// Panics if allocation fails. Use [`try_new`](Self::try_new) to handle
    /// that case.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, P::default())
    }

    /// Creates a frame of default pixels, reporting allocation failure.
    pub fn try_new(width: u32, height: u32) -> Result<Self> {
        let len = pixel_len(width, height)?;
        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|e| {
            Error::allocation_failed(len.saturating_mul(std::mem::size_of::<P>()), e.to_string())
        })?;
        data.resize(len, P::default());
        Ok(Self {
            data: Arc::new(data),
            width,
            height,
        })
    }

    /// Creates a frame filled with one pixel value.
    pub fn filled(width: u32, height: u32, pixel: P) -> Self {
        let len = width as usize * height as usize;
        Self {
            data: Arc::new(vec![pixel; len]),
            width,
            height,
        }
    }

    /// Creates a frame from existing pixels.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if `data.len() != width * height`.
    pub fn from_data(width: u32, height: u32, data: Vec<P>) -> Result<Self> {
        let expected = pixel_len(width, height)?;
        if data.len() != expected {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {} pixels, got {}", expected, data.len()),
            ));
        }
        Ok(Self {
            data: Arc::new(data),
            width,
            height,
        })
    }

    /// Frame width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Frame dimensions as (width, height).
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Rectangle covering the whole frame.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Total number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.data.len()
    }

    /// Size of the pixel storage in bytes.
    #[inline]
    pub fn byte_size(&self) -> usize {
        self.data.len() * std::mem::size_of::<P>()
    }

    /// Returns `true` if the frame has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns `true` if another frame shares this frame's storage.
    #[inline]
    pub fn is_shared(&self) -> bool {
        Arc::strong_count(&self.data) > 1
    }

    /// Raw pixel storage.
    #[inline]
    pub fn data(&self) -> &[P] {
        &self.data
    }

    /// Mutable pixel storage (copy-on-write when shared).
    #[inline]
    pub fn data_mut(&mut self) -> &mut [P] {
        Arc::make_mut(&mut self.data).as_mut_slice()
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Returns the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> P {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        self.data[self.offset(x, y)]
    }

    /// Returns the pixel at (x, y), or `None` if out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<P> {
        if x < self.width && y < self.height {
            Some(self.pixel(x, y))
        } else {
            None
        }
    }

    /// Returns the pixel at (x, y) or an [`Error::OutOfBounds`].
    pub fn checked_pixel(&self, x: u32, y: u32) -> Result<P> {
        self.get_pixel(x, y)
            .ok_or_else(|| Error::out_of_bounds(x, y, self.width, self.height))
    }

    /// Sets the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: P) {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let offset = self.offset(x, y);
        self.data_mut()[offset] = pixel;
    }

    /// Fills the whole frame with one pixel value.
    pub fn fill(&mut self, pixel: P) {
        self.data_mut().fill(pixel);
    }

    /// Returns row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[P] {
        debug_assert!(y < self.height, "row out of bounds");
        let start = y as usize * self.width as usize;
        &self.data[start..start + self.width as usize]
    }

    /// Returns the contiguous full-width rows in `rows` as one slice.
    ///
    /// # Panics
    ///
    /// Panics if the range exceeds the frame height.
    #[inline]
    pub fn rows_mut(&mut self, rows: Range<u32>) -> &mut [P] {
        debug_assert!(rows.start <= rows.end && rows.end <= self.height, "rows out of bounds");
        let width = self.width as usize;
        let (start, end) = (rows.start as usize * width, rows.end as usize * width);
        &mut self.data_mut()[start..end]
    }

    /// Iterates over all pixels with their coordinates.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32, P)> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| (x, y, self.pixel(x, y))))
    }

    /// Deep copy into freshly allocated, unshared storage.
    ///
    /// Unlike `clone`, the result never shares storage with `self`.
    pub fn try_duplicate(&self) -> Result<Self> {
        let mut data = Vec::new();
        data.try_reserve_exact(self.data.len())
            .map_err(|e| Error::allocation_failed(self.byte_size(), e.to_string()))?;
        data.extend_from_slice(&self.data);
        Ok(Self {
            data: Arc::new(data),
            width: self.width,
            height: self.height,
        })
    }

    /// Replaces this frame's pixels with `other`'s.
    ///
    /// Swaps storage handles when `other` owns its storage exclusively and
    /// copies pixels otherwise. Either way `self` stays the same object and
    /// `other` is released when this returns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the frames differ in size; in
    /// that case `self` is untouched.
    ///
    /// # Example
    ///
    /// ```rust
    /// use raster_core::{Commit, Frame, Luma};
    ///
    /// let mut frame: Frame<Luma<u8>> = Frame::new(4, 4);
    /// let result = Frame::filled(4, 4, Luma::new(9));
    /// assert_eq!(frame.swap_or_copy(result).unwrap(), Commit::Swapped);
    /// assert_eq!(frame.pixel(2, 2), Luma::new(9));
    /// ```
    pub fn swap_or_copy(&mut self, mut other: Frame<P>) -> Result<Commit> {
        if self.dimensions() != other.dimensions() {
            return Err(Error::dimension_mismatch(self.dimensions(), other.dimensions()));
        }
        if Arc::get_mut(&mut other.data).is_some() {
            std::mem::swap(&mut self.data, &mut other.data);
            Ok(Commit::Swapped)
        } else {
            self.data_mut().copy_from_slice(&other.data);
            Ok(Commit::Copied)
        }
    }

    /// Creates a view into a sub-rectangle of this frame.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRegion`] if `region` is not inside the frame.
    pub fn view(&self, region: Rect) -> Result<FrameView<'_, P>> {
        if !self.bounds().contains_rect(&region) {
            return Err(Error::invalid_region(
                region.x,
                region.y,
                region.width,
                region.height,
                self.width,
                self.height,
            ));
        }
        Ok(FrameView {
            frame: self,
            region,
        })
    }
}

impl<P: VectorPixel> std::fmt::Debug for Frame<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("channels", &P::CHANNELS)
            .field("layout", &std::any::type_name::<P>())
            .finish()
    }
}

fn pixel_len(width: u32, height: u32) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| Error::invalid_dimensions(width, height, "pixel count overflows usize"))
}

/// Immutable view into a sub-rectangle of a [`Frame`].
///
/// Coordinates passed to the view are relative to its origin.
pub struct FrameView<'a, P: VectorPixel> {
    frame: &'a Frame<P>,
    region: Rect,
}

impl<'a, P: VectorPixel> FrameView<'a, P> {
    /// The region of the frame this view covers.
    #[inline]
    pub fn region(&self) -> Rect {
        self.region
    }

    /// View width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.region.width
    }

    /// View height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.region.height
    }

    /// Pixel at (x, y) relative to the view origin.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> P {
        debug_assert!(x < self.region.width && y < self.region.height);
        self.frame.pixel(self.region.x + x, self.region.y + y)
    }

    /// Row `y` of the view.
    #[inline]
    pub fn row(&self, y: u32) -> &'a [P] {
        debug_assert!(y < self.region.height);
        let x0 = self.region.x as usize;
        &self.frame.row(self.region.y + y)[x0..x0 + self.region.width as usize]
    }

    /// Iterates over view pixels with view-relative coordinates.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32, P)> + '_ {
        (0..self.region.height)
            .flat_map(move |y| (0..self.region.width).map(move |x| (x, y, self.pixel(x, y))))
    }
}

impl<P: VectorPixel> std::fmt::Debug for FrameView<'_, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameView").field("region", &self.region).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Luma, Rgb, Rgba};

    #[test]
    fn test_frame_new() {
        let frame: Frame<Rgb<f32>> = Frame::new(100, 50);
        assert_eq!(frame.dimensions(), (100, 50));
        assert_eq!(frame.pixel_count(), 5000);
        assert_eq!(frame.byte_size(), 5000 * 12);
        assert!(!frame.is_empty());
    }

    #[test]
    fn test_frame_try_new() {
        let frame: Frame<Luma<u8>> = Frame::try_new(7, 3).unwrap();
        assert_eq!(frame.data().len(), 21);
    }

    #[test]
    fn test_frame_from_data_wrong_size() {
        let result: Result<Frame<Luma<u8>>> = Frame::from_data(10, 10, vec![Luma::new(0); 99]);
        assert!(matches!(result, Err(Error::InvalidDimensions { .. })));
    }

    #[test]
    fn test_frame_set_get_pixel() {
        let mut frame: Frame<Rgba<u8>> = Frame::new(10, 10);
        frame.set_pixel(5, 6, Rgba::white());
        assert_eq!(frame.pixel(5, 6), Rgba::white());
        assert_eq!(frame.get_pixel(10, 0), None);
        assert!(frame.checked_pixel(0, 10).unwrap_err().is_bounds_error());
    }

    #[test]
    fn test_frame_rows_mut() {
        let mut frame: Frame<Luma<u8>> = Frame::new(4, 4);
        frame.rows_mut(1..3).fill(Luma::new(7));
        assert_eq!(frame.row(0), &[Luma::new(0); 4]);
        assert_eq!(frame.row(1), &[Luma::new(7); 4]);
        assert_eq!(frame.row(2), &[Luma::new(7); 4]);
        assert_eq!(frame.row(3), &[Luma::new(0); 4]);
    }

    #[test]
    fn test_frame_clone_cow() {
        let a: Frame<Luma<u8>> = Frame::filled(4, 4, Luma::new(1));
        let mut b = a.clone();
        assert!(a.is_shared());
        b.set_pixel(0, 0, Luma::new(2));
        assert_eq!(a.pixel(0, 0), Luma::new(1));
        assert_eq!(b.pixel(0, 0), Luma::new(2));
        assert!(!a.is_shared());
    }

    #[test]
    fn test_try_duplicate_is_unshared() {
        let a: Frame<Luma<u8>> = Frame::filled(3, 3, Luma::new(4));
        let b = a.try_duplicate().unwrap();
        assert!(!a.is_shared());
        assert!(!b.is_shared());
        assert_eq!(a.data(), b.data());
    }

    #[test]
    fn test_swap_or_copy_swaps_exclusive_storage() {
        let mut frame: Frame<Luma<u8>> = Frame::new(2, 2);
        let other = Frame::filled(2, 2, Luma::new(5));
        let ptr = other.data().as_ptr();
        assert_eq!(frame.swap_or_copy(other).unwrap(), Commit::Swapped);
        assert_eq!(frame.data().as_ptr(), ptr);
    }

    #[test]
    fn test_swap_or_copy_copies_shared_storage() {
        let mut frame: Frame<Luma<u8>> = Frame::new(2, 2);
        let other = Frame::filled(2, 2, Luma::new(5));
        let keep = other.clone();
        assert_eq!(frame.swap_or_copy(other).unwrap(), Commit::Copied);
        assert_eq!(frame.pixel(1, 1), Luma::new(5));
        assert_ne!(frame.data().as_ptr(), keep.data().as_ptr());
    }

    #[test]
    fn test_swap_or_copy_dimension_mismatch() {
        let mut frame: Frame<Luma<u8>> = Frame::new(2, 2);
        let err = frame.swap_or_copy(Frame::new(3, 2)).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { .. }));
        assert_eq!(frame.pixel(0, 0), Luma::new(0));
    }

    #[test]
    fn test_frame_view() {
        let mut frame: Frame<Luma<u8>> = Frame::new(8, 8);
        frame.set_pixel(3, 2, Luma::new(9));
        let view = frame.view(Rect::new(2, 2, 4, 3)).unwrap();
        assert_eq!((view.width(), view.height()), (4, 3));
        assert_eq!(view.pixel(1, 0), Luma::new(9));
        assert_eq!(view.row(0).len(), 4);
        assert_eq!(view.pixels().count(), 12);

        let err = frame.view(Rect::new(6, 6, 4, 4)).unwrap_err();
        assert!(err.is_bounds_error());
    }
}
