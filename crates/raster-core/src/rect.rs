//! Rectangle and Region of Interest (ROI) types.
//!
//! # Overview
//!
//! - [`Rect`] - Rectangle with origin and dimensions
//! - [`Roi`] - Region of Interest, optionally unbounded
//!
//! # Coordinate System
//!
//! Origin (0, 0) is the **top-left** pixel, X grows to the right and Y
//! grows downward. Left/top edges are inclusive, right/bottom exclusive.
//!
//! ```text
//! (0,0) ────────► X
//!   │   ┌──────────┐
//!   │   │  Region  │
//!   │   └──────────┘
//!   ▼
//!   Y
//! ```
//!
//! # Usage
//!
//! ```rust
//! use raster_core::{Rect, Roi};
//!
//! let roi = Roi::from_xywh(6, 2, 10, 10);
//! // Working rectangle of a 12x8 frame
//! let working = roi.resolve(12, 8);
//! assert_eq!(working, Rect::new(6, 2, 6, 6));
//! ```

/// A rectangle defined by origin (x, y) and dimensions (width, height).
///
/// A rectangle with zero width or height is empty.
///
/// # Example
///
/// ```rust
/// use raster_core::Rect;
///
/// let rect = Rect::new(10, 20, 100, 50);
/// assert_eq!(rect.right(), 110);
/// assert_eq!(rect.bottom(), 70);
/// assert_eq!(rect.area(), 5000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// X coordinate of the left edge (inclusive)
    pub x: u32,
    /// Y coordinate of the top edge (inclusive)
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Rect {
    /// Creates a new rectangle with the given origin and dimensions.
    #[inline]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle at (0, 0) with given dimensions.
    #[inline]
    pub const fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// X coordinate of the right edge (exclusive).
    ///
    /// Saturates instead of wrapping for rectangles reaching past `u32::MAX`.
    #[inline]
    pub const fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Y coordinate of the bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    /// Returns the area of the rectangle in pixels.
    #[inline]
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Returns `true` if the rectangle has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns `true` if the point (px, py) is inside this rectangle.
    ///
    /// ```rust
    /// use raster_core::Rect;
    ///
    /// let rect = Rect::new(10, 10, 100, 100);
    /// assert!(rect.contains(10, 10));
    /// assert!(rect.contains(109, 109));
    /// assert!(!rect.contains(110, 110));
    /// ```
    #[inline]
    pub const fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// Returns `true` if this rectangle fully contains another.
    #[inline]
    pub const fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Returns the intersection of this rectangle with another.
    ///
    /// Returns `None` if the rectangles don't share at least one pixel.
    ///
    /// # Example
    ///
    /// ```rust
    /// use raster_core::Rect;
    ///
    /// let a = Rect::new(0, 0, 100, 100);
    /// let b = Rect::new(50, 50, 100, 100);
    /// assert_eq!(a.intersect(&b), Some(Rect::new(50, 50, 50, 50)));
    /// ```
    #[inline]
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if x < right && y < bottom {
            Some(Rect::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }

    /// Clamps this rectangle to `[0, max_width) x [0, max_height)`.
    ///
    /// Returns `None` if there's no overlap.
    #[inline]
    pub fn clamp_to(&self, max_width: u32, max_height: u32) -> Option<Rect> {
        self.intersect(&Rect::from_size(max_width, max_height))
    }

    /// Iterates all (x, y) coordinates row by row.
    ///
    /// ```rust
    /// use raster_core::Rect;
    ///
    /// let coords: Vec<_> = Rect::new(0, 0, 2, 2).iter_coords().collect();
    /// assert_eq!(coords, vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
    /// ```
    #[inline]
    pub fn iter_coords(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (self.y..self.bottom()).flat_map(move |y| (self.x..self.right()).map(move |x| (x, y)))
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Rect({}, {}, {}x{})",
            self.x, self.y, self.width, self.height
        )
    }
}

/// Region of Interest - optionally unbounded rectangle.
///
/// `Roi::Full` stands for "the whole frame" without knowing its size.
///
/// # Example
///
/// ```rust
/// use raster_core::{Rect, Roi};
///
/// assert_eq!(Roi::Full.resolve(1920, 1080), Rect::from_size(1920, 1080));
///
/// // Regions outside the frame resolve to an empty rectangle
/// assert!(Roi::from_xywh(4000, 0, 10, 10).resolve(1920, 1080).is_empty());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Roi {
    /// The entire frame
    #[default]
    Full,
    /// A specific rectangular region
    Region(Rect),
}

impl Roi {
    /// Creates an ROI from coordinates and dimensions.
    #[inline]
    pub const fn from_xywh(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self::Region(Rect::new(x, y, width, height))
    }

    /// Returns `true` if this ROI represents the full frame.
    #[inline]
    pub const fn is_full(&self) -> bool {
        matches!(self, Self::Full)
    }

    /// Resolves this ROI against frame dimensions.
    ///
    /// The result is the intersection of the region with the frame bounds,
    /// or an empty `Rect` when they don't overlap.
    #[inline]
    pub fn resolve(&self, width: u32, height: u32) -> Rect {
        match self {
            Self::Full => Rect::from_size(width, height),
            Self::Region(r) => r.clamp_to(width, height).unwrap_or_default(),
        }
    }
}

impl From<Rect> for Roi {
    fn from(rect: Rect) -> Self {
        Roi::Region(rect)
    }
}

impl std::fmt::Display for Roi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Roi::Full => write!(f, "Roi::Full"),
            Roi::Region(r) => write!(f, "Roi::{}", r),
        }
    }
}
