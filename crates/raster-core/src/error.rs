//! Error types for raster-core operations.
//!
//! # Overview
//!
//! The [`Error`] enum covers the failure modes of the buffer layer:
//! - Frame construction and pixel bounds checks
//! - Fallible allocation of frames and scratch buffers
//! - Committing one frame into another (swap-or-copy)
//!
//! # Usage
//!
//! ```rust
//! use raster_core::{Error, Result};
//!
//! fn check_pixel(x: u32, y: u32, width: u32, height: u32) -> Result<()> {
//!     if x >= width || y >= height {
//!         return Err(Error::out_of_bounds(x, y, width, height));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_pixel(3, 3, 2, 2).is_err());
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in frame and buffer operations.
///
/// # Categories
///
/// - **Bounds errors**: [`OutOfBounds`](Error::OutOfBounds),
///   [`InvalidRegion`](Error::InvalidRegion)
/// - **Allocation errors**: [`AllocationFailed`](Error::AllocationFailed)
/// - **Dimension errors**: [`DimensionMismatch`](Error::DimensionMismatch),
///   [`InvalidDimensions`](Error::InvalidDimensions)
#[derive(Debug, Error)]
pub enum Error {
    /// Pixel coordinates are outside frame bounds.
    #[error("pixel ({x}, {y}) out of bounds for frame {width}x{height}")]
    OutOfBounds {
        /// X coordinate that was out of bounds
        x: u32,
        /// Y coordinate that was out of bounds
        y: u32,
        /// Frame width
        width: u32,
        /// Frame height
        height: u32,
    },

    /// Region extends beyond frame bounds.
    #[error("region ({rx}, {ry}, {rw}x{rh}) exceeds frame bounds {width}x{height}")]
    InvalidRegion {
        /// Region X origin
        rx: u32,
        /// Region Y origin
        ry: u32,
        /// Region width
        rw: u32,
        /// Region height
        rh: u32,
        /// Frame width
        width: u32,
        /// Frame height
        height: u32,
    },

    /// Memory could not be obtained.
    ///
    /// Returned when the system allocator refuses a request or when a
    /// [`BufferPool`](crate::BufferPool) budget would be exceeded.
    #[error("failed to allocate {requested} bytes: {reason}")]
    AllocationFailed {
        /// Bytes requested
        requested: usize,
        /// Failure reason
        reason: String,
    },

    /// Frame dimensions don't match for the operation.
    #[error("dimension mismatch: {a_width}x{a_height} vs {b_width}x{b_height}")]
    DimensionMismatch {
        /// First frame width
        a_width: u32,
        /// First frame height
        a_height: u32,
        /// Second frame width
        b_width: u32,
        /// Second frame height
        b_height: u32,
    },

    /// Invalid frame dimensions or data length.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Reason why dimensions are invalid
        reason: String,
    },
}

impl Error {
    /// Creates an [`Error::OutOfBounds`] error.
    #[inline]
    pub fn out_of_bounds(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self::OutOfBounds {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates an [`Error::InvalidRegion`] error.
    #[inline]
    pub fn invalid_region(rx: u32, ry: u32, rw: u32, rh: u32, width: u32, height: u32) -> Self {
        Self::InvalidRegion {
            rx,
            ry,
            rw,
            rh,
            width,
            height,
        }
    }

    /// Creates an [`Error::AllocationFailed`] error.
    #[inline]
    pub fn allocation_failed(requested: usize, reason: impl Into<String>) -> Self {
        Self::AllocationFailed {
            requested,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::DimensionMismatch`] error.
    #[inline]
    pub fn dimension_mismatch(a: (u32, u32), b: (u32, u32)) -> Self {
        Self::DimensionMismatch {
            a_width: a.0,
            a_height: a.1,
            b_width: b.0,
            b_height: b.1,
        }
    }

    /// Returns `true` if this is a bounds-related error.
    #[inline]
    pub fn is_bounds_error(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. } | Self::InvalidRegion { .. })
    }

    /// Returns `true` if this is an allocation error.
    #[inline]
    pub fn is_allocation_error(&self) -> bool {
        matches!(self, Self::AllocationFailed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds() {
        let err = Error::out_of_bounds(100, 50, 80, 60);
        let msg = err.to_string();
        assert!(msg.contains("100"));
        assert!(msg.contains("80x60"));
        assert!(err.is_bounds_error());
        assert!(!err.is_allocation_error());
    }

    #[test]
    fn test_allocation_failed() {
        let err = Error::allocation_failed(4096, "pool budget exceeded");
        assert!(err.to_string().contains("4096 bytes"));
        assert!(err.is_allocation_error());
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = Error::dimension_mismatch((100, 100), (200, 50));
        let msg = err.to_string();
        assert!(msg.contains("100x100"));
        assert!(msg.contains("200x50"));
    }
}
