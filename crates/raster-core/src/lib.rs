//! # raster-core
//!
//! Core types for raster processing.
//!
//! This crate provides the foundational types the operations in
//! `raster-ops` are written against:
//!
//! - [`Rect`], [`Roi`] - Regions of interest
//! - [`PixelFormat`] - Component types (u8, u16, f16, f32)
//! - [`VectorPixel`] - Conversion between stored pixels and `[f32; 4]`
//! - [`Rgba`], [`Rgb`], [`LumaAlpha`], [`Luma`] - Pixel layouts
//! - [`Frame`] - Row-major pixel buffer with swap-or-copy commit
//! - [`BufferPool`] - Byte budget and scratch-buffer reuse
//! - [`Conversion`] - Linear or sRGB-aware pixel/vector conversion
//!
//! ## Crate Structure
//!
//! ```text
//! raster-core (this crate)
//!    ^
//!    |
//!    +-- raster-ops (convolution engine and processor)
//!    +-- raster-bench
//! ```
//!
//! ## Example
//!
//! ```rust
//! use raster_core::{Conversion, Frame, Rgba, VectorPixel};
//!
//! let frame: Frame<Rgba<u8>> = Frame::filled(8, 8, Rgba::new(255, 128, 0, 255));
//! let v = frame.pixel(0, 0).to_vector(Conversion::Linear);
//! assert_eq!(v[0], 1.0);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod frame;
pub mod pixel;
pub mod pool;
pub mod rect;
pub mod transfer;

pub use error::{Error, Result};
pub use frame::{Commit, Frame, FrameView};
pub use pixel::{Luma, LumaAlpha, PixelFormat, REC709_LUMA, Rgb, Rgba, Vec4, VectorPixel};
pub use pool::{BufferPool, Reservation, Scratch};
pub use rect::{Rect, Roi};
pub use transfer::Conversion;

/// Prelude module for convenient imports.
///
/// ```
/// use raster_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::frame::{Commit, Frame, FrameView};
    pub use crate::pixel::{Luma, LumaAlpha, PixelFormat, Rgb, Rgba, Vec4, VectorPixel};
    pub use crate::pool::BufferPool;
    pub use crate::rect::{Rect, Roi};
    pub use crate::transfer::Conversion;
}
