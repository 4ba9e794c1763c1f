//! Pixel layouts and their conversion to float vectors.
//!
//! # Types
//!
//! - [`PixelFormat`] - Component data type (u8, u16, f16, f32)
//! - [`VectorPixel`] - A stored pixel that converts to/from a [`Vec4`]
//! - [`Rgba`], [`Rgb`], [`LumaAlpha`], [`Luma`] - Channel layouts
//!
//! # Design
//!
//! Layouts are generic over their component type, so the closed set of
//! adapters is `layout x component`: `Rgba<u8>`, `Rgb<f32>`, `Luma<u16>`...
//! Convolution code is written once against [`VectorPixel`] and sees every
//! pixel as `[R, G, B, A]` in `f32`.
//!
//! ```
//! use raster_core::{Conversion, Rgba, VectorPixel};
//!
//! let px = Rgba::<u8>::new(255, 0, 51, 255);
//! let v = px.to_vector(Conversion::Linear);
//! assert_eq!(v, [1.0, 0.0, 0.2, 1.0]);
//!
//! // Storing saturates to the representable range
//! let back = Rgba::<u8>::from_vector([1.5, -0.2, 0.2, 1.0], Conversion::Linear);
//! assert_eq!(back, Rgba::new(255, 0, 51, 255));
//! ```
//!
//! # Memory Layout
//!
//! All layouts are `#[repr(C)]` with interleaved channels.

use crate::transfer::Conversion;
use half::f16;
use std::fmt;

/// Four-component float vector, channels `[R, G, B, A]`.
pub type Vec4 = [f32; 4];

/// Rec.709 luminance coefficients [R, G, B].
pub const REC709_LUMA: [f32; 3] = [0.2126, 0.7152, 0.0722];

/// Trait for pixel component types.
///
/// - `u8`, `u16` normalize to [0.0, 1.0] and saturate when stored
/// - `f16`, `f32` pass values through
///
/// # Example
///
/// ```
/// use raster_core::PixelFormat;
///
/// let float_val = 128u8.to_f32();
/// assert!((float_val - 0.502).abs() < 0.01);
///
/// let back: u16 = PixelFormat::from_f32(0.5);
/// assert_eq!(back, 32768);
/// ```
pub trait PixelFormat: Copy + Clone + Default + fmt::Debug + PartialEq + Send + Sync + 'static {
    /// Number of bits per component.
    const BITS: u32;

    /// Whether this is a floating-point format.
    const IS_FLOAT: bool;

    /// Convert to f32, normalizing integers to [0.0, 1.0].
    fn to_f32(self) -> f32;

    /// Convert from f32, clamping integers to their range.
    fn from_f32(v: f32) -> Self;

    /// Zero value.
    fn zero() -> Self;

    /// One value (1.0 for floats, max for integers).
    fn one() -> Self;
}

impl PixelFormat for u8 {
    const BITS: u32 = 8;
    const IS_FLOAT: bool = false;

    #[inline]
    fn to_f32(self) -> f32 {
        self as f32 / 255.0
    }

    #[inline]
    fn from_f32(v: f32) -> Self {
        // NaN saturates to 0 through the float-to-int cast
        (v.clamp(0.0, 1.0) * 255.0).round() as u8
    }

    #[inline]
    fn zero() -> Self {
        0
    }

    #[inline]
    fn one() -> Self {
        255
    }
}

impl PixelFormat for u16 {
    const BITS: u32 = 16;
    const IS_FLOAT: bool = false;

    #[inline]
    fn to_f32(self) -> f32 {
        self as f32 / 65535.0
    }

    #[inline]
    fn from_f32(v: f32) -> Self {
        (v.clamp(0.0, 1.0) * 65535.0).round() as u16
    }

    #[inline]
    fn zero() -> Self {
        0
    }

    #[inline]
    fn one() -> Self {
        65535
    }
}

impl PixelFormat for f16 {
    const BITS: u32 = 16;
    const IS_FLOAT: bool = true;

    #[inline]
    fn to_f32(self) -> f32 {
        f16::to_f32(self)
    }

    #[inline]
    fn from_f32(v: f32) -> Self {
        f16::from_f32(v)
    }

    #[inline]
    fn zero() -> Self {
        f16::ZERO
    }

    #[inline]
    fn one() -> Self {
        f16::ONE
    }
}

impl PixelFormat for f32 {
    const BITS: u32 = 32;
    const IS_FLOAT: bool = true;

    #[inline]
    fn to_f32(self) -> f32 {
        self
    }

    #[inline]
    fn from_f32(v: f32) -> Self {
        v
    }

    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn one() -> Self {
        1.0
    }
}

/// A stored pixel that converts to and from a [`Vec4`].
///
/// Layouts without alpha load `A = 1.0` and ignore `A` on store. Layouts
/// with a single color channel load it into R, G and B.
///
/// The row methods are what the convolution passes call; the defaults go
/// pixel by pixel.
pub trait VectorPixel: Copy + Default + fmt::Debug + PartialEq + Send + Sync + 'static {
    /// Number of stored channels.
    const CHANNELS: usize;

    /// Whether the layout stores an alpha channel.
    const HAS_ALPHA: bool;

    /// Converts this pixel to `[R, G, B, A]`.
    fn to_vector(self, conversion: Conversion) -> Vec4;

    /// Converts a vector back to a stored pixel, saturating as needed.
    fn from_vector(v: Vec4, conversion: Conversion) -> Self;

    /// Converts a row of pixels into `dst`.
    ///
    /// `src` and `dst` must have the same length.
    #[inline]
    fn load_row(src: &[Self], dst: &mut [Vec4], conversion: Conversion) {
        debug_assert_eq!(src.len(), dst.len());
        for (px, v) in src.iter().zip(dst.iter_mut()) {
            *v = px.to_vector(conversion);
        }
    }

    /// Overwrites a row of pixels from `src`.
    ///
    /// `src` and `dst` must have the same length.
    #[inline]
    fn store_row(src: &[Vec4], dst: &mut [Self], conversion: Conversion) {
        debug_assert_eq!(src.len(), dst.len());
        for (v, px) in src.iter().zip(dst.iter_mut()) {
            *px = Self::from_vector(*v, conversion);
        }
    }
}

#[inline]
fn load<T: PixelFormat>(c: T, conversion: Conversion) -> f32 {
    conversion.decode(c.to_f32())
}

#[inline]
fn store<T: PixelFormat>(v: f32, conversion: Conversion) -> T {
    T::from_f32(conversion.encode(v))
}

/// RGBA pixel, 4 interleaved channels.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rgba<T: PixelFormat> {
    /// Red channel.
    pub r: T,
    /// Green channel.
    pub g: T,
    /// Blue channel.
    pub b: T,
    /// Alpha channel.
    pub a: T,
}

impl<T: PixelFormat> Rgba<T> {
    /// Creates a new RGBA pixel.
    #[inline]
    pub const fn new(r: T, g: T, b: T, a: T) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque black.
    #[inline]
    pub fn black() -> Self {
        Self::new(T::zero(), T::zero(), T::zero(), T::one())
    }

    /// Opaque white.
    #[inline]
    pub fn white() -> Self {
        Self::new(T::one(), T::one(), T::one(), T::one())
    }

    /// Channel values as an array.
    #[inline]
    pub fn to_array(self) -> [T; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl<T: PixelFormat> VectorPixel for Rgba<T> {
    const CHANNELS: usize = 4;
    const HAS_ALPHA: bool = true;

    #[inline]
    fn to_vector(self, conversion: Conversion) -> Vec4 {
        [
            load(self.r, conversion),
            load(self.g, conversion),
            load(self.b, conversion),
            self.a.to_f32(),
        ]
    }

    #[inline]
    fn from_vector(v: Vec4, conversion: Conversion) -> Self {
        Self::new(
            store(v[0], conversion),
            store(v[1], conversion),
            store(v[2], conversion),
            T::from_f32(v[3]),
        )
    }
}

/// RGB pixel, 3 interleaved channels, implicitly opaque.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rgb<T: PixelFormat> {
    /// Red channel.
    pub r: T,
    /// Green channel.
    pub g: T,
    /// Blue channel.
    pub b: T,
}

impl<T: PixelFormat> Rgb<T> {
    /// Creates a new RGB pixel.
    #[inline]
    pub const fn new(r: T, g: T, b: T) -> Self {
        Self { r, g, b }
    }

    /// Channel values as an array.
    #[inline]
    pub fn to_array(self) -> [T; 3] {
        [self.r, self.g, self.b]
    }
}

impl<T: PixelFormat> VectorPixel for Rgb<T> {
    const CHANNELS: usize = 3;
    const HAS_ALPHA: bool = false;

    #[inline]
    fn to_vector(self, conversion: Conversion) -> Vec4 {
        [
            load(self.r, conversion),
            load(self.g, conversion),
            load(self.b, conversion),
            1.0,
        ]
    }

    #[inline]
    fn from_vector(v: Vec4, conversion: Conversion) -> Self {
        Self::new(
            store(v[0], conversion),
            store(v[1], conversion),
            store(v[2], conversion),
        )
    }
}

/// Luminance + alpha pixel.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct LumaAlpha<T: PixelFormat> {
    /// Luminance channel.
    pub l: T,
    /// Alpha channel.
    pub a: T,
}

impl<T: PixelFormat> LumaAlpha<T> {
    /// Creates a new luma/alpha pixel.
    #[inline]
    pub const fn new(l: T, a: T) -> Self {
        Self { l, a }
    }
}

impl<T: PixelFormat> VectorPixel for LumaAlpha<T> {
    const CHANNELS: usize = 2;
    const HAS_ALPHA: bool = true;

    #[inline]
    fn to_vector(self, conversion: Conversion) -> Vec4 {
        let l = load(self.l, conversion);
        [l, l, l, self.a.to_f32()]
    }

    #[inline]
    fn from_vector(v: Vec4, conversion: Conversion) -> Self {
        Self::new(store(luma(&v), conversion), T::from_f32(v[3]))
    }
}

/// Single-channel luminance pixel.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Luma<T: PixelFormat> {
    /// Luminance channel.
    pub l: T,
}

impl<T: PixelFormat> Luma<T> {
    /// Creates a new luma pixel.
    #[inline]
    pub const fn new(l: T) -> Self {
        Self { l }
    }
}

impl<T: PixelFormat> VectorPixel for Luma<T> {
    const CHANNELS: usize = 1;
    const HAS_ALPHA: bool = false;

    #[inline]
    fn to_vector(self, conversion: Conversion) -> Vec4 {
        let l = load(self.l, conversion);
        [l, l, l, 1.0]
    }

    #[inline]
    fn from_vector(v: Vec4, conversion: Conversion) -> Self {
        Self::new(store(luma(&v), conversion))
    }
}

/// Rec.709 weighted sum of the color channels.
///
/// Gray vectors return their common value unchanged; the weighted sum of
/// three equal channels is not exact in f32.
#[inline]
fn luma(v: &Vec4) -> f32 {
    if v[0] == v[1] && v[1] == v[2] {
        return v[0];
    }
    v[0] * REC709_LUMA[0] + v[1] * REC709_LUMA[1] + v[2] * REC709_LUMA[2]
}
