//! Numeric conversion context for pixel/vector conversion.
//!
//! [`Conversion`] decides whether color channels are taken as stored
//! (`Linear`) or decoded from sRGB on load and re-encoded on store
//! (`Srgb`). Alpha is never transferred.
//!
//! # Reference
//!
//! IEC 61966-2-1:1999

/// How stored color values map to the float vectors the kernels see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Conversion {
    /// Stored values are used as-is.
    #[default]
    Linear,
    /// Stored values are sRGB encoded; math happens on linear light.
    Srgb,
}

impl Conversion {
    /// Maps a normalized stored color value to the working value.
    #[inline]
    pub fn decode(self, v: f32) -> f32 {
        match self {
            Self::Linear => v,
            Self::Srgb => srgb_eotf(v),
        }
    }

    /// Maps a working color value back to its stored encoding.
    #[inline]
    pub fn encode(self, v: f32) -> f32 {
        match self {
            Self::Linear => v,
            Self::Srgb => srgb_oetf(v),
        }
    }
}

/// sRGB EOTF: decodes sRGB encoded values to linear light.
///
/// ```text
/// if V <= 0.04045:
///     L = V / 12.92
/// else:
///     L = ((V + 0.055) / 1.055)^2.4
/// ```
///
/// # Example
///
/// ```rust
/// use raster_core::transfer::srgb_eotf;
///
/// assert!((srgb_eotf(0.5) - 0.214).abs() < 0.01);
/// ```
#[inline]
pub fn srgb_eotf(v: f32) -> f32 {
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

/// sRGB OETF: encodes linear light to sRGB.
///
/// ```text
/// if L <= 0.0031308:
///     V = L * 12.92
/// else:
///     V = 1.055 * L^(1/2.4) - 0.055
/// ```
#[inline]
pub fn srgb_oetf(l: f32) -> f32 {
    if l <= 0.0031308 {
        l * 12.92
    } else {
        1.055 * l.powf(1.0 / 2.4) - 0.055
    }
}
