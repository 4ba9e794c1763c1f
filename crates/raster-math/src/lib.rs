//! # raster-math
//!
//! Math types for raster processing.
//!
//! - [`DenseMatrix`] - Immutable row-major 2-D grid of weights
//! - [`MatrixError`] - Construction and indexing failures
//!
//! # Design
//!
//! Matrices are stored in **row-major** order. Index `(row, col)` maps to
//! `row * columns + col`. A convolution kernel is centered at
//! [`DenseMatrix::center`], i.e. `(rows / 2, columns / 2)`:
//!
//! ```text
//!            col 0  col 1  col 2
//!   row 0  | k00    k01    k02 |
//!   row 1  | k10   [k11]   k12 |   center = (1, 1)
//!   row 2  | k20    k21    k22 |
//! ```
//!
//! # Usage
//!
//! ```rust
//! use raster_math::DenseMatrix;
//!
//! let k = DenseMatrix::from_rows(&[
//!     [0.0, -1.0, 0.0],
//!     [-1.0, 5.0, -1.0],
//!     [0.0, -1.0, 0.0],
//! ]).unwrap();
//! assert_eq!(k.center(), (1, 1));
//! assert_eq!(k.get(1, 1).unwrap(), 5.0);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod matrix;

pub use error::MatrixError;
pub use matrix::DenseMatrix;
