//! Dense row-major matrix.

use crate::MatrixError;
use std::ops::{Index, Mul};

/// Immutable `rows x columns` grid stored in row-major order.
///
/// The size is fixed at construction and no mutating API is exposed.
/// Zero-sized matrices can be built; consumers that need at least one
/// element check [`is_empty`](Self::is_empty).
///
/// # Example
///
/// ```rust
/// use raster_math::DenseMatrix;
///
/// let m = DenseMatrix::new(2, 3, vec![1, 2, 3, 4, 5, 6]).unwrap();
/// assert_eq!(m.rows(), 2);
/// assert_eq!(m.columns(), 3);
/// assert_eq!(m[(1, 0)], 4);
/// assert!(m.get(2, 0).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix<T> {
    rows: usize,
    columns: usize,
    data: Vec<T>,
}

impl<T: Copy> DenseMatrix<T> {
    /// Creates a matrix from flat row-major values.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::SizeMismatch`] unless
    /// `rows * columns == values.len()`.
    pub fn new(rows: usize, columns: usize, values: Vec<T>) -> Result<Self, MatrixError> {
        match rows.checked_mul(columns) {
            Some(n) if n == values.len() => Ok(Self {
                rows,
                columns,
                data: values,
            }),
            _ => Err(MatrixError::SizeMismatch {
                rows,
                columns,
                len: values.len(),
            }),
        }
    }

    /// Creates a matrix from nested rows.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::SizeMismatch`] if the rows are ragged.
    ///
    /// ```rust
    /// use raster_math::DenseMatrix;
    ///
    /// let ragged: &[&[f32]] = &[&[1.0, 2.0], &[3.0]];
    /// assert!(DenseMatrix::from_rows(ragged).is_err());
    /// ```
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Result<Self, MatrixError> {
        let columns = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(rows.len() * columns);
        for row in rows {
            data.extend_from_slice(row.as_ref());
        }
        Self::new(rows.len(), columns, data)
    }

    /// Creates a matrix by evaluating `f(row, col)` for every cell.
    pub fn from_fn(rows: usize, columns: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(rows * columns);
        for r in 0..rows {
            for c in 0..columns {
                data.push(f(r, c));
            }
        }
        Self {
            rows,
            columns,
            data,
        }
    }

    /// Returns the value at `(row, col)`.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::OutOfRange`] if either index is out of bounds.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Result<T, MatrixError> {
        if row < self.rows && col < self.columns {
            Ok(self.data[row * self.columns + col])
        } else {
            Err(MatrixError::OutOfRange {
                row,
                col,
                rows: self.rows,
                columns: self.columns,
            })
        }
    }

    /// Returns the transposed matrix.
    pub fn transpose(&self) -> Self {
        Self::from_fn(self.columns, self.rows, |r, c| self.data[c * self.columns + r])
    }

    /// Applies `f` to every element.
    pub fn map<U: Copy>(&self, f: impl FnMut(T) -> U) -> DenseMatrix<U> {
        DenseMatrix {
            rows: self.rows,
            columns: self.columns,
            data: self.data.iter().copied().map(f).collect(),
        }
    }
}

impl<T> DenseMatrix<T> {
    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Total number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the matrix has no rows or no columns.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.columns == 0
    }

    /// The element the matrix is centered on: `(rows / 2, columns / 2)`.
    ///
    /// For even sizes this is the lower-right of the two middle cells.
    #[inline]
    pub fn center(&self) -> (usize, usize) {
        (self.rows / 2, self.columns / 2)
    }

    /// Row-major element storage.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Elements of one row.
    ///
    /// # Panics
    ///
    /// Panics if `row >= rows`.
    #[inline]
    pub fn row(&self, row: usize) -> &[T] {
        &self.data[row * self.columns..(row + 1) * self.columns]
    }
}

impl DenseMatrix<f32> {
    /// Sum of all weights.
    pub fn sum(&self) -> f32 {
        self.data.iter().sum()
    }
}

impl<T> Index<(usize, usize)> for DenseMatrix<T> {
    type Output = T;

    /// # Panics
    ///
    /// Panics if `(row, col)` is out of range.
    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        assert!(
            row < self.rows && col < self.columns,
            "index ({row}, {col}) out of range for {}x{} matrix",
            self.rows,
            self.columns
        );
        &self.data[row * self.columns + col]
    }
}

impl Mul<f32> for &DenseMatrix<f32> {
    type Output = DenseMatrix<f32>;

    fn mul(self, rhs: f32) -> DenseMatrix<f32> {
        self.map(|w| w * rhs)
    }
}
