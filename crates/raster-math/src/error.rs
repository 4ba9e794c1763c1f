//! Error type for matrix construction and indexing.

use thiserror::Error;

/// Matrix construction and indexing failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixError {
    /// Element count doesn't match `rows * columns`.
    #[error("size mismatch: {rows}x{columns} matrix given {len} values")]
    SizeMismatch {
        /// Requested rows
        rows: usize,
        /// Requested columns
        columns: usize,
        /// Number of values supplied
        len: usize,
    },

    /// Index outside the matrix.
    #[error("index ({row}, {col}) out of range for {rows}x{columns} matrix")]
    OutOfRange {
        /// Requested row
        row: usize,
        /// Requested column
        col: usize,
        /// Matrix rows
        rows: usize,
        /// Matrix columns
        columns: usize,
    },
}
