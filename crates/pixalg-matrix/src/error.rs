use thiserror::Error;

/// An error type for dense matrix construction and access.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatrixError {
    /// One of the requested dimensions is zero.
    ///
    /// Every matrix in the workspace has at least one row and one column.
    #[error("Empty shape: a matrix needs at least one row and one column, got {rows}x{cols}")]
    EmptyShape {
        /// Requested number of rows
        rows: usize,
        /// Requested number of columns
        cols: usize,
    },

    /// The data buffer does not hold `rows * cols` elements.
    ///
    /// # Example
    /// ```ignore
    /// // Error: shape 2x3 expects 6 elements, but got 5
    /// let m = DenseMatrix::new(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0])?;
    /// ```
    #[error("Shape mismatch: expected {expected} elements for shape, but got {actual} elements in data")]
    InvalidShape {
        /// Expected number of elements based on shape
        expected: usize,
        /// Actual number of elements in the data
        actual: usize,
    },

    /// A row of a nested row buffer has a different length than the first one.
    #[error("Ragged rows: row {row} has {actual} elements, expected {expected}")]
    RaggedRows {
        /// Index of the offending row
        row: usize,
        /// Length of the first row
        expected: usize,
        /// Length of the offending row
        actual: usize,
    },

    /// A `(row, col)` index lies outside of the matrix.
    #[error("Index ({row}, {col}) out of bounds for matrix of shape {rows}x{cols}")]
    IndexOutOfBounds {
        /// The requested row
        row: usize,
        /// The requested column
        col: usize,
        /// Number of rows of the matrix
        rows: usize,
        /// Number of columns of the matrix
        cols: usize,
    },

    /// Two operands have incompatible shapes.
    ///
    /// # Examples
    /// - Matrix multiplication with incompatible inner dimensions
    /// - Element-wise operations on different-shaped matrices
    #[error("Dimension mismatch: {message}. Expected shape: {expected}, got: {actual}")]
    DimensionMismatch {
        /// Human-readable description of the mismatch
        message: String,
        /// Expected shape description
        expected: String,
        /// Actual shape description
        actual: String,
    },

    /// The operation is only defined for square matrices.
    #[error("Matrix must be square, got {rows}x{cols}")]
    NotSquare {
        /// Number of rows
        rows: usize,
        /// Number of columns
        cols: usize,
    },
}

impl MatrixError {
    /// Creates an IndexOutOfBounds error for the given index and shape.
    pub fn index_out_of_bounds(row: usize, col: usize, shape: [usize; 2]) -> Self {
        Self::IndexOutOfBounds {
            row,
            col,
            rows: shape[0],
            cols: shape[1],
        }
    }

    /// Creates a DimensionMismatch error with formatted shapes.
    pub fn dimension_mismatch(
        message: impl Into<String>,
        expected: [usize; 2],
        actual: [usize; 2],
    ) -> Self {
        Self::DimensionMismatch {
            message: message.into(),
            expected: format!("{}x{}", expected[0], expected[1]),
            actual: format!("{}x{}", actual[0], actual[1]),
        }
    }
}
