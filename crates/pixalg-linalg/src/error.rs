use pixalg_matrix::MatrixError;
use thiserror::Error;

/// An error type for decompositions and linear solvers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LinalgError {
    /// The input is malformed for the requested operation.
    #[error("Invalid argument: {reason}")]
    InvalidArgument {
        /// Why the argument was rejected
        reason: String,
    },

    /// The matrix shape does not satisfy the operation's requirement.
    ///
    /// # Examples
    /// - `determinant` of a rectangular matrix
    /// - `svd` of a matrix with fewer rows than columns
    #[error("Invalid dimension for {operation}: {requirement}, got {rows}x{cols}")]
    InvalidDimension {
        /// Name of the operation that rejected the input
        operation: &'static str,
        /// The shape requirement that was violated
        requirement: &'static str,
        /// Number of rows of the offending matrix
        rows: usize,
        /// Number of columns of the offending matrix
        cols: usize,
    },

    /// Two operands have incompatible shapes.
    #[error("Dimension mismatch: {message}. Expected shape: {expected}, got: {actual}")]
    DimensionMismatch {
        /// Human-readable description of the mismatch
        message: String,
        /// Expected shape description
        expected: String,
        /// Actual shape description
        actual: String,
    },

    /// An iterative solver exhausted its iteration budget.
    ///
    /// Partial results are discarded, they are never returned to the caller.
    #[error("{algorithm} did not converge within {iterations} iterations")]
    NumericalNonConvergence {
        /// Name of the iterative algorithm
        algorithm: &'static str,
        /// The iteration cap that was exceeded
        iterations: usize,
    },

    /// The factorization cannot solve a system because the matrix is singular
    /// or rank deficient.
    ///
    /// The library-level [`crate::ops::solve`] and [`crate::ops::inverse`] never
    /// report this, they fall back to the pseudo-inverse instead.
    #[error("Matrix is singular or rank deficient")]
    SingularMatrix,

    /// A Cholesky solve was attempted on a matrix that is not symmetric positive definite.
    #[error("Matrix is not symmetric positive definite")]
    NotPositiveDefinite,

    /// Error raised by the matrix type.
    #[error(transparent)]
    Matrix(#[from] MatrixError),
}

impl LinalgError {
    /// Creates an InvalidDimension error for a matrix of the given shape.
    pub fn invalid_dimension(
        operation: &'static str,
        requirement: &'static str,
        shape: [usize; 2],
    ) -> Self {
        Self::InvalidDimension {
            operation,
            requirement,
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

    /// Returns true if the error was caused by the input rather than by the numerics.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument { .. }
                | Self::InvalidDimension { .. }
                | Self::DimensionMismatch { .. }
                | Self::Matrix(_)
        )
    }
}
