use pixalg_matrix::MatrixError;
use thiserror::Error;

/// An error type for the FFT engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FftError {
    /// The inputs do not fit together.
    ///
    /// # Examples
    /// - `fft2x` of two matrices with different shapes
    /// - a buffer whose length differs from the plan length
    #[error("Invalid argument: {reason}")]
    InvalidArgument {
        /// Why the argument was rejected
        reason: String,
    },

    /// A transform of length zero was requested.
    #[error("Invalid FFT length {length}, the length must be at least 1")]
    InvalidLength {
        /// The requested length
        length: usize,
    },

    /// Error raised by the matrix type.
    #[error(transparent)]
    Matrix(#[from] MatrixError),
}

impl FftError {
    /// Creates an InvalidArgument error for two operands of different shapes.
    pub fn shape_mismatch(what: &str, lhs: [usize; 2], rhs: [usize; 2]) -> Self {
        Self::InvalidArgument {
            reason: format!(
                "{what} must have equal shapes, got {}x{} and {}x{}",
                lhs[0], lhs[1], rhs[0], rhs[1]
            ),
        }
    }
}
