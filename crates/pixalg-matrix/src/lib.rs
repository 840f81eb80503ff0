#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Overview
//!
//! `pixalg-matrix` provides [`DenseMatrix`], the owned row-major matrix type used by
//! the decomposition engine (`pixalg-linalg`) and the FFT engine (`pixalg-fft`).
//!
//! - **DenseMatrix**: `rows x cols` buffer of `f32` or `f64` with checked accessors
//! - **Element**: the element trait bridging single precision at the API boundary and
//!   double precision inside the algorithms
//! - **Plane / PlaneMut**: adapters for external single-channel image containers
//!
//! # Quick Start
//!
//! ```rust
//! use pixalg_matrix::DenseMatrix;
//!
//! let a = DenseMatrix::from_rows(&[[4.0, 2.0], [2.0, 3.0]]).unwrap();
//! let b = a.matmul(&DenseMatrix::identity(2).unwrap()).unwrap();
//! assert_eq!(a, b);
//! assert_eq!(a.trace().unwrap(), 7.0);
//! ```

/// Element trait for the supported floating point types.
pub mod element;

/// Error types for matrix construction and access.
pub mod error;

/// The dense matrix implementation.
pub mod matrix;

/// Adapters for external image planes.
pub mod plane;

/// Serde support, enabled with the `serde` feature.
#[cfg(feature = "serde")]
pub mod serde;

pub use crate::element::Element;
pub use crate::error::MatrixError;
pub use crate::matrix::DenseMatrix;
pub use crate::plane::{Plane, PlaneMut};
