#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Overview
//!
//! All routines take a [`pixalg_matrix::DenseMatrix`] of `f32` or `f64`, copy it
//! into double precision scratch and return freshly owned `f64` results.
//!
//! - **Factorizations**: [`lu::LuDecomposition`], [`qr::QrDecomposition`],
//!   [`cholesky::CholeskyDecomposition`], [`eigen::EigenDecomposition`] and
//!   [`svd::SvdDecomposition`]
//! - **Operations**: determinant, rank, solve, inverse and friends in [`ops`]
//! - **Batches**: independent decompositions on the rayon pool in [`batch`]
//!
//! # Quick Start
//!
//! ```rust
//! use pixalg_matrix::DenseMatrix;
//! use pixalg_linalg::ops;
//!
//! let a = DenseMatrix::from_rows(&[[4.0, 2.0], [2.0, 3.0]]).unwrap();
//! assert!((ops::determinant(&a).unwrap() - 8.0).abs() < 1e-12);
//!
//! let chol = ops::cholesky_decomposition(&a).unwrap();
//! assert!(chol.is_spd());
//! ```

/// Batch decompositions with a selectable execution strategy.
pub mod batch;

/// Cholesky decomposition.
pub mod cholesky;

/// Eigenvalue decomposition.
pub mod eigen;

/// Error types for the decompositions and solvers.
pub mod error;

/// LU decomposition with partial pivoting.
pub mod lu;

/// Library-level operations: determinant, rank, solve, inverse.
pub mod ops;

/// Householder QR decomposition.
pub mod qr;

/// Singular value decomposition.
pub mod svd;

/// Tolerances, iteration caps and solver configuration.
pub mod tolerance;

mod utils;

pub use crate::error::LinalgError;
pub use crate::tolerance::SolverConfig;
