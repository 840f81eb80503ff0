#![deny(missing_docs)]
//! Dense linear algebra and 2D FFT for image processing.
//!
//! This crate re-exports the workspace crates under short names:
//!
//! - [`matrix`]: the [`matrix::DenseMatrix`] type and the image plane adapters
//! - [`linalg`]: LU, QR, Cholesky, eigenvalue and singular value decompositions,
//!   solvers, inverses and batch execution
//! - [`fft`]: 2-D FFTs of any size, the 2-for-1 real pair transform and spectrum tools
//!
//! ```rust
//! use pixalg::matrix::DenseMatrix;
//! use pixalg::{fft, linalg};
//!
//! let a = DenseMatrix::from_rows(&[[0.0, 1.0], [1.0, 0.0]]).unwrap();
//! let eig = linalg::ops::eigen_decomposition(&a).unwrap();
//! assert!((eig.real_eigenvalues()[0] + 1.0).abs() < 1e-12);
//!
//! let spectrum = fft::fft2d(&a).unwrap();
//! assert!((spectrum.re().get(0, 0).unwrap() - 2.0).abs() < 1e-12);
//! ```

#[doc(inline)]
pub use pixalg_matrix as matrix;

#[doc(inline)]
pub use pixalg_linalg as linalg;

#[doc(inline)]
pub use pixalg_fft as fft;
