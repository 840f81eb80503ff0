#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Overview
//!
//! - **Plans**: [`plan::FftPlan`], 1-D transforms of any length (radix-2 or Bluestein)
//! - **2-D transforms**: [`fft2d`], [`ifft2d`] and their complex counterparts
//! - **2-for-1**: [`fft2x`] / [`ifft2x`] transform two real matrices at the cost of one
//! - **Spectra**: [`Spectrum`] with magnitude, phase and power views,
//!   [`spectrum::fftshift`] / [`spectrum::ifftshift`] and the [`cepstrum::cepstrum`]
//!
//! # Quick Start
//!
//! ```rust
//! use pixalg_matrix::DenseMatrix;
//! use pixalg_fft::{fft2d, ifft2d};
//!
//! let a = DenseMatrix::from_fn(3, 5, |r, c| (r + 2 * c) as f64).unwrap();
//! let back = ifft2d(&fft2d(&a).unwrap()).unwrap();
//! assert!(back.max_abs_diff(&a).unwrap() < 1e-10);
//! ```

/// Real cepstrum.
pub mod cepstrum;

/// Error types for the FFT engine.
pub mod error;

/// Two-dimensional transforms.
pub mod fft2d;

/// The 2-for-1 real pair transform.
pub mod pair;

/// One-dimensional FFT plans.
pub mod plan;

/// Complex spectra and frequency shifts.
pub mod spectrum;

pub use num_complex::Complex64;

pub use crate::error::FftError;
pub use crate::fft2d::{fft2d, fft2d_complex, ifft2d, ifft2d_complex};
pub use crate::pair::{fft2x, ifft2x};
pub use crate::spectrum::Spectrum;
