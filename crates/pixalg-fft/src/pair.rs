//! The "2-for-1" transform: two real matrices through a single complex FFT.
//!
//! With `c = a + i*b` the spectrum of `c` splits back into the spectra of `a`
//! and `b` through Hermitian symmetry:
//!
//! ```text
//! F_a(u, v) = (F_c(u, v) + conj F_c(-u, -v)) / 2
//! F_b(u, v) = (F_c(u, v) - conj F_c(-u, -v)) / (2i)
//! ```
//!
//! Negative indices are taken modulo the dimensions.

use num_complex::Complex64;
use pixalg_matrix::{DenseMatrix, Element};

use crate::error::FftError;
use crate::fft2d::transform_2d;
use crate::plan::Direction;
use crate::spectrum::Spectrum;

/// Forward 2-D FFT of two equally sized real matrices with one complex transform.
///
/// The result equals `(fft2d(a)?, fft2d(b)?)` up to rounding.
///
/// # Errors
///
/// Returns [`FftError::InvalidArgument`] if `a` and `b` differ in shape.
///
/// # Examples
///
/// ```
/// use pixalg_matrix::DenseMatrix;
/// use pixalg_fft::{fft2d, fft2x};
///
/// let a = DenseMatrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
/// let b = DenseMatrix::from_rows(&[[0.0, -1.0], [5.0, 2.0]]).unwrap();
/// let (fa, fb) = fft2x(&a, &b).unwrap();
/// let fb_direct = fft2d(&b).unwrap();
/// assert!(fb.re().max_abs_diff(fb_direct.re()).unwrap() < 1e-12);
/// assert!((fa.re().get(0, 0).unwrap() - 10.0).abs() < 1e-12);
/// ```
pub fn fft2x<T: Element>(
    a: &DenseMatrix<T>,
    b: &DenseMatrix<T>,
) -> Result<(Spectrum, Spectrum), FftError> {
    if a.shape() != b.shape() {
        return Err(FftError::shape_mismatch("fft2x inputs", a.shape(), b.shape()));
    }
    let [rows, cols] = a.shape();
    log::debug!("fft2x: two {rows}x{cols} matrices");

    let mut fc: Vec<Complex64> = a
        .as_slice()
        .iter()
        .zip(b.as_slice())
        .map(|(x, y)| Complex64::new(x.to_double(), y.to_double()))
        .collect();
    transform_2d(&mut fc, rows, cols, Direction::Forward)?;

    let mut fa = vec![Complex64::default(); rows * cols];
    let mut fb = vec![Complex64::default(); rows * cols];
    for u in 0..rows {
        for v in 0..cols {
            let idx = u * cols + v;
            let mirror = ((rows - u) % rows) * cols + (cols - v) % cols;

            if mirror == idx {
                // the bin is its own mirror, both spectra are real there
                fa[idx] = Complex64::new(fc[idx].re, 0.0);
                fb[idx] = Complex64::new(fc[idx].im, 0.0);
            } else if idx < mirror {
                let z = fc[idx];
                let zm = fc[mirror].conj();
                let sa = (z + zm) * 0.5;
                // (z - zm) / 2i
                let d = z - zm;
                let sb = Complex64::new(d.im * 0.5, -d.re * 0.5);
                fa[idx] = sa;
                fb[idx] = sb;
                fa[mirror] = sa.conj();
                fb[mirror] = sb.conj();
            }
        }
    }

    Ok((
        Spectrum::from_buffer(rows, cols, &fa)?,
        Spectrum::from_buffer(rows, cols, &fb)?,
    ))
}

/// Inverse of [`fft2x`]: recover two real matrices from their spectra with one
/// complex inverse transform.
///
/// Packs `F_c = F_a + i*F_b`; the real part of the inverse is `a`, the
/// imaginary part is `b`.
///
/// # Errors
///
/// Returns [`FftError::InvalidArgument`] if the spectra differ in shape.
pub fn ifft2x(
    sa: &Spectrum,
    sb: &Spectrum,
) -> Result<(DenseMatrix<f64>, DenseMatrix<f64>), FftError> {
    if sa.shape() != sb.shape() {
        return Err(FftError::shape_mismatch("ifft2x inputs", sa.shape(), sb.shape()));
    }
    let [rows, cols] = sa.shape();
    log::debug!("ifft2x: two {rows}x{cols} spectra");

    let i = Complex64::i();
    let mut fc: Vec<Complex64> = sa
        .to_buffer()
        .into_iter()
        .zip(sb.to_buffer())
        .map(|(x, y)| x + i * y)
        .collect();
    transform_2d(&mut fc, rows, cols, Direction::Inverse)?;

    let a = DenseMatrix::new(rows, cols, fc.iter().map(|c| c.re).collect())?;
    let b = DenseMatrix::new(rows, cols, fc.iter().map(|c| c.im).collect())?;
    Ok((a, b))
}
