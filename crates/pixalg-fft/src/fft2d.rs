//! Two-dimensional transforms: a 1-D pass over every row, then over every column.
//!
//! The forward transform is unnormalized, the inverse divides by `rows * cols`,
//! so `ifft2d(fft2d(x)) == x` up to rounding for any size.

use num_complex::Complex64;
use pixalg_matrix::{DenseMatrix, Element};

use crate::error::FftError;
use crate::plan::{Direction, FftPlan};
use crate::spectrum::Spectrum;

/// Transform a row-major `rows x cols` buffer in place.
///
/// The inverse direction includes the `1 / (rows * cols)` normalization.
pub(crate) fn transform_2d(
    buf: &mut [Complex64],
    rows: usize,
    cols: usize,
    direction: Direction,
) -> Result<(), FftError> {
    debug_assert_eq!(buf.len(), rows * cols);

    let row_plan = FftPlan::new(cols)?;
    for row in buf.chunks_exact_mut(cols) {
        row_plan.process(row, direction)?;
    }

    let col_plan = FftPlan::new(rows)?;
    let mut column = vec![Complex64::default(); rows];
    for c in 0..cols {
        for (r, x) in column.iter_mut().enumerate() {
            *x = buf[r * cols + c];
        }
        col_plan.process(&mut column, direction)?;
        for (r, x) in column.iter().enumerate() {
            buf[r * cols + c] = *x;
        }
    }

    if direction == Direction::Inverse {
        let scale = 1.0 / (rows * cols) as f64;
        buf.iter_mut().for_each(|x| *x *= scale);
    }
    Ok(())
}

/// Forward 2-D FFT of a real matrix.
///
/// # Errors
///
/// Only fails on an internal shape inconsistency, reported as [`FftError::Matrix`].
///
/// # Examples
///
/// ```
/// use pixalg_matrix::DenseMatrix;
/// use pixalg_fft::fft2d;
///
/// let a = DenseMatrix::from_shape_val(2, 3, 1.5).unwrap();
/// let s = fft2d(&a).unwrap();
/// assert!((s.re().get(0, 0).unwrap() - 9.0).abs() < 1e-12);
/// assert!(s.magnitude().get(1, 2).unwrap() < 1e-12);
/// ```
pub fn fft2d<T: Element>(a: &DenseMatrix<T>) -> Result<Spectrum, FftError> {
    let [rows, cols] = a.shape();
    log::debug!("fft2d: {rows}x{cols}");
    let mut buf: Vec<Complex64> = a
        .as_slice()
        .iter()
        .map(|x| Complex64::new(x.to_double(), 0.0))
        .collect();
    transform_2d(&mut buf, rows, cols, Direction::Forward)?;
    Spectrum::from_buffer(rows, cols, &buf)
}

/// Forward 2-D FFT of a complex input.
pub fn fft2d_complex(input: &Spectrum) -> Result<Spectrum, FftError> {
    let [rows, cols] = input.shape();
    log::debug!("fft2d_complex: {rows}x{cols}");
    let mut buf = input.to_buffer();
    transform_2d(&mut buf, rows, cols, Direction::Forward)?;
    Spectrum::from_buffer(rows, cols, &buf)
}

/// Normalized inverse 2-D FFT with a complex result.
pub fn ifft2d_complex(input: &Spectrum) -> Result<Spectrum, FftError> {
    let [rows, cols] = input.shape();
    log::debug!("ifft2d_complex: {rows}x{cols}");
    let mut buf = input.to_buffer();
    transform_2d(&mut buf, rows, cols, Direction::Inverse)?;
    Spectrum::from_buffer(rows, cols, &buf)
}

/// Normalized inverse 2-D FFT, keeping the real part.
///
/// The imaginary part is only rounding noise when `input` is the spectrum of a
/// real matrix.
pub fn ifft2d(input: &Spectrum) -> Result<DenseMatrix<f64>, FftError> {
    let (re, _) = ifft2d_complex(input)?.into_parts();
    Ok(re)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample(rows: usize, cols: usize) -> Result<DenseMatrix<f64>, FftError> {
        Ok(DenseMatrix::from_fn(rows, cols, |r, c| {
            ((r * 7 + c * 3) % 11) as f64 - 0.5 * r as f64
        })?)
    }

    #[test]
    fn test_constant_matrix_has_single_coefficient() -> Result<(), FftError> {
        let c = 2.5;
        for (rows, cols) in [(4, 8), (3, 5)] {
            let a = DenseMatrix::from_shape_val(rows, cols, c)?;
            let s = fft2d(&a)?;
            for u in 0..rows {
                for v in 0..cols {
                    let bin = s.get(u, v)?;
                    if (u, v) == (0, 0) {
                        assert_relative_eq!(bin.re, c * (rows * cols) as f64, epsilon = 1e-10);
                        assert_relative_eq!(bin.im, 0.0, epsilon = 1e-10);
                    } else {
                        assert!(bin.norm() < 1e-10);
                    }
                }
            }
        }
        Ok(())
    }

    #[test]
    fn test_round_trip_any_size() -> Result<(), FftError> {
        for (rows, cols) in [(1, 1), (1, 6), (8, 4), (3, 5), (6, 7)] {
            let a = sample(rows, cols)?;
            let back = ifft2d(&fft2d(&a)?)?;
            assert!(back.max_abs_diff(&a)? < 1e-10);
        }
        Ok(())
    }

    #[test]
    fn test_real_input_is_hermitian() -> Result<(), FftError> {
        let (rows, cols) = (5, 6);
        let s = fft2d(&sample(rows, cols)?)?;
        for u in 0..rows {
            for v in 0..cols {
                let a = s.get(u, v)?;
                let b = s.get((rows - u) % rows, (cols - v) % cols)?;
                assert_relative_eq!(a.re, b.re, epsilon = 1e-10);
                assert_relative_eq!(a.im, -b.im, epsilon = 1e-10);
            }
        }
        Ok(())
    }

    #[test]
    fn test_single_row_matches_dft() -> Result<(), FftError> {
        // x = [1, 2, 3, 4] -> X = [10, -2 + 2i, -2, -2 - 2i]
        let a = DenseMatrix::from_rows(&[[1.0f32, 2.0, 3.0, 4.0]])?;
        let s = fft2d(&a)?;
        let expected = [(10.0, 0.0), (-2.0, 2.0), (-2.0, 0.0), (-2.0, -2.0)];
        for (v, (re, im)) in expected.iter().enumerate() {
            assert_relative_eq!(s.get(0, v)?.re, *re, epsilon = 1e-12);
            assert_relative_eq!(s.get(0, v)?.im, *im, epsilon = 1e-12);
        }
        Ok(())
    }

    #[test]
    fn test_complex_round_trip() -> Result<(), FftError> {
        let input = Spectrum::new(sample(4, 3)?, sample(4, 3)?.scale(-0.5))?;
        let back = ifft2d_complex(&fft2d_complex(&input)?)?;
        assert!(back.re().max_abs_diff(input.re())? < 1e-10);
        assert!(back.im().max_abs_diff(input.im())? < 1e-10);
        Ok(())
    }
}
