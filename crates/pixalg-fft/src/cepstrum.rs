//! Real 2-D cepstrum.

use pixalg_matrix::{DenseMatrix, Element};

use crate::error::FftError;
use crate::fft2d::{fft2d, ifft2d};
use crate::spectrum::Spectrum;

/// Real cepstrum `ifft2d(ln |fft2d(a)|)`.
///
/// Returns `Ok(None)` when a spectral bin has zero magnitude: the logarithm is
/// undefined there and the cepstrum does not exist. A bin counts as zero when
/// its magnitude is at or below `EPSILON * rows * cols * max|F|`, the rounding
/// level of the transform.
///
/// # Examples
///
/// ```
/// use pixalg_matrix::DenseMatrix;
/// use pixalg_fft::cepstrum::cepstrum;
///
/// // zero mean, so the (0, 0) bin vanishes
/// let a = DenseMatrix::from_rows(&[[1.0, -1.0], [1.0, -1.0]]).unwrap();
/// assert!(cepstrum(&a).unwrap().is_none());
/// ```
pub fn cepstrum<T: Element>(a: &DenseMatrix<T>) -> Result<Option<DenseMatrix<f64>>, FftError> {
    let [rows, cols] = a.shape();
    let magnitude = fft2d(a)?.magnitude();
    let tol = f64::EPSILON * (rows * cols) as f64 * magnitude.max_abs();
    if magnitude.as_slice().iter().any(|&m| m <= tol) {
        log::debug!("cepstrum: spectrum has a zero bin, no cepstrum");
        return Ok(None);
    }
    let log_spectrum = Spectrum::from_real(&magnitude.map(f64::ln))?;
    Ok(Some(ifft2d(&log_spectrum)?))
}
