//! Complex 2-D spectra and helpers to inspect them.

use num_complex::Complex64;
use pixalg_matrix::{DenseMatrix, Element};

use crate::error::FftError;

/// A complex `rows x cols` spectrum stored as two real matrices.
///
/// Bin `(u, v)` holds frequency `u` along the rows and `v` along the columns,
/// with the zero frequency at `(0, 0)`. The spectrum of a real matrix is
/// Hermitian: `F(rows - u, cols - v) = conj(F(u, v))`, indices taken modulo
/// the dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    re: DenseMatrix<f64>,
    im: DenseMatrix<f64>,
}

impl Spectrum {
    /// Create a spectrum from its real and imaginary parts.
    ///
    /// # Errors
    ///
    /// Returns [`FftError::InvalidArgument`] if the parts differ in shape.
    pub fn new(re: DenseMatrix<f64>, im: DenseMatrix<f64>) -> Result<Self, FftError> {
        if re.shape() != im.shape() {
            return Err(FftError::shape_mismatch(
                "real and imaginary parts",
                re.shape(),
                im.shape(),
            ));
        }
        Ok(Self { re, im })
    }

    /// A spectrum with zero imaginary part.
    pub fn from_real<T: Element>(re: &DenseMatrix<T>) -> Result<Self, FftError> {
        let [rows, cols] = re.shape();
        Ok(Self {
            re: re.to_f64(),
            im: DenseMatrix::zeros(rows, cols)?,
        })
    }

    pub(crate) fn from_buffer(
        rows: usize,
        cols: usize,
        buf: &[Complex64],
    ) -> Result<Self, FftError> {
        let re = DenseMatrix::new(rows, cols, buf.iter().map(|c| c.re).collect())?;
        let im = DenseMatrix::new(rows, cols, buf.iter().map(|c| c.im).collect())?;
        Ok(Self { re, im })
    }

    pub(crate) fn to_buffer(&self) -> Vec<Complex64> {
        self.re
            .as_slice()
            .iter()
            .zip(self.im.as_slice())
            .map(|(&re, &im)| Complex64::new(re, im))
            .collect()
    }

    /// The real part.
    pub fn re(&self) -> &DenseMatrix<f64> {
        &self.re
    }

    /// The imaginary part.
    pub fn im(&self) -> &DenseMatrix<f64> {
        &self.im
    }

    /// Split into `(re, im)`.
    pub fn into_parts(self) -> (DenseMatrix<f64>, DenseMatrix<f64>) {
        (self.re, self.im)
    }

    /// `[rows, cols]`.
    pub fn shape(&self) -> [usize; 2] {
        self.re.shape()
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.re.rows()
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.re.cols()
    }

    /// The complex value of bin `(u, v)`.
    ///
    /// # Errors
    ///
    /// Returns [`FftError::Matrix`] if the bin is out of range.
    pub fn get(&self, u: usize, v: usize) -> Result<Complex64, FftError> {
        Ok(Complex64::new(self.re.get(u, v)?, self.im.get(u, v)?))
    }

    fn map_bins(&self, f: impl Fn(Complex64) -> f64) -> DenseMatrix<f64> {
        let mut out = self.re.clone();
        for (o, (&re, &im)) in out
            .as_slice_mut()
            .iter_mut()
            .zip(self.re.as_slice().iter().zip(self.im.as_slice()))
        {
            *o = f(Complex64::new(re, im));
        }
        out
    }

    /// `|F(u, v)|` for every bin.
    pub fn magnitude(&self) -> DenseMatrix<f64> {
        self.map_bins(|c| c.norm())
    }

    /// `arg F(u, v)` in `(-pi, pi]` for every bin.
    pub fn phase(&self) -> DenseMatrix<f64> {
        self.map_bins(|c| c.arg())
    }

    /// `|F(u, v)|^2` for every bin.
    pub fn power(&self) -> DenseMatrix<f64> {
        self.map_bins(|c| c.norm_sqr())
    }

    /// The complex conjugate spectrum.
    pub fn conj(&self) -> Self {
        Self {
            re: self.re.clone(),
            im: self.im.scale(-1.0),
        }
    }
}

fn roll<T: Element>(a: &DenseMatrix<T>, row_shift: usize, col_shift: usize) -> DenseMatrix<T> {
    let [rows, cols] = a.shape();
    let mut out = a.clone();
    for r in 0..rows {
        for c in 0..cols {
            out[((r + row_shift) % rows, (c + col_shift) % cols)] = a[(r, c)];
        }
    }
    out
}

/// Move the zero frequency from `(0, 0)` to the centre `(rows / 2, cols / 2)`.
///
/// # Examples
///
/// ```
/// use pixalg_matrix::DenseMatrix;
/// use pixalg_fft::spectrum::fftshift;
///
/// let a = DenseMatrix::from_rows(&[[0.0, 1.0, 2.0]]).unwrap();
/// assert_eq!(fftshift(&a).as_slice(), &[2.0, 0.0, 1.0]);
/// ```
pub fn fftshift<T: Element>(a: &DenseMatrix<T>) -> DenseMatrix<T> {
    roll(a, a.rows() / 2, a.cols() / 2)
}

/// Undo [`fftshift`], also for odd sizes.
pub fn ifftshift<T: Element>(a: &DenseMatrix<T>) -> DenseMatrix<T> {
    let [rows, cols] = a.shape();
    roll(a, rows - rows / 2, cols - cols / 2)
}
