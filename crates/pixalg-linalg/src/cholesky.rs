//! Cholesky decomposition of symmetric positive definite matrices.
//!
//! For a symmetric positive definite `A` the decomposition produces a lower
//! triangular `L` with `A = L * L^T`. When `A` is not SPD the factorization
//! stops at the first non-positive pivot and keeps the partial factor, with
//! every row from the failing one on set to zero. Always check
//! [`CholeskyDecomposition::is_spd`] before trusting [`CholeskyDecomposition::l`].

use pixalg_matrix::{DenseMatrix, Element};

use crate::error::LinalgError;
use crate::tolerance::EPSILON;
use crate::utils::matrix_from_parts;

/// Result of a Cholesky decomposition.
#[derive(Debug, Clone)]
pub struct CholeskyDecomposition {
    l: Vec<f64>,
    n: usize,
    is_spd: bool,
    /// Row at which the factorization stopped, if it did.
    failed_row: Option<usize>,
}

impl CholeskyDecomposition {
    /// Factor `a` row by row (Cholesky-Banachiewicz).
    ///
    /// Only the lower triangle feeds the factor; the upper triangle is used for
    /// the symmetry check (`|a[i][j] - a[j][i]| <= n * EPSILON * max|a|`).
    ///
    /// # Errors
    ///
    /// Returns [`LinalgError::InvalidDimension`] if `a` is not square.
    ///
    /// # Examples
    ///
    /// ```
    /// use pixalg_matrix::DenseMatrix;
    /// use pixalg_linalg::cholesky::CholeskyDecomposition;
    ///
    /// let a = DenseMatrix::from_rows(&[[4.0, 2.0], [2.0, 3.0]]).unwrap();
    /// let chol = CholeskyDecomposition::new(&a).unwrap();
    /// assert!(chol.is_spd());
    /// assert_eq!(chol.l().get(1, 0).unwrap(), 1.0);
    /// ```
    pub fn new<T: Element>(a: &DenseMatrix<T>) -> Result<Self, LinalgError> {
        let [m, n] = a.shape();
        if m != n {
            return Err(LinalgError::invalid_dimension(
                "cholesky decomposition",
                "matrix must be square",
                [m, n],
            ));
        }
        log::debug!("cholesky: factoring {n}x{n} matrix");

        let a = a.to_f64();
        let sym_tol = n as f64 * EPSILON * a.max_abs();
        let mut l = vec![0.0; n * n];
        let mut is_spd = true;
        let mut failed_row = None;

        for j in 0..n {
            let mut d = 0.0;
            for k in 0..j {
                let mut s = 0.0;
                for i in 0..k {
                    s += l[k * n + i] * l[j * n + i];
                }
                s = (a[(j, k)] - s) / l[k * n + k];
                l[j * n + k] = s;
                d += s * s;
                is_spd = is_spd && (a[(k, j)] - a[(j, k)]).abs() <= sym_tol;
            }
            d = a[(j, j)] - d;
            if d <= 0.0 || d.is_nan() {
                // keep rows 0..j, the rest of the factor stays zero
                for k in 0..j {
                    l[j * n + k] = 0.0;
                }
                log::debug!("cholesky: non-positive pivot {d} at row {j}");
                is_spd = false;
                failed_row = Some(j);
                break;
            }
            l[j * n + j] = d.sqrt();
        }

        Ok(Self {
            l,
            n,
            is_spd,
            failed_row,
        })
    }

    /// Whether the input was symmetric positive definite.
    pub fn is_spd(&self) -> bool {
        self.is_spd
    }

    /// The row where the factorization hit a non-positive pivot, if any.
    pub fn failed_row(&self) -> Option<usize> {
        self.failed_row
    }

    /// The lower triangular factor, partial when [`Self::is_spd`] is false.
    pub fn l(&self) -> DenseMatrix<f64> {
        matrix_from_parts(self.n, self.n, self.l.clone())
    }

    /// Solve `A * X = B` with `L * Y = B` then `L^T * X = Y`.
    ///
    /// # Errors
    ///
    /// * [`LinalgError::DimensionMismatch`] if `B` does not have `n` rows.
    /// * [`LinalgError::NotPositiveDefinite`] if the input was not SPD.
    pub fn solve<T: Element>(&self, b: &DenseMatrix<T>) -> Result<DenseMatrix<f64>, LinalgError> {
        let n = self.n;
        if b.rows() != n {
            return Err(LinalgError::dimension_mismatch(
                "right-hand side must have as many rows as the matrix",
                [n, b.cols()],
                b.shape(),
            ));
        }
        if !self.is_spd {
            return Err(LinalgError::NotPositiveDefinite);
        }

        let nx = b.cols();
        let mut x = b.to_f64().into_vec();
        let l = |i: usize, j: usize| self.l[i * n + j];

        // solve L * Y = B
        for k in 0..n {
            for j in 0..nx {
                for i in 0..k {
                    x[k * nx + j] -= x[i * nx + j] * l(k, i);
                }
                x[k * nx + j] /= l(k, k);
            }
        }

        // solve L^T * X = Y
        for k in (0..n).rev() {
            for j in 0..nx {
                for i in (k + 1)..n {
                    x[k * nx + j] -= x[i * nx + j] * l(i, k);
                }
                x[k * nx + j] /= l(k, k);
            }
        }

        Ok(matrix_from_parts(n, nx, x))
    }
}
