//! QR decomposition with Householder reflections.
//!
//! For an `m x n` matrix `A` with `m >= n` the decomposition produces `Q`
//! (`m x n`, orthonormal columns) and `R` (`n x n`, upper triangular) with
//! `A = Q * R`. The reflections are stored implicitly and `Q` is only formed
//! when asked for. The main use is the least squares solution of `A * X = B`.

use pixalg_matrix::{DenseMatrix, Element};

use crate::error::LinalgError;
use crate::tolerance::diagonal_is_nonsingular;
use crate::utils::{matrix_from_fn, matrix_from_parts};

/// Result of a Householder QR decomposition.
#[derive(Debug, Clone)]
pub struct QrDecomposition {
    /// Householder vectors below and on the diagonal, strict upper triangle of `R` above.
    qr: Vec<f64>,
    m: usize,
    n: usize,
    rdiag: Vec<f64>,
}

impl QrDecomposition {
    /// Factor `a` column by column with Householder reflections.
    ///
    /// # Errors
    ///
    /// Returns [`LinalgError::InvalidDimension`] if `a` has fewer rows than columns.
    ///
    /// # Examples
    ///
    /// ```
    /// use pixalg_matrix::DenseMatrix;
    /// use pixalg_linalg::qr::QrDecomposition;
    ///
    /// let a = DenseMatrix::from_rows(&[[3.0, 0.0], [4.0, 1.0]]).unwrap();
    /// let qr = QrDecomposition::new(&a).unwrap();
    /// assert!(qr.is_full_rank());
    /// assert!((qr.r().get(0, 0).unwrap().abs() - 5.0).abs() < 1e-12);
    /// ```
    pub fn new<T: Element>(a: &DenseMatrix<T>) -> Result<Self, LinalgError> {
        let [m, n] = a.shape();
        if m < n {
            return Err(LinalgError::invalid_dimension(
                "qr decomposition",
                "rows must be greater than or equal to columns",
                [m, n],
            ));
        }
        log::debug!("qr: factoring {m}x{n} matrix");

        let mut qr = a.to_f64().into_vec();
        let mut rdiag = vec![0.0; n];

        for k in 0..n {
            // 2-norm of the k-th column below the diagonal, without under/overflow
            let mut nrm = 0.0f64;
            for i in k..m {
                nrm = nrm.hypot(qr[i * n + k]);
            }

            if nrm != 0.0 {
                // form the k-th Householder vector
                if qr[k * n + k] < 0.0 {
                    nrm = -nrm;
                }
                for i in k..m {
                    qr[i * n + k] /= nrm;
                }
                qr[k * n + k] += 1.0;

                // apply the transformation to the remaining columns
                for j in (k + 1)..n {
                    let mut s = 0.0;
                    for i in k..m {
                        s += qr[i * n + k] * qr[i * n + j];
                    }
                    s = -s / qr[k * n + k];
                    for i in k..m {
                        qr[i * n + j] += s * qr[i * n + k];
                    }
                }
            }
            rdiag[k] = -nrm;
        }

        Ok(Self { qr, m, n, rdiag })
    }

    #[inline]
    fn at(&self, i: usize, j: usize) -> f64 {
        self.qr[i * self.n + j]
    }

    /// Whether every diagonal entry of `R` is clear of the singular tolerance.
    pub fn is_full_rank(&self) -> bool {
        diagonal_is_nonsingular(&self.rdiag, self.m, self.n)
    }

    /// The Householder vectors as the columns of a lower trapezoidal `m x n` matrix.
    pub fn h(&self) -> DenseMatrix<f64> {
        matrix_from_fn(self.m, self.n, |i, j| if i >= j { self.at(i, j) } else { 0.0 })
    }

    /// The upper triangular factor `R` (`n x n`).
    pub fn r(&self) -> DenseMatrix<f64> {
        matrix_from_fn(self.n, self.n, |i, j| match i.cmp(&j) {
            std::cmp::Ordering::Less => self.at(i, j),
            std::cmp::Ordering::Equal => self.rdiag[i],
            std::cmp::Ordering::Greater => 0.0,
        })
    }

    /// The factor `Q` (`m x n`) with orthonormal columns, formed explicitly.
    pub fn q(&self) -> DenseMatrix<f64> {
        let (m, n) = (self.m, self.n);
        let mut q = vec![0.0; m * n];
        for k in (0..n).rev() {
            for i in 0..m {
                q[i * n + k] = 0.0;
            }
            q[k * n + k] = 1.0;
            let qkk = self.at(k, k);
            if qkk == 0.0 {
                continue;
            }
            for j in k..n {
                let mut s = 0.0;
                for i in k..m {
                    s += self.at(i, k) * q[i * n + j];
                }
                s = -s / qkk;
                for i in k..m {
                    q[i * n + j] += s * self.at(i, k);
                }
            }
        }
        matrix_from_parts(m, n, q)
    }

    /// Least squares solution `X` (`n x nx`) minimising `||A * X - B||`.
    ///
    /// # Errors
    ///
    /// * [`LinalgError::DimensionMismatch`] if `B` does not have `m` rows.
    /// * [`LinalgError::SingularMatrix`] if `A` is rank deficient.
    pub fn solve<T: Element>(&self, b: &DenseMatrix<T>) -> Result<DenseMatrix<f64>, LinalgError> {
        let (m, n) = (self.m, self.n);
        if b.rows() != m {
            return Err(LinalgError::dimension_mismatch(
                "right-hand side must have as many rows as the matrix",
                [m, b.cols()],
                b.shape(),
            ));
        }
        if !self.is_full_rank() {
            return Err(LinalgError::SingularMatrix);
        }

        let nx = b.cols();
        let mut x = b.to_f64().into_vec();

        // compute Y = transpose(Q) * B
        for k in 0..n {
            let qkk = self.at(k, k);
            for j in 0..nx {
                let mut s = 0.0;
                for i in k..m {
                    s += self.at(i, k) * x[i * nx + j];
                }
                s = -s / qkk;
                for i in k..m {
                    x[i * nx + j] += s * self.at(i, k);
                }
            }
        }

        // solve R * X = Y
        for k in (0..n).rev() {
            for j in 0..nx {
                x[k * nx + j] /= self.rdiag[k];
            }
            for i in 0..k {
                let rik = self.at(i, k);
                for j in 0..nx {
                    x[i * nx + j] -= x[k * nx + j] * rik;
                }
            }
        }

        x.truncate(n * nx);
        Ok(matrix_from_parts(n, nx, x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_qr_reconstruction_and_orthogonality() -> Result<(), LinalgError> {
        let a = DenseMatrix::from_rows(&[
            [12.0, -51.0, 4.0],
            [6.0, 167.0, -68.0],
            [-4.0, 24.0, -41.0],
            [1.0, 2.0, 3.0],
        ])?;
        let qr = QrDecomposition::new(&a)?;
        let q = qr.q();
        let r = qr.r();
        assert_eq!(q.shape(), [4, 3]);
        assert_eq!(r.shape(), [3, 3]);

        assert!(q.matmul(&r)?.max_abs_diff(&a)? < 1e-10);

        let qtq = q.transpose().matmul(&q)?;
        assert!(qtq.max_abs_diff(&DenseMatrix::identity(3)?)? < 1e-12);

        for i in 0..3 {
            for j in 0..i {
                assert_eq!(r.get(i, j)?, 0.0);
            }
        }
        assert!(qr.is_full_rank());
        Ok(())
    }

    #[test]
    fn test_qr_least_squares() -> Result<(), LinalgError> {
        // fit y = 1 + 2x exactly through 4 points
        let a = DenseMatrix::from_rows(&[[1.0, 0.0], [1.0, 1.0], [1.0, 2.0], [1.0, 3.0]])?;
        let b = DenseMatrix::from_rows(&[[1.0], [3.0], [5.0], [7.0]])?;
        let x = QrDecomposition::new(&a)?.solve(&b)?;
        assert_eq!(x.shape(), [2, 1]);
        assert_relative_eq!(x.get(0, 0)?, 1.0, epsilon = 1e-12);
        assert_relative_eq!(x.get(1, 0)?, 2.0, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn test_qr_rank_deficient() -> Result<(), LinalgError> {
        let a = DenseMatrix::from_rows(&[[1.0, 2.0], [2.0, 4.0], [3.0, 6.0]])?;
        let qr = QrDecomposition::new(&a)?;
        assert!(!qr.is_full_rank());
        assert_eq!(
            qr.solve(&DenseMatrix::<f64>::zeros(3, 1)?),
            Err(LinalgError::SingularMatrix)
        );
        Ok(())
    }

    #[test]
    fn test_qr_rejects_wide() -> Result<(), LinalgError> {
        let a = DenseMatrix::<f64>::zeros(2, 3)?;
        assert!(matches!(
            QrDecomposition::new(&a),
            Err(LinalgError::InvalidDimension { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_qr_scalar() -> Result<(), LinalgError> {
        let qr = QrDecomposition::new(&DenseMatrix::new(1, 1, vec![-2.0])?)?;
        assert_relative_eq!(qr.q().get(0, 0)? * qr.r().get(0, 0)?, -2.0);
        assert_relative_eq!(qr.q().get(0, 0)?.abs(), 1.0);
        Ok(())
    }
}
