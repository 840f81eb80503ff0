//! LU decomposition with partial (row) pivoting.
//!
//! For an `m x n` matrix `A` the decomposition produces a unit lower triangular
//! `L` (`m x k`), an upper triangular `U` (`k x n`) and a row permutation `piv`
//! such that `A(piv, :) = L * U`, where `k = min(m, n)`.
//!
//! The factorization itself never fails, singular matrices included. Use
//! [`LuDecomposition::is_nonsingular`] before trusting [`LuDecomposition::solve`].

use pixalg_matrix::{DenseMatrix, Element};

use crate::error::LinalgError;
use crate::tolerance::diagonal_is_nonsingular;
use crate::utils::{matrix_from_fn, matrix_from_parts};

/// Result of an LU decomposition with partial pivoting.
///
/// `L` and `U` are packed into a single buffer: the strict lower triangle holds
/// `L` (its unit diagonal is implicit) and the upper triangle holds `U`.
#[derive(Debug, Clone)]
pub struct LuDecomposition {
    lu: Vec<f64>,
    m: usize,
    n: usize,
    piv: Vec<usize>,
    pivsign: f64,
}

impl LuDecomposition {
    /// Factor `a` with Gaussian elimination and partial pivoting.
    ///
    /// Uses the left-looking (Crout/Doolittle) ordering: column `j` is first
    /// updated with the dot products of the already computed columns, then the
    /// entry with the largest magnitude on or below the diagonal becomes the pivot.
    ///
    /// # Examples
    ///
    /// ```
    /// use pixalg_matrix::DenseMatrix;
    /// use pixalg_linalg::lu::LuDecomposition;
    ///
    /// let a = DenseMatrix::from_rows(&[[2.0, 1.0], [1.0, 4.0]]).unwrap();
    /// let lu = LuDecomposition::new(&a);
    /// assert!(lu.is_nonsingular());
    /// assert!((lu.determinant().unwrap() - 7.0).abs() < 1e-12);
    /// ```
    pub fn new<T: Element>(a: &DenseMatrix<T>) -> Self {
        let [m, n] = a.shape();
        log::debug!("lu: factoring {m}x{n} matrix");

        let mut lu = a.to_f64().into_vec();
        let mut piv: Vec<usize> = (0..m).collect();
        let mut pivsign = 1.0;
        let mut lu_colj = vec![0.0; m];

        for j in 0..n {
            for (i, v) in lu_colj.iter_mut().enumerate() {
                *v = lu[i * n + j];
            }

            // apply previous transformations to column j
            for i in 0..m {
                let kmax = i.min(j);
                let row_i = &lu[i * n..i * n + kmax];
                let s: f64 = row_i.iter().zip(&lu_colj[..kmax]).map(|(a, b)| a * b).sum();
                lu_colj[i] -= s;
                lu[i * n + j] = lu_colj[i];
            }

            // find pivot and exchange if necessary
            let mut p = j;
            for i in (j + 1)..m {
                if lu_colj[i].abs() > lu_colj[p].abs() {
                    p = i;
                }
            }
            if p != j {
                for k in 0..n {
                    lu.swap(p * n + k, j * n + k);
                }
                piv.swap(p, j);
                pivsign = -pivsign;
            }

            // compute multipliers
            if j < m && lu[j * n + j] != 0.0 {
                let pivot = lu[j * n + j];
                for i in (j + 1)..m {
                    lu[i * n + j] /= pivot;
                }
            }
        }

        Self {
            lu,
            m,
            n,
            piv,
            pivsign,
        }
    }

    #[inline]
    fn at(&self, i: usize, j: usize) -> f64 {
        self.lu[i * self.n + j]
    }

    fn k(&self) -> usize {
        self.m.min(self.n)
    }

    /// Whether `U` has no (near-)zero diagonal entry.
    ///
    /// An entry counts as zero when it is exactly zero or its magnitude is at
    /// most [`crate::tolerance::singular_tolerance`] of the largest diagonal
    /// magnitude. For a rectangular matrix this reports whether `U` has full rank.
    pub fn is_nonsingular(&self) -> bool {
        let diag: Vec<f64> = (0..self.k()).map(|j| self.at(j, j)).collect();
        diagonal_is_nonsingular(&diag, self.m, self.n)
    }

    /// The unit lower triangular factor `L` (`m x min(m, n)`).
    pub fn l(&self) -> DenseMatrix<f64> {
        matrix_from_fn(self.m, self.k(), |i, j| match i.cmp(&j) {
            std::cmp::Ordering::Greater => self.at(i, j),
            std::cmp::Ordering::Equal => 1.0,
            std::cmp::Ordering::Less => 0.0,
        })
    }

    /// The upper triangular factor `U` (`min(m, n) x n`).
    pub fn u(&self) -> DenseMatrix<f64> {
        matrix_from_fn(self.k(), self.n, |i, j| if i <= j { self.at(i, j) } else { 0.0 })
    }

    /// The pivot permutation: row `i` of `L * U` is row `pivot()[i]` of `A`.
    pub fn pivot(&self) -> &[usize] {
        &self.piv
    }

    /// The permutation matrix `P` with `P * A = L * U`.
    pub fn permutation_matrix(&self) -> DenseMatrix<f64> {
        let mut data = vec![0.0; self.m * self.m];
        for (i, &p) in self.piv.iter().enumerate() {
            data[i * self.m + p] = 1.0;
        }
        matrix_from_parts(self.m, self.m, data)
    }

    /// The sign of the permutation, `+1` or `-1`.
    pub fn pivot_sign(&self) -> f64 {
        self.pivsign
    }

    /// The determinant, `pivot_sign * prod(diag(U))`.
    ///
    /// # Errors
    ///
    /// Returns [`LinalgError::InvalidDimension`] if the matrix is not square.
    pub fn determinant(&self) -> Result<f64, LinalgError> {
        if self.m != self.n {
            return Err(LinalgError::invalid_dimension(
                "determinant",
                "matrix must be square",
                [self.m, self.n],
            ));
        }
        Ok((0..self.n).fold(self.pivsign, |d, j| d * self.at(j, j)))
    }

    /// Solve `A * X = B` with forward and back substitution.
    ///
    /// # Errors
    ///
    /// * [`LinalgError::InvalidDimension`] if `A` is not square.
    /// * [`LinalgError::DimensionMismatch`] if `B` does not have `m` rows.
    /// * [`LinalgError::SingularMatrix`] if `A` is singular.
    pub fn solve<T: Element>(&self, b: &DenseMatrix<T>) -> Result<DenseMatrix<f64>, LinalgError> {
        if self.m != self.n {
            return Err(LinalgError::invalid_dimension(
                "lu solve",
                "matrix must be square",
                [self.m, self.n],
            ));
        }
        if b.rows() != self.m {
            return Err(LinalgError::dimension_mismatch(
                "right-hand side must have as many rows as the matrix",
                [self.m, b.cols()],
                b.shape(),
            ));
        }
        if !self.is_nonsingular() {
            return Err(LinalgError::SingularMatrix);
        }

        let n = self.n;
        let nx = b.cols();
        let b = b.to_f64();
        let mut x = Vec::with_capacity(n * nx);
        for &p in &self.piv {
            x.extend_from_slice(b.row(p)?);
        }

        // solve L * Y = B(piv, :)
        for k in 0..n {
            for i in (k + 1)..n {
                let lik = self.at(i, k);
                for j in 0..nx {
                    x[i * nx + j] -= x[k * nx + j] * lik;
                }
            }
        }

        // solve U * X = Y
        for k in (0..n).rev() {
            let ukk = self.at(k, k);
            for j in 0..nx {
                x[k * nx + j] /= ukk;
            }
            for i in 0..k {
                let uik = self.at(i, k);
                for j in 0..nx {
                    x[i * nx + j] -= x[k * nx + j] * uik;
                }
            }
        }

        Ok(matrix_from_parts(n, nx, x))
    }
}
