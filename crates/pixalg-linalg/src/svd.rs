//! Singular value decomposition.
//!
//! For an `m x n` matrix `A` with `m >= n` the decomposition produces `U`
//! (`m x n`, orthonormal columns), `S` (`n x n`, diagonal, non-negative,
//! descending) and `V` (`n x n`, orthogonal) with `A = U * S * V^T`.
//!
//! The matrix is first reduced to bidiagonal form with Householder
//! transformations, then diagonalised with the implicit-shift Golub-Kahan
//! iteration. The decomposition always exists; it only fails when the
//! iteration cap is hit.

use pixalg_matrix::{DenseMatrix, Element};

use crate::error::LinalgError;
use crate::tolerance::{SolverConfig, EPSILON};
use crate::utils::{matrix_from_fn, matrix_from_parts};

/// Values below `2^-966` are treated as zero by the convergence tests.
const TINY: f64 = 1.6033346880071782e-291;

/// Result of a singular value decomposition.
#[derive(Debug, Clone)]
pub struct SvdDecomposition {
    u: DenseMatrix<f64>,
    v: DenseMatrix<f64>,
    s: Vec<f64>,
    m: usize,
    n: usize,
}

impl SvdDecomposition {
    /// Decompose `a` with the default [`SolverConfig`].
    ///
    /// # Errors
    ///
    /// See [`SvdDecomposition::with_config`].
    ///
    /// # Examples
    ///
    /// ```
    /// use pixalg_matrix::DenseMatrix;
    /// use pixalg_linalg::svd::SvdDecomposition;
    ///
    /// let a = DenseMatrix::from_rows(&[[3.0, 0.0], [0.0, -4.0], [0.0, 0.0]]).unwrap();
    /// let svd = SvdDecomposition::new(&a).unwrap();
    /// assert!((svd.singular_values()[0] - 4.0).abs() < 1e-12);
    /// assert!((svd.singular_values()[1] - 3.0).abs() < 1e-12);
    /// ```
    pub fn new<T: Element>(a: &DenseMatrix<T>) -> Result<Self, LinalgError> {
        Self::with_config(a, &SolverConfig::default())
    }

    /// Decompose `a`, allowing `config.max_svd_iterations` QR sweeps per
    /// singular value.
    ///
    /// # Errors
    ///
    /// * [`LinalgError::InvalidDimension`] if `a` has fewer rows than columns.
    /// * [`LinalgError::NumericalNonConvergence`] if the cap is exceeded.
    pub fn with_config<T: Element>(
        a: &DenseMatrix<T>,
        config: &SolverConfig,
    ) -> Result<Self, LinalgError> {
        let [m, n] = a.shape();
        if m < n {
            return Err(LinalgError::invalid_dimension(
                "singular value decomposition",
                "rows must be greater than or equal to columns",
                [m, n],
            ));
        }
        log::debug!("svd: decomposing {m}x{n} matrix");

        let mut a = a.to_f64();
        let mut s = vec![0.0f64; n];
        let mut u = matrix_from_parts(m, n, vec![0.0; m * n]);
        let mut v = matrix_from_parts(n, n, vec![0.0; n * n]);
        let mut e = vec![0.0f64; n];
        let mut work = vec![0.0; m];

        // reduce A to bidiagonal form, storing the diagonal in s and the
        // super-diagonal in e
        let nct = (m - 1).min(n);
        let nrt = n.saturating_sub(2).min(m);
        for k in 0..nct.max(nrt) {
            if k < nct {
                // 2-norm of the k-th column without under/overflow
                s[k] = 0.0;
                for i in k..m {
                    s[k] = s[k].hypot(a[(i, k)]);
                }
                if s[k] != 0.0 {
                    if a[(k, k)] < 0.0 {
                        s[k] = -s[k];
                    }
                    for i in k..m {
                        a[(i, k)] /= s[k];
                    }
                    a[(k, k)] += 1.0;
                }
                s[k] = -s[k];
            }
            for j in (k + 1)..n {
                if k < nct && s[k] != 0.0 {
                    // apply the transformation
                    let mut t = 0.0;
                    for i in k..m {
                        t += a[(i, k)] * a[(i, j)];
                    }
                    t = -t / a[(k, k)];
                    for i in k..m {
                        a[(i, j)] += t * a[(i, k)];
                    }
                }
                // row k of A to be used for the next row transformation
                e[j] = a[(k, j)];
            }
            if k < nct {
                for i in k..m {
                    u[(i, k)] = a[(i, k)];
                }
            }
            if k < nrt {
                e[k] = 0.0;
                for i in (k + 1)..n {
                    e[k] = e[k].hypot(e[i]);
                }
                if e[k] != 0.0 {
                    if e[k + 1] < 0.0 {
                        e[k] = -e[k];
                    }
                    let ek = e[k];
                    for ei in e[(k + 1)..].iter_mut() {
                        *ei /= ek;
                    }
                    e[k + 1] += 1.0;
                }
                e[k] = -e[k];
                if k + 1 < m && e[k] != 0.0 {
                    // apply the transformation
                    for wi in work[(k + 1)..].iter_mut() {
                        *wi = 0.0;
                    }
                    for j in (k + 1)..n {
                        for i in (k + 1)..m {
                            work[i] += e[j] * a[(i, j)];
                        }
                    }
                    for j in (k + 1)..n {
                        let t = -e[j] / e[k + 1];
                        for i in (k + 1)..m {
                            a[(i, j)] += t * work[i];
                        }
                    }
                }
                for i in (k + 1)..n {
                    v[(i, k)] = e[i];
                }
            }
        }

        // final bidiagonal matrix of order p
        let mut p = n;
        if nct < n {
            s[nct] = a[(nct, nct)];
        }
        if nrt + 1 < p {
            e[nrt] = a[(nrt, p - 1)];
        }
        e[p - 1] = 0.0;

        // generate U
        for j in nct..n {
            for i in 0..m {
                u[(i, j)] = 0.0;
            }
            u[(j, j)] = 1.0;
        }
        for k in (0..nct).rev() {
            if s[k] != 0.0 {
                for j in (k + 1)..n {
                    let mut t = 0.0;
                    for i in k..m {
                        t += u[(i, k)] * u[(i, j)];
                    }
                    t = -t / u[(k, k)];
                    for i in k..m {
                        u[(i, j)] += t * u[(i, k)];
                    }
                }
                for i in k..m {
                    u[(i, k)] = -u[(i, k)];
                }
                u[(k, k)] += 1.0;
                for i in 0..k {
                    u[(i, k)] = 0.0;
                }
            } else {
                for i in 0..m {
                    u[(i, k)] = 0.0;
                }
                u[(k, k)] = 1.0;
            }
        }

        // generate V
        for k in (0..n).rev() {
            if k < nrt && e[k] != 0.0 {
                for j in (k + 1)..n {
                    let mut t = 0.0;
                    for i in (k + 1)..n {
                        t += v[(i, k)] * v[(i, j)];
                    }
                    t = -t / v[(k + 1, k)];
                    for i in (k + 1)..n {
                        v[(i, j)] += t * v[(i, k)];
                    }
                }
            }
            for i in 0..n {
                v[(i, k)] = 0.0;
            }
            v[(k, k)] = 1.0;
        }

        // main iteration loop for the singular values
        let pp = p - 1;
        let mut iter = 0;
        while p > 0 {
            // Inspect the bidiagonal for negligible elements:
            //   case 1: s[p-1] and e[k-1] are negligible, k < p
            //   case 2: s[k-1] is negligible, k < p
            //   case 3: e[k-1] is negligible, k < p, QR step
            //   case 4: e[p-2] is negligible, convergence
            let mut k = p as isize - 2;
            while k >= 0 {
                let ku = k as usize;
                if e[ku].abs() <= TINY + EPSILON * (s[ku].abs() + s[ku + 1].abs()) {
                    e[ku] = 0.0;
                    break;
                }
                k -= 1;
            }

            let case;
            if k == p as isize - 2 {
                case = 4;
            } else {
                let mut ks = p as isize - 1;
                while ks > k {
                    let ksu = ks as usize;
                    let t = (if ks != p as isize { e[ksu].abs() } else { 0.0 })
                        + (if ks != k + 1 { e[ksu - 1].abs() } else { 0.0 });
                    if s[ksu].abs() <= TINY + EPSILON * t {
                        s[ksu] = 0.0;
                        break;
                    }
                    ks -= 1;
                }
                if ks == k {
                    case = 3;
                } else if ks == p as isize - 1 {
                    case = 1;
                } else {
                    case = 2;
                    k = ks;
                }
            }
            let k = (k + 1) as usize;

            match case {
                // deflate negligible s[p-1]
                1 => {
                    let mut f = e[p - 2];
                    e[p - 2] = 0.0;
                    for j in (k..=(p - 2)).rev() {
                        let t = s[j].hypot(f);
                        let cs = s[j] / t;
                        let sn = f / t;
                        s[j] = t;
                        if j != k {
                            f = -sn * e[j - 1];
                            e[j - 1] *= cs;
                        }
                        rotate_columns(&mut v, j, p - 1, cs, sn);
                    }
                }
                // split at negligible s[k-1]
                2 => {
                    let mut f = e[k - 1];
                    e[k - 1] = 0.0;
                    for j in k..p {
                        let t = s[j].hypot(f);
                        let cs = s[j] / t;
                        let sn = f / t;
                        s[j] = t;
                        f = -sn * e[j];
                        e[j] *= cs;
                        rotate_columns(&mut u, j, k - 1, cs, sn);
                    }
                }
                // one QR step
                3 => {
                    iter += 1;
                    if iter > config.max_svd_iterations {
                        log::warn!("svd: Golub-Kahan iteration stalled at index {}", p - 1);
                        return Err(LinalgError::NumericalNonConvergence {
                            algorithm: "Golub-Kahan SVD iteration",
                            iterations: config.max_svd_iterations,
                        });
                    }

                    // calculate the shift
                    let scale = s[p - 1]
                        .abs()
                        .max(s[p - 2].abs())
                        .max(e[p - 2].abs())
                        .max(s[k].abs())
                        .max(e[k].abs());
                    let sp = s[p - 1] / scale;
                    let spm1 = s[p - 2] / scale;
                    let epm1 = e[p - 2] / scale;
                    let sk = s[k] / scale;
                    let ek = e[k] / scale;
                    let b = ((spm1 + sp) * (spm1 - sp) + epm1 * epm1) / 2.0;
                    let c = (sp * epm1) * (sp * epm1);
                    let mut shift = 0.0;
                    if b != 0.0 || c != 0.0 {
                        shift = (b * b + c).sqrt();
                        if b < 0.0 {
                            shift = -shift;
                        }
                        shift = c / (b + shift);
                    }
                    let mut f = (sk + sp) * (sk - sp) + shift;
                    let mut g = sk * ek;

                    // chase zeros
                    for j in k..(p - 1) {
                        let mut t = f.hypot(g);
                        let mut cs = f / t;
                        let mut sn = g / t;
                        if j != k {
                            e[j - 1] = t;
                        }
                        f = cs * s[j] + sn * e[j];
                        e[j] = cs * e[j] - sn * s[j];
                        g = sn * s[j + 1];
                        s[j + 1] *= cs;
                        rotate_columns(&mut v, j, j + 1, cs, sn);

                        t = f.hypot(g);
                        cs = f / t;
                        sn = g / t;
                        s[j] = t;
                        f = cs * e[j] + sn * s[j + 1];
                        s[j + 1] = -sn * e[j] + cs * s[j + 1];
                        g = sn * e[j + 1];
                        e[j + 1] *= cs;
                        if j < m - 1 {
                            rotate_columns(&mut u, j, j + 1, cs, sn);
                        }
                    }
                    e[p - 2] = f;
                }
                // convergence
                _ => {
                    let mut k = k;
                    // make the singular value non-negative
                    if s[k] <= 0.0 {
                        s[k] = if s[k] < 0.0 { -s[k] } else { 0.0 };
                        for i in 0..=pp {
                            v[(i, k)] = -v[(i, k)];
                        }
                    }
                    // order the singular values
                    while k < pp {
                        if s[k] >= s[k + 1] {
                            break;
                        }
                        s.swap(k, k + 1);
                        swap_columns(&mut v, k, k + 1);
                        if k < m - 1 {
                            swap_columns(&mut u, k, k + 1);
                        }
                        k += 1;
                    }
                    iter = 0;
                    p -= 1;
                }
            }
        }

        Ok(Self { u, v, s, m, n })
    }

    /// The left singular vectors `U` (`m x n`).
    pub fn u(&self) -> DenseMatrix<f64> {
        self.u.clone()
    }

    /// The right singular vectors `V` (`n x n`).
    pub fn v(&self) -> DenseMatrix<f64> {
        self.v.clone()
    }

    /// The diagonal matrix of singular values `S` (`n x n`).
    pub fn s(&self) -> DenseMatrix<f64> {
        matrix_from_fn(self.n, self.n, |i, j| if i == j { self.s[i] } else { 0.0 })
    }

    /// Singular values, non-negative and in descending order.
    pub fn singular_values(&self) -> &[f64] {
        &self.s
    }

    /// Two norm, the largest singular value.
    pub fn norm2(&self) -> f64 {
        self.s[0]
    }

    /// Two norm condition number `max(S) / min(S)`.
    ///
    /// Infinite for a rank deficient matrix.
    pub fn cond(&self) -> f64 {
        self.s[0] / self.s[self.n - 1]
    }

    /// Effective numerical rank.
    ///
    /// Counts the singular values above `max(m, n) * s[0] * EPSILON`.
    pub fn rank(&self) -> usize {
        let tol = self.m.max(self.n) as f64 * self.s[0] * EPSILON;
        self.s.iter().filter(|&&x| x > tol).count()
    }
}

/// Plane rotation of columns `j` and `k`:
/// `col_j <- cs * col_j + sn * col_k`, `col_k <- -sn * col_j + cs * col_k`.
fn rotate_columns(x: &mut DenseMatrix<f64>, j: usize, k: usize, cs: f64, sn: f64) {
    for i in 0..x.rows() {
        let t = cs * x[(i, j)] + sn * x[(i, k)];
        x[(i, k)] = -sn * x[(i, j)] + cs * x[(i, k)];
        x[(i, j)] = t;
    }
}

fn swap_columns(x: &mut DenseMatrix<f64>, j: usize, k: usize) {
    for i in 0..x.rows() {
        let t = x[(i, j)];
        x[(i, j)] = x[(i, k)];
        x[(i, k)] = t;
    }
}
