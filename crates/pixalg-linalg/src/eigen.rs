//! Eigenvalue decomposition of square matrices.
//!
//! A symmetric `A` is reduced to tridiagonal form with Householder
//! transformations and diagonalised with the implicit QL iteration, giving
//! `A = V * D * V^T` with `V` orthogonal and real eigenvalues in ascending
//! order.
//!
//! Any other `A` is reduced to upper Hessenberg form and then to real Schur
//! form with the shifted Francis QR iteration. Eigenvalues may be complex; a
//! conjugate pair `a ± ib` appears in `D` as the 2x2 block `[a, b; -b, a]`,
//! and the columns of `V` satisfy `A * V = V * D`. `V` may be badly
//! conditioned or even singular.

use pixalg_matrix::{DenseMatrix, Element};

use crate::error::LinalgError;
use crate::tolerance::{SolverConfig, EPSILON};
use crate::utils::{identity, matrix_from_parts};

/// Result of an eigenvalue decomposition.
#[derive(Debug, Clone)]
pub struct EigenDecomposition {
    n: usize,
    is_symmetric: bool,
    /// Real parts of the eigenvalues.
    d: Vec<f64>,
    /// Imaginary parts of the eigenvalues.
    e: Vec<f64>,
    v: DenseMatrix<f64>,
}

impl EigenDecomposition {
    /// Decompose `a` with the default [`SolverConfig`].
    ///
    /// # Errors
    ///
    /// See [`EigenDecomposition::with_config`].
    ///
    /// # Examples
    ///
    /// ```
    /// use pixalg_matrix::DenseMatrix;
    /// use pixalg_linalg::eigen::EigenDecomposition;
    ///
    /// let a = DenseMatrix::from_rows(&[[0.0, 1.0], [1.0, 0.0]]).unwrap();
    /// let eig = EigenDecomposition::new(&a).unwrap();
    /// let values = eig.real_eigenvalues();
    /// assert!((values[0] + 1.0).abs() < 1e-12);
    /// assert!((values[1] - 1.0).abs() < 1e-12);
    /// ```
    pub fn new<T: Element>(a: &DenseMatrix<T>) -> Result<Self, LinalgError> {
        Self::with_config(a, &SolverConfig::default())
    }

    /// Decompose `a`, dispatching on symmetry within `config`'s tolerance.
    ///
    /// # Errors
    ///
    /// * [`LinalgError::InvalidDimension`] if `a` is not square.
    /// * [`LinalgError::NumericalNonConvergence`] if a deflation step needs more
    ///   iterations than `config` allows.
    pub fn with_config<T: Element>(
        a: &DenseMatrix<T>,
        config: &SolverConfig,
    ) -> Result<Self, LinalgError> {
        let [rows, cols] = a.shape();
        if rows != cols {
            return Err(LinalgError::invalid_dimension(
                "eigenvalue decomposition",
                "matrix must be square",
                [rows, cols],
            ));
        }
        let n = rows;
        let a = a.to_f64();
        let is_symmetric = a.is_symmetric(config.symmetry_tolerance_for(&a));
        log::debug!("eigen: decomposing {n}x{n} matrix, symmetric: {is_symmetric}");

        let mut d = vec![0.0; n];
        let mut e = vec![0.0; n];

        let v = if is_symmetric {
            // average out asymmetry that the tolerance let through
            let mut v = matrix_from_parts(n, n, vec![0.0; n * n]);
            for i in 0..n {
                for j in 0..n {
                    v[(i, j)] = 0.5 * (a[(i, j)] + a[(j, i)]);
                }
            }
            tridiagonalize(&mut v, &mut d, &mut e);
            tridiagonal_ql(&mut v, &mut d, &mut e, config.max_eigen_iterations)?;
            sort_ascending(&mut v, &mut d);
            v
        } else {
            let mut h = a;
            let mut v = identity(n);
            hessenberg(&mut h, &mut v);
            schur(&mut h, &mut v, &mut d, &mut e, config.max_schur_iterations)?;
            v
        };

        Ok(Self {
            n,
            is_symmetric,
            d,
            e,
            v,
        })
    }

    /// Whether the symmetric path was taken.
    pub fn is_symmetric(&self) -> bool {
        self.is_symmetric
    }

    /// The eigenvector matrix `V`.
    pub fn v(&self) -> DenseMatrix<f64> {
        self.v.clone()
    }

    /// Real parts of the eigenvalues.
    pub fn real_eigenvalues(&self) -> &[f64] {
        &self.d
    }

    /// Imaginary parts of the eigenvalues; all zero on the symmetric path.
    pub fn imag_eigenvalues(&self) -> &[f64] {
        &self.e
    }

    /// The block diagonal eigenvalue matrix `D`.
    ///
    /// Real eigenvalues sit on the diagonal; a complex pair `a ± ib` occupies
    /// the block `[a, b; -b, a]`.
    pub fn d(&self) -> DenseMatrix<f64> {
        let n = self.n;
        let mut d = matrix_from_parts(n, n, vec![0.0; n * n]);
        for i in 0..n {
            d[(i, i)] = self.d[i];
            if self.e[i] > 0.0 {
                d[(i, i + 1)] = self.e[i];
            } else if self.e[i] < 0.0 {
                d[(i, i - 1)] = self.e[i];
            }
        }
        d
    }
}

/// Householder reduction of a symmetric matrix to tridiagonal form.
///
/// On entry `v` holds the matrix, on exit the accumulated transformation.
/// `d` receives the diagonal and `e[1..]` the subdiagonal.
fn tridiagonalize(v: &mut DenseMatrix<f64>, d: &mut [f64], e: &mut [f64]) {
    let n = d.len();
    for j in 0..n {
        d[j] = v[(n - 1, j)];
    }

    for i in (1..n).rev() {
        // scale to avoid under/overflow
        let scale: f64 = d[..i].iter().map(|x| x.abs()).sum();
        let mut h = 0.0;

        if scale == 0.0 {
            e[i] = d[i - 1];
            for j in 0..i {
                d[j] = v[(i - 1, j)];
                v[(i, j)] = 0.0;
                v[(j, i)] = 0.0;
            }
        } else {
            // generate the Householder vector
            for k in 0..i {
                d[k] /= scale;
                h += d[k] * d[k];
            }
            let mut f = d[i - 1];
            let mut g = h.sqrt();
            if f > 0.0 {
                g = -g;
            }
            e[i] = scale * g;
            h -= f * g;
            d[i - 1] = f - g;
            for ej in e[..i].iter_mut() {
                *ej = 0.0;
            }

            // apply the similarity transformation to the remaining columns
            for j in 0..i {
                f = d[j];
                v[(j, i)] = f;
                g = e[j] + v[(j, j)] * f;
                for k in (j + 1)..i {
                    g += v[(k, j)] * d[k];
                    e[k] += v[(k, j)] * f;
                }
                e[j] = g;
            }
            f = 0.0;
            for j in 0..i {
                e[j] /= h;
                f += e[j] * d[j];
            }
            let hh = f / (h + h);
            for j in 0..i {
                e[j] -= hh * d[j];
            }
            for j in 0..i {
                f = d[j];
                g = e[j];
                for k in j..i {
                    v[(k, j)] -= f * e[k] + g * d[k];
                }
                d[j] = v[(i - 1, j)];
                v[(i, j)] = 0.0;
            }
        }
        d[i] = h;
    }

    // accumulate transformations
    for i in 0..n.saturating_sub(1) {
        v[(n - 1, i)] = v[(i, i)];
        v[(i, i)] = 1.0;
        let h = d[i + 1];
        if h != 0.0 {
            for k in 0..=i {
                d[k] = v[(k, i + 1)] / h;
            }
            for j in 0..=i {
                let mut g = 0.0;
                for k in 0..=i {
                    g += v[(k, i + 1)] * v[(k, j)];
                }
                for k in 0..=i {
                    v[(k, j)] -= g * d[k];
                }
            }
        }
        for k in 0..=i {
            v[(k, i + 1)] = 0.0;
        }
    }
    for j in 0..n {
        d[j] = v[(n - 1, j)];
        v[(n - 1, j)] = 0.0;
    }
    v[(n - 1, n - 1)] = 1.0;
    e[0] = 0.0;
}

/// Implicit QL iteration on a symmetric tridiagonal matrix.
fn tridiagonal_ql(
    v: &mut DenseMatrix<f64>,
    d: &mut [f64],
    e: &mut [f64],
    max_iterations: usize,
) -> Result<(), LinalgError> {
    let n = d.len();
    for i in 1..n {
        e[i - 1] = e[i];
    }
    e[n - 1] = 0.0;

    let mut f = 0.0;
    let mut tst1 = 0.0f64;
    for l in 0..n {
        // find a small subdiagonal element
        tst1 = tst1.max(d[l].abs() + e[l].abs());
        let mut m = l;
        while m < n - 1 && e[m].abs() > EPSILON * tst1 {
            m += 1;
        }

        // when m == l, d[l] is already an eigenvalue
        if m > l {
            let mut iter = 0;
            loop {
                iter += 1;
                if iter > max_iterations {
                    log::warn!("eigen: QL iteration stalled at index {l}");
                    return Err(LinalgError::NumericalNonConvergence {
                        algorithm: "symmetric QL iteration",
                        iterations: max_iterations,
                    });
                }

                // compute the implicit shift
                let mut g = d[l];
                let mut p = (d[l + 1] - g) / (2.0 * e[l]);
                let mut r = p.hypot(1.0);
                if p < 0.0 {
                    r = -r;
                }
                d[l] = e[l] / (p + r);
                d[l + 1] = e[l] * (p + r);
                let dl1 = d[l + 1];
                let mut h = g - d[l];
                for di in d[(l + 2)..].iter_mut() {
                    *di -= h;
                }
                f += h;

                // implicit QL transformation
                p = d[m];
                let mut c = 1.0;
                let mut c2 = c;
                let mut c3 = c;
                let el1 = e[l + 1];
                let mut s = 0.0;
                let mut s2 = 0.0;
                for i in (l..m).rev() {
                    c3 = c2;
                    c2 = c;
                    s2 = s;
                    g = c * e[i];
                    h = c * p;
                    r = p.hypot(e[i]);
                    e[i + 1] = s * r;
                    s = e[i] / r;
                    c = p / r;
                    p = c * d[i] - s * g;
                    d[i + 1] = h + s * (c * g + s * d[i]);

                    for k in 0..n {
                        h = v[(k, i + 1)];
                        v[(k, i + 1)] = s * v[(k, i)] + c * h;
                        v[(k, i)] = c * v[(k, i)] - s * h;
                    }
                }
                p = -s * s2 * c3 * el1 * e[l] / dl1;
                e[l] = s * p;
                d[l] = c * p;

                if !(e[l].abs() > EPSILON * tst1) {
                    break;
                }
            }
        }
        d[l] += f;
        e[l] = 0.0;
    }
    Ok(())
}

/// Sort eigenvalues ascending, permuting the columns of `v` along.
fn sort_ascending(v: &mut DenseMatrix<f64>, d: &mut [f64]) {
    let n = d.len();
    for i in 0..n.saturating_sub(1) {
        let mut k = i;
        let mut p = d[i];
        for (j, &dj) in d.iter().enumerate().skip(i + 1) {
            if dj < p {
                k = j;
                p = dj;
            }
        }
        if k != i {
            d[k] = d[i];
            d[i] = p;
            for j in 0..n {
                let tmp = v[(j, i)];
                v[(j, i)] = v[(j, k)];
                v[(j, k)] = tmp;
            }
        }
    }
}

/// Orthogonal reduction to upper Hessenberg form.
///
/// On exit `h` is Hessenberg and `v` holds the accumulated transformation.
/// `v` must be the identity on entry.
fn hessenberg(h: &mut DenseMatrix<f64>, v: &mut DenseMatrix<f64>) {
    let n = h.rows();
    let high = n - 1;
    let mut ort = vec![0.0; n];

    for m in 1..high {
        let scale: f64 = (m..=high).map(|i| h[(i, m - 1)].abs()).sum();
        if scale == 0.0 {
            continue;
        }

        // compute the Householder transformation
        let mut hh = 0.0;
        for i in (m..=high).rev() {
            ort[i] = h[(i, m - 1)] / scale;
            hh += ort[i] * ort[i];
        }
        let mut g = hh.sqrt();
        if ort[m] > 0.0 {
            g = -g;
        }
        hh -= ort[m] * g;
        ort[m] -= g;

        // apply H * A * H
        for j in m..n {
            let mut f = 0.0;
            for i in (m..=high).rev() {
                f += ort[i] * h[(i, j)];
            }
            f /= hh;
            for i in m..=high {
                h[(i, j)] -= f * ort[i];
            }
        }
        for i in 0..=high {
            let mut f = 0.0;
            for j in (m..=high).rev() {
                f += ort[j] * h[(i, j)];
            }
            f /= hh;
            for j in m..=high {
                h[(i, j)] -= f * ort[j];
            }
        }
        ort[m] *= scale;
        h[(m, m - 1)] = scale * g;
    }

    // accumulate transformations
    for m in (1..high).rev() {
        if h[(m, m - 1)] == 0.0 {
            continue;
        }
        for i in (m + 1)..=high {
            ort[i] = h[(i, m - 1)];
        }
        for j in m..=high {
            let mut g = 0.0;
            for i in m..=high {
                g += ort[i] * v[(i, j)];
            }
            // double division avoids possible underflow
            g = (g / ort[m]) / h[(m, m - 1)];
            for i in m..=high {
                v[(i, j)] += g * ort[i];
            }
        }
    }
}

/// Complex scalar division `(xr + i*xi) / (yr + i*yi)`.
fn cdiv(xr: f64, xi: f64, yr: f64, yi: f64) -> (f64, f64) {
    if yr.abs() > yi.abs() {
        let r = yi / yr;
        let d = yr + r * yi;
        ((xr + r * xi) / d, (xi - r * xr) / d)
    } else {
        let r = yr / yi;
        let d = yi + r * yr;
        ((r * xr + xi) / d, (r * xi - xr) / d)
    }
}

/// Reduction from Hessenberg to real Schur form, followed by back
/// substitution for the eigenvectors.
///
/// `h` is destroyed; `v` holds the Hessenberg transformation on entry and the
/// eigenvectors on exit.
#[allow(clippy::many_single_char_names, unused_assignments)]
fn schur(
    h: &mut DenseMatrix<f64>,
    v: &mut DenseMatrix<f64>,
    d: &mut [f64],
    e: &mut [f64],
    max_iterations: usize,
) -> Result<(), LinalgError> {
    let nn = d.len();
    let high = nn - 1;
    let mut exshift = 0.0;
    let (mut p, mut q, mut r, mut s, mut z) = (0.0f64, 0.0f64, 0.0f64, 0.0f64, 0.0f64);
    let (mut t, mut w, mut x, mut y) = (0.0f64, 0.0f64, 0.0f64, 0.0f64);

    // matrix norm for the small subdiagonal test and back substitution
    let mut norm = 0.0;
    for i in 0..nn {
        for j in i.saturating_sub(1)..nn {
            norm += h[(i, j)].abs();
        }
    }

    // outer loop over eigenvalue index, n counts down to zero
    let mut n = high;
    let mut iter = 0;
    loop {
        // look for a single small subdiagonal element
        let mut l = n;
        while l > 0 {
            s = h[(l - 1, l - 1)].abs() + h[(l, l)].abs();
            if s == 0.0 {
                s = norm;
            }
            if h[(l, l - 1)].abs() < EPSILON * s {
                break;
            }
            l -= 1;
        }

        if l == n {
            // one root found
            h[(n, n)] += exshift;
            d[n] = h[(n, n)];
            e[n] = 0.0;
            iter = 0;
            if n == 0 {
                break;
            }
            n -= 1;
        } else if l == n - 1 {
            // two roots found
            w = h[(n, n - 1)] * h[(n - 1, n)];
            p = (h[(n - 1, n - 1)] - h[(n, n)]) / 2.0;
            q = p * p + w;
            z = q.abs().sqrt();
            h[(n, n)] += exshift;
            h[(n - 1, n - 1)] += exshift;
            x = h[(n, n)];

            if q >= 0.0 {
                // real pair
                z = if p >= 0.0 { p + z } else { p - z };
                d[n - 1] = x + z;
                d[n] = d[n - 1];
                if z != 0.0 {
                    d[n] = x - w / z;
                }
                e[n - 1] = 0.0;
                e[n] = 0.0;
                x = h[(n, n - 1)];
                s = x.abs() + z.abs();
                p = x / s;
                q = z / s;
                r = (p * p + q * q).sqrt();
                p /= r;
                q /= r;

                // row modification
                for j in (n - 1)..nn {
                    z = h[(n - 1, j)];
                    h[(n - 1, j)] = q * z + p * h[(n, j)];
                    h[(n, j)] = q * h[(n, j)] - p * z;
                }
                // column modification
                for i in 0..=n {
                    z = h[(i, n - 1)];
                    h[(i, n - 1)] = q * z + p * h[(i, n)];
                    h[(i, n)] = q * h[(i, n)] - p * z;
                }
                // accumulate transformations
                for i in 0..=high {
                    z = v[(i, n - 1)];
                    v[(i, n - 1)] = q * z + p * v[(i, n)];
                    v[(i, n)] = q * v[(i, n)] - p * z;
                }
            } else {
                // complex pair
                d[n - 1] = x + p;
                d[n] = x + p;
                e[n - 1] = z;
                e[n] = -z;
            }
            iter = 0;
            if n == 1 {
                break;
            }
            n -= 2;
        } else {
            // no convergence yet, form the shift
            x = h[(n, n)];
            y = h[(n - 1, n - 1)];
            w = h[(n, n - 1)] * h[(n - 1, n)];

            // exceptional shifts
            if iter == 10 {
                exshift += x;
                for i in 0..=n {
                    h[(i, i)] -= x;
                }
                s = h[(n, n - 1)].abs() + h[(n - 1, n - 2)].abs();
                x = 0.75 * s;
                y = x;
                w = -0.4375 * s * s;
            }
            if iter == 30 {
                s = (y - x) / 2.0;
                s = s * s + w;
                if s > 0.0 {
                    s = s.sqrt();
                    if y < x {
                        s = -s;
                    }
                    s = x - w / ((y - x) / 2.0 + s);
                    for i in 0..=n {
                        h[(i, i)] -= s;
                    }
                    exshift += s;
                    x = 0.964;
                    y = x;
                    w = x;
                }
            }

            iter += 1;
            if iter > max_iterations {
                log::warn!("eigen: Francis iteration stalled at index {n}");
                return Err(LinalgError::NumericalNonConvergence {
                    algorithm: "Francis QR iteration",
                    iterations: max_iterations,
                });
            }

            // look for two consecutive small subdiagonal elements
            let mut m = n - 2;
            loop {
                z = h[(m, m)];
                r = x - z;
                s = y - z;
                p = (r * s - w) / h[(m + 1, m)] + h[(m, m + 1)];
                q = h[(m + 1, m + 1)] - z - r - s;
                r = h[(m + 2, m + 1)];
                s = p.abs() + q.abs() + r.abs();
                p /= s;
                q /= s;
                r /= s;
                if m == l {
                    break;
                }
                if h[(m, m - 1)].abs() * (q.abs() + r.abs())
                    < EPSILON
                        * (p.abs()
                            * (h[(m - 1, m - 1)].abs() + z.abs() + h[(m + 1, m + 1)].abs()))
                {
                    break;
                }
                m -= 1;
            }

            for i in (m + 2)..=n {
                h[(i, i - 2)] = 0.0;
                if i > m + 2 {
                    h[(i, i - 3)] = 0.0;
                }
            }

            // double QR step on rows l..=n and columns m..=n
            for k in m..n {
                let notlast = k != n - 1;
                if k != m {
                    p = h[(k, k - 1)];
                    q = h[(k + 1, k - 1)];
                    r = if notlast { h[(k + 2, k - 1)] } else { 0.0 };
                    x = p.abs() + q.abs() + r.abs();
                    if x == 0.0 {
                        continue;
                    }
                    p /= x;
                    q /= x;
                    r /= x;
                }

                s = (p * p + q * q + r * r).sqrt();
                if p < 0.0 {
                    s = -s;
                }
                if s == 0.0 {
                    continue;
                }
                if k != m {
                    h[(k, k - 1)] = -s * x;
                } else if l != m {
                    h[(k, k - 1)] = -h[(k, k - 1)];
                }
                p += s;
                x = p / s;
                y = q / s;
                z = r / s;
                q /= p;
                r /= p;

                // row modification
                for j in k..nn {
                    p = h[(k, j)] + q * h[(k + 1, j)];
                    if notlast {
                        p += r * h[(k + 2, j)];
                        h[(k + 2, j)] -= p * z;
                    }
                    h[(k, j)] -= p * x;
                    h[(k + 1, j)] -= p * y;
                }

                // column modification
                for i in 0..=n.min(k + 3) {
                    p = x * h[(i, k)] + y * h[(i, k + 1)];
                    if notlast {
                        p += z * h[(i, k + 2)];
                        h[(i, k + 2)] -= p * r;
                    }
                    h[(i, k)] -= p;
                    h[(i, k + 1)] -= p * q;
                }

                // accumulate transformations
                for i in 0..=high {
                    p = x * v[(i, k)] + y * v[(i, k + 1)];
                    if notlast {
                        p += z * v[(i, k + 2)];
                        v[(i, k + 2)] -= p * r;
                    }
                    v[(i, k)] -= p;
                    v[(i, k + 1)] -= p * q;
                }
            }
        }
    }

    // back substitute to find vectors of the upper triangular form
    if norm == 0.0 {
        return Ok(());
    }

    for n in (0..nn).rev() {
        p = d[n];
        q = e[n];

        if q == 0.0 {
            // real vector
            let mut l = n;
            h[(n, n)] = 1.0;
            for i in (0..n).rev() {
                w = h[(i, i)] - p;
                r = 0.0;
                for j in l..=n {
                    r += h[(i, j)] * h[(j, n)];
                }
                if e[i] < 0.0 {
                    z = w;
                    s = r;
                    continue;
                }
                l = i;
                if e[i] == 0.0 {
                    h[(i, n)] = if w != 0.0 { -r / w } else { -r / (EPSILON * norm) };
                } else {
                    // solve the real 2x2 system
                    x = h[(i, i + 1)];
                    y = h[(i + 1, i)];
                    q = (d[i] - p) * (d[i] - p) + e[i] * e[i];
                    t = (x * s - z * r) / q;
                    h[(i, n)] = t;
                    h[(i + 1, n)] = if x.abs() > z.abs() {
                        (-r - w * t) / x
                    } else {
                        (-s - y * t) / z
                    };
                }

                // overflow control
                t = h[(i, n)].abs();
                if (EPSILON * t) * t > 1.0 {
                    for j in i..=n {
                        h[(j, n)] /= t;
                    }
                }
            }
        } else if q < 0.0 {
            // complex vector, last component chosen imaginary so that the
            // eigenvector matrix is triangular
            let mut l = n - 1;
            if h[(n, n - 1)].abs() > h[(n - 1, n)].abs() {
                h[(n - 1, n - 1)] = q / h[(n, n - 1)];
                h[(n - 1, n)] = -(h[(n, n)] - p) / h[(n, n - 1)];
            } else {
                let (cr, ci) = cdiv(0.0, -h[(n - 1, n)], h[(n - 1, n - 1)] - p, q);
                h[(n - 1, n - 1)] = cr;
                h[(n - 1, n)] = ci;
            }
            h[(n, n - 1)] = 0.0;
            h[(n, n)] = 1.0;

            for i in (0..(n - 1)).rev() {
                let mut ra = 0.0;
                let mut sa = 0.0;
                for j in l..=n {
                    ra += h[(i, j)] * h[(j, n - 1)];
                    sa += h[(i, j)] * h[(j, n)];
                }
                w = h[(i, i)] - p;

                if e[i] < 0.0 {
                    z = w;
                    r = ra;
                    s = sa;
                    continue;
                }
                l = i;
                if e[i] == 0.0 {
                    let (cr, ci) = cdiv(-ra, -sa, w, q);
                    h[(i, n - 1)] = cr;
                    h[(i, n)] = ci;
                } else {
                    // solve the complex 2x2 system
                    x = h[(i, i + 1)];
                    y = h[(i + 1, i)];
                    let mut vr = (d[i] - p) * (d[i] - p) + e[i] * e[i] - q * q;
                    let vi = (d[i] - p) * 2.0 * q;
                    if vr == 0.0 && vi == 0.0 {
                        vr = EPSILON * norm * (w.abs() + q.abs() + x.abs() + y.abs() + z.abs());
                    }
                    let (cr, ci) = cdiv(
                        x * r - z * ra + q * sa,
                        x * s - z * sa - q * ra,
                        vr,
                        vi,
                    );
                    h[(i, n - 1)] = cr;
                    h[(i, n)] = ci;
                    if x.abs() > z.abs() + q.abs() {
                        h[(i + 1, n - 1)] = (-ra - w * h[(i, n - 1)] + q * h[(i, n)]) / x;
                        h[(i + 1, n)] = (-sa - w * h[(i, n)] - q * h[(i, n - 1)]) / x;
                    } else {
                        let (cr, ci) = cdiv(-r - y * h[(i, n - 1)], -s - y * h[(i, n)], z, q);
                        h[(i + 1, n - 1)] = cr;
                        h[(i + 1, n)] = ci;
                    }
                }

                // overflow control
                t = h[(i, n - 1)].abs().max(h[(i, n)].abs());
                if (EPSILON * t) * t > 1.0 {
                    for j in i..=n {
                        h[(j, n - 1)] /= t;
                        h[(j, n)] /= t;
                    }
                }
            }
        }
    }

    // back transformation to get the eigenvectors of the original matrix
    for j in (0..nn).rev() {
        for i in 0..=high {
            z = 0.0;
            for k in 0..=j.min(high) {
                z += v[(i, k)] * h[(k, j)];
            }
            v[(i, j)] = z;
        }
    }
    Ok(())
}
