//! Library-level linear algebra operations.
//!
//! These functions validate their inputs up front and pick the decomposition
//! that fits the shape of the problem. Unlike the `solve` methods of the
//! factor types, [`solve`] and [`inverse`] do not fail on singular or rank
//! deficient input: they log a warning and return the least squares / minimum
//! norm answer computed from the pseudo-inverse.

use pixalg_matrix::{DenseMatrix, Element};

use crate::cholesky::CholeskyDecomposition;
use crate::eigen::EigenDecomposition;
use crate::error::LinalgError;
use crate::lu::LuDecomposition;
use crate::qr::QrDecomposition;
use crate::svd::SvdDecomposition;
use crate::tolerance::singular_tolerance;
use crate::utils::matrix_from_fn;

fn ensure_square<T: Element>(
    operation: &'static str,
    a: &DenseMatrix<T>,
) -> Result<usize, LinalgError> {
    if !a.is_square() {
        return Err(LinalgError::invalid_dimension(
            operation,
            "matrix must be square",
            a.shape(),
        ));
    }
    Ok(a.rows())
}

/// SVD of `a`, or of its transpose when `a` has fewer rows than columns.
fn svd_any_shape<T: Element>(a: &DenseMatrix<T>) -> Result<SvdDecomposition, LinalgError> {
    if a.rows() < a.cols() {
        SvdDecomposition::new(&a.transpose())
    } else {
        SvdDecomposition::new(a)
    }
}

/// Determinant of a square matrix, computed from its LU decomposition.
///
/// # Errors
///
/// Returns [`LinalgError::InvalidDimension`] if `a` is not square.
///
/// # Examples
///
/// ```
/// use pixalg_matrix::DenseMatrix;
/// use pixalg_linalg::ops::determinant;
///
/// let a = DenseMatrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
/// assert!((determinant(&a).unwrap() + 2.0).abs() < 1e-12);
/// ```
pub fn determinant<T: Element>(a: &DenseMatrix<T>) -> Result<f64, LinalgError> {
    ensure_square("determinant", a)?;
    LuDecomposition::new(a).determinant()
}

/// Effective numerical rank, the number of singular values above
/// `max(m, n) * sigma_max * EPSILON`.
pub fn rank<T: Element>(a: &DenseMatrix<T>) -> Result<usize, LinalgError> {
    Ok(svd_any_shape(a)?.rank())
}

/// Sum of the diagonal of a square matrix.
///
/// # Errors
///
/// Returns [`LinalgError::InvalidDimension`] if `a` is not square.
pub fn trace<T: Element>(a: &DenseMatrix<T>) -> Result<f64, LinalgError> {
    ensure_square("trace", a)?;
    Ok(a.diagonal().into_iter().map(Element::to_double).sum())
}

/// Eigenvalue decomposition of a square matrix.
///
/// See [`EigenDecomposition::new`].
pub fn eigen_decomposition<T: Element>(
    a: &DenseMatrix<T>,
) -> Result<EigenDecomposition, LinalgError> {
    EigenDecomposition::new(a)
}

/// Singular value decomposition of a matrix with at least as many rows as columns.
///
/// See [`SvdDecomposition::new`].
pub fn svd<T: Element>(a: &DenseMatrix<T>) -> Result<SvdDecomposition, LinalgError> {
    SvdDecomposition::new(a)
}

/// LU decomposition with partial pivoting; never fails.
pub fn lu_decomposition<T: Element>(a: &DenseMatrix<T>) -> LuDecomposition {
    LuDecomposition::new(a)
}

/// Householder QR decomposition of a matrix with at least as many rows as columns.
pub fn qr_decomposition<T: Element>(a: &DenseMatrix<T>) -> Result<QrDecomposition, LinalgError> {
    QrDecomposition::new(a)
}

/// Cholesky decomposition of a square matrix.
///
/// The result carries a partial factor when `a` is not symmetric positive
/// definite; check [`CholeskyDecomposition::is_spd`].
pub fn cholesky_decomposition<T: Element>(
    a: &DenseMatrix<T>,
) -> Result<CholeskyDecomposition, LinalgError> {
    CholeskyDecomposition::new(a)
}

/// Solve `A * X = B`.
///
/// - square and nonsingular `A`: LU solution.
/// - more rows than columns and full rank: QR least squares solution.
/// - anything else: `pinv(A) * B`, the minimum norm least squares solution.
///   A warning is logged when this path is taken for a square or tall matrix.
///
/// # Errors
///
/// * [`LinalgError::DimensionMismatch`] if `B` does not have as many rows as `A`.
/// * [`LinalgError::NumericalNonConvergence`] if the fallback SVD does not converge.
///
/// # Examples
///
/// ```
/// use pixalg_matrix::DenseMatrix;
/// use pixalg_linalg::ops::solve;
///
/// let a = DenseMatrix::from_rows(&[[2.0, 0.0], [0.0, 4.0]]).unwrap();
/// let b = DenseMatrix::from_rows(&[[2.0], [2.0]]).unwrap();
/// let x = solve(&a, &b).unwrap();
/// assert_eq!(x.as_slice(), &[1.0, 0.5]);
/// ```
pub fn solve<T: Element>(
    a: &DenseMatrix<T>,
    b: &DenseMatrix<T>,
) -> Result<DenseMatrix<f64>, LinalgError> {
    let [m, n] = a.shape();
    if b.rows() != m {
        return Err(LinalgError::dimension_mismatch(
            "right-hand side must have as many rows as the matrix",
            [m, b.cols()],
            b.shape(),
        ));
    }
    log::debug!("solve: {m}x{n} system with {} right-hand sides", b.cols());

    if m == n {
        let lu = LuDecomposition::new(a);
        if lu.is_nonsingular() {
            return lu.solve(b);
        }
        log::warn!("solve: {m}x{n} matrix is singular, falling back to the pseudo-inverse");
    } else if m > n {
        let qr = QrDecomposition::new(a)?;
        if qr.is_full_rank() {
            return qr.solve(b);
        }
        log::warn!("solve: {m}x{n} matrix is rank deficient, falling back to the pseudo-inverse");
    }

    Ok(pseudo_inverse(a)?.matmul(&b.to_f64())?)
}

/// Solve `X * A = B`, i.e. `A^T * X^T = B^T`, with the same fallbacks as [`solve`].
///
/// # Errors
///
/// * [`LinalgError::DimensionMismatch`] if `B` does not have as many columns as `A`.
/// * [`LinalgError::NumericalNonConvergence`] if the fallback SVD does not converge.
pub fn solve_transpose<T: Element>(
    a: &DenseMatrix<T>,
    b: &DenseMatrix<T>,
) -> Result<DenseMatrix<f64>, LinalgError> {
    if b.cols() != a.cols() {
        return Err(LinalgError::dimension_mismatch(
            "right-hand side must have as many columns as the matrix",
            [b.rows(), a.cols()],
            b.shape(),
        ));
    }
    Ok(solve(&a.transpose(), &b.transpose())?.transpose())
}

/// Inverse of a square matrix.
///
/// A singular matrix gets its pseudo-inverse instead, with a warning logged.
///
/// # Errors
///
/// * [`LinalgError::InvalidDimension`] if `a` is not square.
/// * [`LinalgError::NumericalNonConvergence`] if the fallback SVD does not converge.
///
/// # Examples
///
/// ```
/// use pixalg_matrix::DenseMatrix;
/// use pixalg_linalg::ops::inverse;
///
/// let a = DenseMatrix::from_rows(&[[4.0, 7.0], [2.0, 6.0]]).unwrap();
/// let inv = inverse(&a).unwrap();
/// assert!((inv.get(0, 0).unwrap() - 0.6).abs() < 1e-12);
/// ```
pub fn inverse<T: Element>(a: &DenseMatrix<T>) -> Result<DenseMatrix<f64>, LinalgError> {
    let n = ensure_square("inverse", a)?;
    solve(a, &DenseMatrix::identity(n)?)
}

/// Moore-Penrose pseudo-inverse `V * S^+ * U^T` (`n x m` for an `m x n` input).
///
/// Singular values at or below `max(m, n) * sigma_max * EPSILON` are treated
/// as zero.
///
/// # Errors
///
/// Returns [`LinalgError::NumericalNonConvergence`] if the SVD does not converge.
pub fn pseudo_inverse<T: Element>(a: &DenseMatrix<T>) -> Result<DenseMatrix<f64>, LinalgError> {
    let [m, n] = a.shape();
    if m < n {
        return Ok(pseudo_inverse(&a.transpose())?.transpose());
    }

    let svd = SvdDecomposition::new(a)?;
    let sv = svd.singular_values();
    let tol = singular_tolerance(m, n, sv[0]);
    let inv_sv: Vec<f64> = sv
        .iter()
        .map(|&s| if s > tol { 1.0 / s } else { 0.0 })
        .collect();
    let u = svd.u();
    let v = svd.v();

    Ok(matrix_from_fn(n, m, |i, j| {
        inv_sv
            .iter()
            .enumerate()
            .map(|(k, &w)| v[(i, k)] * w * u[(j, k)])
            .sum()
    }))
}

/// Two norm condition number, `sigma_max / sigma_min`.
///
/// Infinite for a rank deficient matrix.
pub fn condition_number<T: Element>(a: &DenseMatrix<T>) -> Result<f64, LinalgError> {
    Ok(svd_any_shape(a)?.cond())
}

/// Two norm (largest singular value).
pub fn norm2<T: Element>(a: &DenseMatrix<T>) -> Result<f64, LinalgError> {
    Ok(svd_any_shape(a)?.norm2())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample() -> Result<DenseMatrix<f64>, LinalgError> {
        Ok(DenseMatrix::from_rows(&[
            [2.0, -1.0, 0.0],
            [-1.0, 2.0, -1.0],
            [0.0, -1.0, 2.0],
        ])?)
    }

    #[test]
    fn test_determinant_and_trace() -> Result<(), LinalgError> {
        let a = sample()?;
        assert_relative_eq!(determinant(&a)?, 4.0, epsilon = 1e-12);
        assert_relative_eq!(determinant(&a.transpose())?, 4.0, epsilon = 1e-12);
        assert_relative_eq!(trace(&a)?, 6.0);

        let scalar = DenseMatrix::new(1, 1, vec![-3.5f32])?;
        assert_relative_eq!(determinant(&scalar)?, -3.5);
        assert_relative_eq!(trace(&scalar)?, -3.5);

        let rect = DenseMatrix::<f64>::zeros(2, 3)?;
        assert!(matches!(determinant(&rect), Err(LinalgError::InvalidDimension { .. })));
        assert!(matches!(trace(&rect), Err(LinalgError::InvalidDimension { .. })));
        Ok(())
    }

    #[test]
    fn test_rank() -> Result<(), LinalgError> {
        assert_eq!(rank(&sample()?)?, 3);

        let wide = DenseMatrix::from_rows(&[[1.0, 2.0, 3.0], [2.0, 4.0, 6.0]])?;
        assert_eq!(rank(&wide)?, 1);

        let zero = DenseMatrix::<f64>::zeros(2, 2)?;
        assert_eq!(rank(&zero)?, 0);
        Ok(())
    }

    #[test]
    fn test_solve_square() -> Result<(), LinalgError> {
        let a = sample()?;
        let x_true = DenseMatrix::from_rows(&[[1.0], [2.0], [3.0]])?;
        let x = solve(&a, &a.matmul(&x_true)?)?;
        assert!(x.max_abs_diff(&x_true)? < 1e-12);
        Ok(())
    }

    #[test]
    fn test_solve_singular_falls_back() -> Result<(), LinalgError> {
        // rank one, b in the range of a
        let a = DenseMatrix::from_rows(&[[1.0, 1.0], [1.0, 1.0]])?;
        let b = DenseMatrix::from_rows(&[[2.0], [2.0]])?;
        let x = solve(&a, &b)?;
        // minimum norm solution
        assert_relative_eq!(x.get(0, 0)?, 1.0, epsilon = 1e-12);
        assert_relative_eq!(x.get(1, 0)?, 1.0, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn test_solve_overdetermined_and_underdetermined() -> Result<(), LinalgError> {
        let tall = DenseMatrix::from_rows(&[[1.0, 0.0], [0.0, 1.0], [1.0, 1.0]])?;
        let b = DenseMatrix::from_rows(&[[1.0], [1.0], [2.0]])?;
        let x = solve(&tall, &b)?;
        assert_relative_eq!(x.get(0, 0)?, 1.0, epsilon = 1e-12);
        assert_relative_eq!(x.get(1, 0)?, 1.0, epsilon = 1e-12);

        let wide = DenseMatrix::from_rows(&[[1.0, 1.0]])?;
        let x = solve(&wide, &DenseMatrix::from_rows(&[[2.0]])?)?;
        assert_eq!(x.shape(), [2, 1]);
        assert_relative_eq!(x.get(0, 0)?, 1.0, epsilon = 1e-12);
        assert_relative_eq!(x.get(1, 0)?, 1.0, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn test_solve_shape_mismatch() -> Result<(), LinalgError> {
        let a = sample()?;
        let b = DenseMatrix::<f64>::zeros(2, 1)?;
        assert!(matches!(solve(&a, &b), Err(LinalgError::DimensionMismatch { .. })));
        assert!(matches!(
            solve_transpose(&a, &b),
            Err(LinalgError::DimensionMismatch { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_solve_transpose() -> Result<(), LinalgError> {
        let a = DenseMatrix::from_rows(&[[1.0, 2.0], [3.0, 5.0]])?;
        let x_true = DenseMatrix::from_rows(&[[1.0, -1.0], [0.5, 2.0], [3.0, 0.0]])?;
        let b = x_true.matmul(&a)?;
        let x = solve_transpose(&a, &b)?;
        assert_eq!(x.shape(), [3, 2]);
        assert!(x.max_abs_diff(&x_true)? < 1e-12);
        Ok(())
    }

    #[test]
    fn test_inverse() -> Result<(), LinalgError> {
        let a = sample()?;
        let inv = inverse(&a)?;
        assert!(a.matmul(&inv)?.max_abs_diff(&DenseMatrix::identity(3)?)? < 1e-12);

        let rect = DenseMatrix::<f64>::zeros(3, 2)?;
        assert!(matches!(inverse(&rect), Err(LinalgError::InvalidDimension { .. })));
        Ok(())
    }

    #[test]
    fn test_inverse_of_singular_is_pseudo_inverse() -> Result<(), LinalgError> {
        let a = DenseMatrix::from_rows(&[[1.0, 2.0], [2.0, 4.0]])?;
        let inv = inverse(&a)?;
        // Penrose conditions A X A = A and X A X = X
        assert!(a.matmul(&inv)?.matmul(&a)?.max_abs_diff(&a)? < 1e-12);
        assert!(inv.matmul(&a)?.matmul(&inv)?.max_abs_diff(&inv)? < 1e-12);
        Ok(())
    }

    #[test]
    fn test_pseudo_inverse_wide() -> Result<(), LinalgError> {
        let a = DenseMatrix::from_rows(&[[1.0, 0.0, 2.0], [0.0, 1.0, -1.0]])?;
        let pinv = pseudo_inverse(&a)?;
        assert_eq!(pinv.shape(), [3, 2]);
        assert!(a.matmul(&pinv)?.max_abs_diff(&DenseMatrix::identity(2)?)? < 1e-12);
        Ok(())
    }

    #[test]
    fn test_norm2_and_condition_number() -> Result<(), LinalgError> {
        let a = DenseMatrix::from_diagonal(&[2.0, -8.0, 4.0])?;
        assert_relative_eq!(norm2(&a)?, 8.0, epsilon = 1e-12);
        assert_relative_eq!(condition_number(&a)?, 4.0, epsilon = 1e-12);

        let singular = DenseMatrix::from_rows(&[[1.0, 2.0], [2.0, 4.0]])?;
        assert!(condition_number(&singular)? > 1e15);
        Ok(())
    }

    #[test]
    fn test_decomposition_shortcuts() -> Result<(), LinalgError> {
        let a = sample()?;
        assert!(cholesky_decomposition(&a)?.is_spd());
        assert!(qr_decomposition(&a)?.is_full_rank());
        assert!(lu_decomposition(&a).is_nonsingular());
        assert!(eigen_decomposition(&a)?.is_symmetric());
        assert_relative_eq!(svd(&a)?.norm2(), 2.0 + 2.0f64.sqrt(), epsilon = 1e-12);
        Ok(())
    }
}
