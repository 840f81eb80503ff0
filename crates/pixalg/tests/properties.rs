use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use pixalg::fft::{fft2d, fft2x, ifft2d, ifft2x};
use pixalg::linalg::batch::{eigen_decompositions, svds, ExecutionStrategy};
use pixalg::linalg::cholesky::CholeskyDecomposition;
use pixalg::linalg::eigen::EigenDecomposition;
use pixalg::linalg::lu::LuDecomposition;
use pixalg::linalg::qr::QrDecomposition;
use pixalg::linalg::svd::SvdDecomposition;
use pixalg::linalg::{ops, LinalgError};
use pixalg::matrix::DenseMatrix;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn random_matrix(rng: &mut StdRng, rows: usize, cols: usize) -> DenseMatrix<f64> {
    // from_fn only fails on an empty shape
    DenseMatrix::from_fn(rows, cols, |_, _| rng.random_range(-1.0..1.0))
        .expect("non-empty shape")
}

fn random_symmetric(rng: &mut StdRng, n: usize) -> DenseMatrix<f64> {
    let a = random_matrix(rng, n, n);
    DenseMatrix::from_fn(n, n, |i, j| a[(i, j)] + a[(j, i)]).expect("non-empty shape")
}

fn orthogonality_error(q: &DenseMatrix<f64>) -> Result<f64, Box<dyn std::error::Error>> {
    let qtq = q.transpose().matmul(q)?;
    Ok(qtq.max_abs_diff(&DenseMatrix::identity(q.cols())?)?)
}

#[test]
fn lu_reconstructs_permuted_input() -> TestResult {
    let mut rng = StdRng::seed_from_u64(1);
    for (m, n) in [(1, 1), (5, 5), (7, 4), (3, 6)] {
        let a = random_matrix(&mut rng, m, n);
        let lu = LuDecomposition::new(&a);
        let pa = lu.permutation_matrix().matmul(&a)?;
        let rebuilt = lu.l().matmul(&lu.u())?;
        assert!(rebuilt.max_abs_diff(&pa)? < 1e-12, "{m}x{n}");
    }
    Ok(())
}

#[test]
fn lu_determinant_matches_factors() -> TestResult {
    let mut rng = StdRng::seed_from_u64(2);
    for n in [1, 2, 6, 9] {
        let a = random_matrix(&mut rng, n, n);
        let lu = LuDecomposition::new(&a);
        let diag_product: f64 = lu.u().diagonal().iter().product();
        let det = ops::determinant(&a)?;
        // det(L) == 1, so det(A) == +-det(U)
        assert_relative_eq!(det.abs(), diag_product.abs(), max_relative = 1e-10);
        assert_relative_eq!(det, lu.pivot_sign() * diag_product, max_relative = 1e-10);
        assert_relative_eq!(
            det,
            ops::determinant(&a.transpose())?,
            epsilon = 1e-10,
            max_relative = 1e-9
        );
    }
    Ok(())
}

#[test]
fn singular_lu_does_not_panic() -> TestResult {
    let a = DenseMatrix::from_rows(&[[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [1.0, 0.0, 1.0]])?;
    let lu = LuDecomposition::new(&a);
    assert!(!lu.is_nonsingular());
    assert_relative_eq!(lu.determinant()?, 0.0, epsilon = 1e-12);
    assert!(matches!(
        lu.solve(&DenseMatrix::<f64>::identity(3)?),
        Err(LinalgError::SingularMatrix)
    ));
    Ok(())
}

#[test]
fn qr_reconstructs_tall_input() -> TestResult {
    let mut rng = StdRng::seed_from_u64(3);
    for (m, n) in [(1, 1), (6, 6), (9, 4)] {
        let a = random_matrix(&mut rng, m, n);
        let qr = QrDecomposition::new(&a)?;
        assert!(qr.q().matmul(&qr.r())?.max_abs_diff(&a)? < 1e-12);
        assert!(orthogonality_error(&qr.q())? < 1e-12);
    }
    Ok(())
}

#[test]
fn svd_reconstructs_input() -> TestResult {
    let mut rng = StdRng::seed_from_u64(4);
    for (m, n) in [(1, 1), (5, 5), (8, 3)] {
        let a = random_matrix(&mut rng, m, n);
        let svd = SvdDecomposition::new(&a)?;
        let rebuilt = svd.u().matmul(&svd.s())?.matmul(&svd.v().transpose())?;
        assert!(rebuilt.max_abs_diff(&a)? < 1e-12, "{m}x{n}");
        assert!(orthogonality_error(&svd.u())? < 1e-12);
        assert!(orthogonality_error(&svd.v())? < 1e-12);
        assert!(svd.singular_values().windows(2).all(|w| w[0] >= w[1]));
    }
    Ok(())
}

#[test]
fn symmetric_eigen_reconstructs_input() -> TestResult {
    let mut rng = StdRng::seed_from_u64(5);
    for n in [1, 3, 8] {
        let a = random_symmetric(&mut rng, n);
        let eig = EigenDecomposition::new(&a)?;
        assert!(eig.is_symmetric());
        let v = eig.v();
        let rebuilt = v.matmul(&eig.d())?.matmul(&v.transpose())?;
        assert!(rebuilt.max_abs_diff(&a)? < 1e-12);
        assert!(orthogonality_error(&v)? < 1e-12);
        assert!(eig.real_eigenvalues().windows(2).all(|w| w[0] <= w[1]));
        assert!(eig.imag_eigenvalues().iter().all(|&x| x == 0.0));
    }
    Ok(())
}

#[test]
fn general_eigen_satisfies_av_eq_vd() -> TestResult {
    let mut rng = StdRng::seed_from_u64(6);
    for n in [2, 5, 7] {
        let a = random_matrix(&mut rng, n, n);
        let eig = EigenDecomposition::new(&a)?;
        let av = a.matmul(&eig.v())?;
        let vd = eig.v().matmul(&eig.d())?;
        // eigenvectors are not normalized on the general path
        let scale = vd.max_abs().max(1.0);
        assert!(av.max_abs_diff(&vd)? < 1e-10 * scale, "{n}x{n}");

        let sum: f64 = eig.real_eigenvalues().iter().sum();
        assert_relative_eq!(sum, ops::trace(&a)?, epsilon = 1e-10);
    }
    Ok(())
}

#[test]
fn trace_is_transpose_invariant() -> TestResult {
    let mut rng = StdRng::seed_from_u64(7);
    let a = random_matrix(&mut rng, 6, 6);
    assert_relative_eq!(ops::trace(&a)?, ops::trace(&a.transpose())?);
    Ok(())
}

#[test]
fn one_by_one_matrices() -> TestResult {
    let a = DenseMatrix::from_rows(&[[4.0f32]])?;
    assert_relative_eq!(ops::determinant(&a)?, 4.0);
    assert_eq!(ops::rank(&a)?, 1);
    assert_relative_eq!(ops::inverse(&a)?.get(0, 0)?, 0.25);
    assert_relative_eq!(EigenDecomposition::new(&a)?.real_eigenvalues()[0], 4.0);
    assert_relative_eq!(SvdDecomposition::new(&a)?.singular_values()[0], 4.0);
    assert_relative_eq!(CholeskyDecomposition::new(&a)?.l().get(0, 0)?, 2.0);
    Ok(())
}

#[test]
fn cholesky_of_spd_and_non_spd() -> TestResult {
    let mut rng = StdRng::seed_from_u64(8);
    let n = 5;
    let b = random_matrix(&mut rng, n, n);
    let spd = b
        .transpose()
        .matmul(&b)?
        .add(&DenseMatrix::identity(n)?.scale(n as f64))?;
    let chol = CholeskyDecomposition::new(&spd)?;
    assert!(chol.is_spd());
    let l = chol.l();
    assert!(l.matmul(&l.transpose())?.max_abs_diff(&spd)? < 1e-12);

    let indefinite = DenseMatrix::from_rows(&[[1.0, 2.0], [2.0, 1.0]])?;
    let chol = CholeskyDecomposition::new(&indefinite)?;
    assert!(!chol.is_spd());
    assert!(chol.failed_row().is_some());
    assert!(matches!(
        chol.solve(&DenseMatrix::<f64>::identity(2)?),
        Err(LinalgError::NotPositiveDefinite)
    ));
    Ok(())
}

#[test]
fn batch_results_equal_single_calls() -> TestResult {
    let mut rng = StdRng::seed_from_u64(9);
    let matrices: Vec<_> = (0..12).map(|_| random_matrix(&mut rng, 4, 4)).collect();

    let eigs = eigen_decompositions(&matrices, ExecutionStrategy::Parallel)?;
    let decomps = svds(&matrices, ExecutionStrategy::Fixed(3))?;
    for ((a, eig), svd) in matrices.iter().zip(eigs).zip(decomps) {
        let single = EigenDecomposition::new(a)?;
        let eig = eig?;
        assert_eq!(eig.real_eigenvalues(), single.real_eigenvalues());
        assert_eq!(eig.imag_eigenvalues(), single.imag_eigenvalues());
        assert_eq!(svd?.singular_values(), SvdDecomposition::new(a)?.singular_values());
    }
    Ok(())
}

#[test]
fn fft_round_trip_on_image_sizes() -> TestResult {
    let mut rng = StdRng::seed_from_u64(10);
    for (rows, cols) in [(12, 20), (9, 15), (16, 10), (1, 13)] {
        let a = random_matrix(&mut rng, rows, cols);
        let back = ifft2d(&fft2d(&a)?)?;
        assert!(back.max_abs_diff(&a)? < 1e-10, "{rows}x{cols}");
    }
    Ok(())
}

#[test]
fn fft2x_equals_two_transforms() -> TestResult {
    let mut rng = StdRng::seed_from_u64(11);
    for (rows, cols) in [(10, 14), (9, 8), (16, 16)] {
        let a = random_matrix(&mut rng, rows, cols).to_f32();
        let b = random_matrix(&mut rng, rows, cols).to_f32();
        let (fa, fb) = fft2x(&a, &b)?;
        let (da, db) = (fft2d(&a)?, fft2d(&b)?);
        assert!(fa.re().max_abs_diff(da.re())? < 1e-9);
        assert!(fa.im().max_abs_diff(da.im())? < 1e-9);
        assert!(fb.re().max_abs_diff(db.re())? < 1e-9);
        assert!(fb.im().max_abs_diff(db.im())? < 1e-9);

        let (ra, rb) = ifft2x(&fa, &fb)?;
        assert!(ra.max_abs_diff(&a.to_f64())? < 1e-9);
        assert!(rb.max_abs_diff(&b.to_f64())? < 1e-9);
    }
    Ok(())
}

#[test]
fn plane_round_trip() -> TestResult {
    let src = DenseMatrix::from_fn(3, 4, |r, c| (r * 4 + c) as f32 * 0.5)?;
    let m = DenseMatrix::<f64>::from_plane(&src)?;
    let solved = ops::solve(&DenseMatrix::<f64>::identity(3)?, &m)?;

    let mut dst = DenseMatrix::<f32>::zeros(3, 4)?;
    solved.write_plane(&mut dst)?;
    assert_eq!(dst, src);

    let mut wrong = DenseMatrix::<f32>::zeros(4, 3)?;
    assert!(solved.write_plane(&mut wrong).is_err());
    Ok(())
}
