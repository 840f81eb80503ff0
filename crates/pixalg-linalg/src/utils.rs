use pixalg_matrix::DenseMatrix;

/// Build a matrix whose shape is guaranteed by the calling algorithm.
///
/// A failure here is a bug in this crate, not a caller error, so it panics.
pub(crate) fn matrix_from_parts(rows: usize, cols: usize, data: Vec<f64>) -> DenseMatrix<f64> {
    match DenseMatrix::new(rows, cols, data) {
        Ok(m) => m,
        Err(e) => panic!("internal invariant violated while building a {rows}x{cols} factor: {e}"),
    }
}

/// Build a matrix from `f(row, col)`; shape guaranteed by the caller.
pub(crate) fn matrix_from_fn(
    rows: usize,
    cols: usize,
    mut f: impl FnMut(usize, usize) -> f64,
) -> DenseMatrix<f64> {
    let mut data = Vec::with_capacity(rows * cols);
    for r in 0..rows {
        for c in 0..cols {
            data.push(f(r, c));
        }
    }
    matrix_from_parts(rows, cols, data)
}

/// `n x n` identity matrix.
pub(crate) fn identity(n: usize) -> DenseMatrix<f64> {
    matrix_from_fn(n, n, |r, c| if r == c { 1.0 } else { 0.0 })
}
