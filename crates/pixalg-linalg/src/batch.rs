//! Batch decompositions of many independent matrices.
//!
//! Every decomposition in this crate is re-entrant and keeps no shared
//! scratch, so a batch can be spread over the rayon thread pool. Each input
//! gets its own result; one failing matrix does not affect the others.

use rayon::prelude::*;

use pixalg_matrix::{DenseMatrix, Element};

use crate::eigen::EigenDecomposition;
use crate::error::LinalgError;
use crate::svd::SvdDecomposition;

/// Controls how a batch is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Use the global Rayon thread pool, one task per matrix.
    #[default]
    Parallel,

    /// Run sequentially on the current thread.
    ///
    /// Useful for small batches, debugging, or when the caller already runs
    /// inside a parallel context.
    Serial,

    /// Run on a local thread pool with `n` threads.
    ///
    /// # Warning
    /// Creates a new thread pool on every call, which has significant overhead.
    Fixed(usize),
}

fn run_batch<T, R, F>(
    inputs: &[DenseMatrix<T>],
    strategy: ExecutionStrategy,
    op: F,
) -> Result<Vec<R>, LinalgError>
where
    T: Element,
    R: Send,
    F: Fn(&DenseMatrix<T>) -> R + Sync + Send,
{
    log::debug!("batch: {} matrices, strategy {strategy:?}", inputs.len());
    match strategy {
        ExecutionStrategy::Serial => Ok(inputs.iter().map(op).collect()),
        ExecutionStrategy::Parallel => Ok(inputs.par_iter().map(op).collect()),
        ExecutionStrategy::Fixed(n) => {
            if n == 0 {
                return Err(LinalgError::InvalidArgument {
                    reason: "thread count must be > 0".to_string(),
                });
            }
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| LinalgError::InvalidArgument {
                    reason: format!("failed to build thread pool: {e}"),
                })?;
            Ok(pool.install(|| inputs.par_iter().map(op).collect()))
        }
    }
}

/// Eigenvalue decomposition of every matrix in `matrices`.
///
/// # Errors
///
/// The outer error reports an unusable `strategy`; per-matrix failures are
/// returned in place.
///
/// # Examples
///
/// ```
/// use pixalg_matrix::DenseMatrix;
/// use pixalg_linalg::batch::{eigen_decompositions, ExecutionStrategy};
///
/// let batch = vec![DenseMatrix::<f64>::identity(2).unwrap(); 4];
/// let results = eigen_decompositions(&batch, ExecutionStrategy::Parallel).unwrap();
/// assert_eq!(results.len(), 4);
/// assert!(results.iter().all(|r| r.is_ok()));
/// ```
pub fn eigen_decompositions<T: Element>(
    matrices: &[DenseMatrix<T>],
    strategy: ExecutionStrategy,
) -> Result<Vec<Result<EigenDecomposition, LinalgError>>, LinalgError> {
    run_batch(matrices, strategy, EigenDecomposition::new)
}

/// Singular value decomposition of every matrix in `matrices`.
///
/// # Errors
///
/// The outer error reports an unusable `strategy`; per-matrix failures are
/// returned in place.
pub fn svds<T: Element>(
    matrices: &[DenseMatrix<T>],
    strategy: ExecutionStrategy,
) -> Result<Vec<Result<SvdDecomposition, LinalgError>>, LinalgError> {
    run_batch(matrices, strategy, SvdDecomposition::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch() -> Result<Vec<DenseMatrix<f64>>, LinalgError> {
        (0..16)
            .map(|k| {
                let k = k as f64;
                Ok(DenseMatrix::from_rows(&[
                    [k + 1.0, 0.5, -k],
                    [0.5, 2.0, 1.0],
                    [k * 0.25, 1.0, 3.0 - k],
                ])?)
            })
            .collect()
    }

    #[test]
    fn test_eigen_batch_matches_serial() -> Result<(), LinalgError> {
        let matrices = batch()?;
        let serial = eigen_decompositions(&matrices, ExecutionStrategy::Serial)?;
        let parallel = eigen_decompositions(&matrices, ExecutionStrategy::Parallel)?;
        let fixed = eigen_decompositions(&matrices, ExecutionStrategy::Fixed(2))?;
        assert_eq!(serial.len(), matrices.len());

        for ((s, p), f) in serial.iter().zip(&parallel).zip(&fixed) {
            let (s, p, f) = (s.as_ref().unwrap(), p.as_ref().unwrap(), f.as_ref().unwrap());
            assert_eq!(s.real_eigenvalues(), p.real_eigenvalues());
            assert_eq!(s.imag_eigenvalues(), f.imag_eigenvalues());
            assert_eq!(s.v(), p.v());
        }
        Ok(())
    }

    #[test]
    fn test_svd_batch_keeps_per_matrix_errors() -> Result<(), LinalgError> {
        let matrices = vec![
            DenseMatrix::<f64>::identity(3)?,
            DenseMatrix::<f64>::zeros(2, 3)?,
        ];
        let results = svds(&matrices, ExecutionStrategy::Parallel)?;
        assert!(results[0].is_ok());
        assert!(matches!(
            results[1],
            Err(LinalgError::InvalidDimension { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_zero_threads_rejected() -> Result<(), LinalgError> {
        let matrices = batch()?;
        assert!(matches!(
            svds(&matrices, ExecutionStrategy::Fixed(0)),
            Err(LinalgError::InvalidArgument { .. })
        ));
        Ok(())
    }
}
