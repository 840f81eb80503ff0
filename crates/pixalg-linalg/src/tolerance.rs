//! Tolerances and iteration limits used by every decomposition.
//!
//! These values are part of the public contract: a pivot, a diagonal entry of
//! `R` or a singular value is treated as zero when its magnitude is at most
//! `EPSILON * max(rows, cols) * scale`, where `scale` is the largest magnitude
//! among the quantities being compared.

use pixalg_matrix::DenseMatrix;

/// Machine epsilon of the internal double precision arithmetic, `2^-52`.
pub const EPSILON: f64 = f64::EPSILON;

/// Default iteration cap per deflation step of the symmetric QL iteration.
pub const DEFAULT_MAX_EIGEN_ITERATIONS: usize = 30;

/// Default iteration cap per deflation step of the Francis QR iteration.
///
/// Larger than the symmetric cap so that both exceptional shifts (after 10 and
/// 30 unsuccessful iterations) get a chance to act.
pub const DEFAULT_MAX_SCHUR_ITERATIONS: usize = 100;

/// Default iteration cap per singular value of the SVD.
pub const DEFAULT_MAX_SVD_ITERATIONS: usize = 75;

/// Multiplier of `EPSILON * max|A|` used by the default symmetry check.
pub const SYMMETRY_TOLERANCE_FACTOR: f64 = 64.0;

/// Zero threshold for a factor of an `rows x cols` matrix whose relevant
/// entries have magnitude at most `scale`.
#[inline]
pub fn singular_tolerance(rows: usize, cols: usize, scale: f64) -> f64 {
    EPSILON * rows.max(cols) as f64 * scale
}

/// Whether every value in `diag` is clear of the singular tolerance.
pub(crate) fn diagonal_is_nonsingular(diag: &[f64], rows: usize, cols: usize) -> bool {
    let scale = diag.iter().fold(0.0f64, |acc, d| acc.max(d.abs()));
    let tol = singular_tolerance(rows, cols, scale);
    diag.iter().all(|d| *d != 0.0 && d.abs() > tol)
}

/// Iteration limits and tolerances of the iterative solvers.
///
/// # Examples
///
/// ```
/// use pixalg_linalg::tolerance::SolverConfig;
///
/// let config = SolverConfig {
///     max_eigen_iterations: 50,
///     ..Default::default()
/// };
/// assert_eq!(config.max_svd_iterations, 75);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Iterations allowed per deflation step of the symmetric QL iteration.
    pub max_eigen_iterations: usize,
    /// Iterations allowed per deflation step of the Francis QR iteration.
    pub max_schur_iterations: usize,
    /// Iterations allowed per singular value of the Golub-Kahan iteration.
    pub max_svd_iterations: usize,
    /// Absolute symmetry tolerance. `None` uses
    /// `SYMMETRY_TOLERANCE_FACTOR * EPSILON * max|A|`.
    pub symmetry_tolerance: Option<f64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_eigen_iterations: DEFAULT_MAX_EIGEN_ITERATIONS,
            max_schur_iterations: DEFAULT_MAX_SCHUR_ITERATIONS,
            max_svd_iterations: DEFAULT_MAX_SVD_ITERATIONS,
            symmetry_tolerance: None,
        }
    }
}

impl SolverConfig {
    /// The symmetry tolerance to apply to `a`.
    pub fn symmetry_tolerance_for(&self, a: &DenseMatrix<f64>) -> f64 {
        self.symmetry_tolerance
            .unwrap_or_else(|| SYMMETRY_TOLERANCE_FACTOR * EPSILON * a.max_abs())
    }
}
