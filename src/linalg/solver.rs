use sprs::CsMat;
use crate::errors::SolveError;

/// Statistics from solver execution
#[derive(Debug, Clone, PartialEq)]
pub struct SolverStats {
    /// Final residual norm ||r|| = ||b - Ax||
    pub residual_norm: f64,

    /// Relative residual ||r|| / ||b||
    pub relative_residual: f64,

    /// Solve time in seconds
    pub solve_time: f64,
}

impl SolverStats {
    pub fn new() -> Self {
        Self {
            residual_norm: 0.0,
            relative_residual: 0.0,
            solve_time: 0.0,
        }
    }
}

impl Default for SolverStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Linear system solver trait
///
/// Solves Ax = b for x
pub trait Solver {
    /// Solve the linear system Ax = b
    ///
    /// # Arguments
    /// * `A` - System matrix (n x n)
    /// * `b` - Right-hand side vector (n)
    ///
    /// # Returns
    /// * Solution vector x (n) and solver statistics
    /// * `SolveError` when the system cannot be solved reliably
    #[allow(non_snake_case)]
    fn solve(&mut self, A: &CsMat<f64>, b: &[f64]) -> Result<(Vec<f64>, SolverStats), SolveError>;

    /// Get solver name
    fn name(&self) -> &str;
}

/// Helper functions for solver validation
pub struct SolverUtils;

impl SolverUtils {
    /// Compute residual r = b - Ax
    #[allow(non_snake_case)]
    pub fn compute_residual(A: &CsMat<f64>, x: &[f64], b: &[f64]) -> Vec<f64> {
        A.outer_iterator()
            .zip(b.iter())
            .map(|(row, &bi)| bi - row.iter().map(|(col, &val)| val * x[col]).sum::<f64>())
            .collect()
    }

    /// Reject systems whose matrix is not square or does not match b
    #[allow(non_snake_case)]
    pub fn check_dimensions(A: &CsMat<f64>, b: &[f64]) -> Result<(), SolveError> {
        if A.rows() != A.cols() || A.rows() != b.len() {
            return Err(SolveError::DimensionMismatch {
                rows: A.rows(),
                cols: A.cols(),
                rhs: b.len(),
            });
        }
        Ok(())
    }

    /// Compute L2 norm of a vector
    pub fn norm(v: &[f64]) -> f64 {
        v.iter().map(|&x| x * x).sum::<f64>().sqrt()
    }

    /// Compute residual norm ||b - Ax||
    #[allow(non_snake_case)]
    pub fn residual_norm(A: &CsMat<f64>, x: &[f64], b: &[f64]) -> f64 {
        let r = Self::compute_residual(A, x, b);
        Self::norm(&r)
    }

    /// Compute relative residual ||b - Ax|| / ||b||
    #[allow(non_snake_case)]
    pub fn relative_residual(A: &CsMat<f64>, x: &[f64], b: &[f64]) -> f64 {
        let r_norm = Self::residual_norm(A, x, b);
        let b_norm = Self::norm(b);

        if b_norm < 1e-14 {
            r_norm
        } else {
            r_norm / b_norm
        }
    }
}
