use log::debug;
use nalgebra::{DMatrix, DVector};
use sprs::CsMat;
use std::time::Instant;
use super::solver::{Solver, SolverStats, SolverUtils};
use crate::errors::SolveError;

/// Smallest accepted ratio between the smallest and largest LU pivot
pub const DEFAULT_MIN_PIVOT_RATIO: f64 = 1e-20;

/// Largest accepted relative residual ||b - Ax|| / ||b||
pub const DEFAULT_RESIDUAL_TOLERANCE: f64 = 1e-8;

/// Direct solver using dense LU decomposition with partial pivoting
///
/// The sparse matrix is expanded to a dense nalgebra matrix before
/// factorization. Good for small to medium problems (a few thousand nodes).
///
/// Singular and numerically singular systems are reported instead of
/// returning garbage: a zero pivot gives `SolveError::Singular`, a pivot
/// ratio min|U_ii| / max|U_ii| below `min_pivot_ratio` gives
/// `SolveError::IllConditioned`, and a solution whose relative residual
/// exceeds `residual_tolerance` gives `SolveError::ResidualTooLarge`.
pub struct DirectSolver {
    /// Solver name
    name: String,
    min_pivot_ratio: f64,
    residual_tolerance: f64,
}

impl DirectSolver {
    pub fn new() -> Self {
        Self {
            name: "Direct (Dense LU)".to_string(),
            min_pivot_ratio: DEFAULT_MIN_PIVOT_RATIO,
            residual_tolerance: DEFAULT_RESIDUAL_TOLERANCE,
        }
    }

    pub fn with_min_pivot_ratio(mut self, ratio: f64) -> Self {
        self.min_pivot_ratio = ratio;
        self
    }

    pub fn with_residual_tolerance(mut self, tolerance: f64) -> Self {
        self.residual_tolerance = tolerance;
        self
    }

    /// Expand a CSR matrix into a dense matrix
    #[allow(non_snake_case)]
    fn to_dense(A: &CsMat<f64>) -> DMatrix<f64> {
        let mut a_dense = DMatrix::zeros(A.rows(), A.cols());
        for (row_idx, row) in A.outer_iterator().enumerate() {
            for (col_idx, &val) in row.iter() {
                a_dense[(row_idx, col_idx)] += val;
            }
        }
        a_dense
    }

    /// Inspect the diagonal of U for zero or vanishing pivots
    fn check_pivots(&self, pivots: &DVector<f64>) -> Result<f64, SolveError> {
        if let Some(row) = pivots.iter().position(|p| *p == 0.0 || !p.is_finite()) {
            return Err(SolveError::Singular { row });
        }

        let (min, max) = pivots.iter().fold((f64::INFINITY, 0.0_f64), |(lo, hi), p| {
            (lo.min(p.abs()), hi.max(p.abs()))
        });
        let ratio = min / max;
        if ratio < self.min_pivot_ratio {
            return Err(SolveError::IllConditioned {
                ratio,
                threshold: self.min_pivot_ratio,
            });
        }
        Ok(ratio)
    }
}

impl Default for DirectSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver for DirectSolver {
    #[allow(non_snake_case)]
    fn solve(&mut self, A: &CsMat<f64>, b: &[f64]) -> Result<(Vec<f64>, SolverStats), SolveError> {
        let start = Instant::now();

        SolverUtils::check_dimensions(A, b)?;
        let n = b.len();
        if n == 0 {
            return Ok((Vec::new(), SolverStats::new()));
        }

        let lu = Self::to_dense(A).lu();

        let pivots = lu.u().diagonal();
        let ratio = self.check_pivots(&pivots)?;
        debug!("{}: n = {}, pivot ratio {:.3e}", self.name, n, ratio);

        let b_vec = DVector::from_column_slice(b);
        let x_vec = lu
            .solve(&b_vec)
            .ok_or(SolveError::Singular { row: n - 1 })?;

        if x_vec.iter().any(|v| !v.is_finite()) {
            return Err(SolveError::NonFinite);
        }
        let x: Vec<f64> = x_vec.iter().copied().collect();

        let solve_time = start.elapsed().as_secs_f64();

        let residual_norm = SolverUtils::residual_norm(A, &x, b);
        let relative_residual = SolverUtils::relative_residual(A, &x, b);
        if !(relative_residual <= self.residual_tolerance) {
            return Err(SolveError::ResidualTooLarge {
                relative_residual,
                tolerance: self.residual_tolerance,
            });
        }

        let stats = SolverStats {
            residual_norm,
            relative_residual,
            solve_time,
        };

        Ok((x, stats))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprs::TriMat;
    use approx::assert_relative_eq;

    #[test]
    #[allow(non_snake_case)]
    fn test_direct_solver_simple() {
        // Solve [2 1; 1 2] x = [3; 3]
        // Solution: x = [1; 1]
        let mut triplets = TriMat::new((2, 2));
        triplets.add_triplet(0, 0, 2.0);
        triplets.add_triplet(0, 1, 1.0);
        triplets.add_triplet(1, 0, 1.0);
        triplets.add_triplet(1, 1, 2.0);
        let A = triplets.to_csr();

        let b = vec![3.0, 3.0];

        let mut solver = DirectSolver::new();
        let (x, stats) = solver.solve(&A, &b).unwrap();

        assert_relative_eq!(x[0], 1.0, epsilon = 1e-10);
        assert_relative_eq!(x[1], 1.0, epsilon = 1e-10);
        assert!(stats.relative_residual < DEFAULT_RESIDUAL_TOLERANCE);
    }

    #[test]
    #[allow(non_snake_case)]
    fn test_direct_solver_diagonal() {
        let n = 10;
        let mut triplets = TriMat::new((n, n));
        for i in 0..n {
            triplets.add_triplet(i, i, (i + 1) as f64);
        }
        let A = triplets.to_csr();

        let b: Vec<f64> = (1..=n).map(|i| (i * i) as f64).collect();

        let mut solver = DirectSolver::new();
        let (x, stats) = solver.solve(&A, &b).unwrap();

        // x[i] = b[i] / A[i][i] = (i+1)^2 / (i+1) = i+1
        for i in 0..n {
            assert_relative_eq!(x[i], (i + 1) as f64, epsilon = 1e-10);
        }
        assert_relative_eq!(stats.residual_norm, 0.0, epsilon = 1e-10);
    }

    #[test]
    #[allow(non_snake_case)]
    fn test_zero_row_is_singular() {
        let mut triplets = TriMat::new((3, 3));
        triplets.add_triplet(0, 0, 4.0);
        triplets.add_triplet(2, 2, 1.0);
        let A = triplets.to_csr();

        let mut solver = DirectSolver::new();
        let err = solver.solve(&A, &[1.0, 0.0, 1.0]).unwrap_err();
        assert_eq!(err, SolveError::Singular { row: 1 });
    }

    #[test]
    #[allow(non_snake_case)]
    fn test_tiny_pivot_is_ill_conditioned() {
        let mut triplets = TriMat::new((2, 2));
        triplets.add_triplet(0, 0, 1e12);
        triplets.add_triplet(1, 1, 1e-12);
        let A = triplets.to_csr();

        let mut solver = DirectSolver::new();
        assert!(matches!(
            solver.solve(&A, &[1.0, 1.0]),
            Err(SolveError::IllConditioned { .. })
        ));

        // A looser threshold accepts the same system
        let mut lenient = DirectSolver::new().with_min_pivot_ratio(1e-30);
        let (x, _) = lenient.solve(&A, &[1.0, 1.0]).unwrap();
        assert_relative_eq!(x[1], 1e12, max_relative = 1e-12);
    }

    #[test]
    #[allow(non_snake_case)]
    fn test_residual_above_tolerance_is_rejected() {
        // 8x8 Hilbert matrix: solvable, but LU leaves a rounding residual
        let n = 8;
        let mut triplets = TriMat::new((n, n));
        for i in 0..n {
            for j in 0..n {
                triplets.add_triplet(i, j, 1.0 / (i + j + 1) as f64);
            }
        }
        let A = triplets.to_csr();
        let b = vec![1.0; n];

        let (_, stats) = DirectSolver::new().solve(&A, &b).unwrap();
        assert!(stats.relative_residual <= DEFAULT_RESIDUAL_TOLERANCE);

        let mut strict = DirectSolver::new().with_residual_tolerance(0.0);
        match strict.solve(&A, &b) {
            Err(SolveError::ResidualTooLarge { relative_residual, tolerance }) => {
                assert!(relative_residual > 0.0);
                assert_eq!(tolerance, 0.0);
            }
            other => panic!("expected ResidualTooLarge, got {:?}", other),
        }
    }

    #[test]
    #[allow(non_snake_case)]
    fn test_dimension_mismatch() {
        let mut triplets = TriMat::new((2, 2));
        triplets.add_triplet(0, 0, 1.0);
        triplets.add_triplet(1, 1, 1.0);
        let A = triplets.to_csr();

        let mut solver = DirectSolver::new();
        assert_eq!(
            solver.solve(&A, &[1.0, 2.0, 3.0]).unwrap_err(),
            SolveError::DimensionMismatch { rows: 2, cols: 2, rhs: 3 }
        );
    }

    #[test]
    #[allow(non_snake_case)]
    fn test_empty_system() {
        let A: CsMat<f64> = TriMat::new((0, 0)).to_csr();
        let mut solver = DirectSolver::new();
        let (x, stats) = solver.solve(&A, &[]).unwrap();
        assert!(x.is_empty());
        assert_eq!(stats, SolverStats::new());
    }
}
