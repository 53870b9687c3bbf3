pub mod solver;
pub mod direct;

pub use solver::{Solver, SolverStats, SolverUtils};
pub use direct::{DirectSolver, DEFAULT_MIN_PIVOT_RATIO, DEFAULT_RESIDUAL_TOLERANCE};
