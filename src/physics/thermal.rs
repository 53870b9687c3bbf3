use log::{debug, error, info, warn};
use nalgebra::Vector3;
use crate::errors::{DegenerateElement, SolveError};
use crate::fem::{
    Assembler, BoundaryAxis, BoundaryNodes, ElementMatrix, GlobalSystem,
    DEFAULT_BOUNDARY_TOLERANCE, DEFAULT_CONDUCTIVITY, DEFAULT_PENALTY,
};
use crate::linalg::{
    DirectSolver, Solver, SolverStats, DEFAULT_MIN_PIVOT_RATIO, DEFAULT_RESIDUAL_TOLERANCE,
};
use crate::mesh::{ElementVectorField, Mesh, ScalarField};

/// Name of the nodal temperature field attached to a mesh
pub const TEMPERATURE_FIELD: &str = "Temperature";

/// Name of the per-element heat flux field
pub const HEAT_FLUX_FIELD: &str = "HeatFlux";

/// Steady-state conduction settings
#[derive(Debug, Clone, PartialEq)]
pub struct ThermalConfig {
    /// Uniform thermal conductivity k
    pub conductivity: f64,
    /// Penalty coefficient for fixed-temperature nodes
    pub penalty: f64,
    /// Axis whose extreme faces carry the fixed temperatures
    pub axis: BoundaryAxis,
    /// Matching tolerance for boundary nodes
    pub tolerance: f64,
    /// Compute element matrices with rayon
    pub parallel_assembly: bool,
    /// Pivot ratio below which the system is rejected as ill-conditioned
    pub min_pivot_ratio: f64,
    /// Largest accepted relative residual of the LU solution
    pub residual_tolerance: f64,
}

impl Default for ThermalConfig {
    fn default() -> Self {
        Self {
            conductivity: DEFAULT_CONDUCTIVITY,
            penalty: DEFAULT_PENALTY,
            axis: BoundaryAxis::X,
            tolerance: DEFAULT_BOUNDARY_TOLERANCE,
            parallel_assembly: false,
            min_pivot_ratio: DEFAULT_MIN_PIVOT_RATIO,
            residual_tolerance: DEFAULT_RESIDUAL_TOLERANCE,
        }
    }
}

/// How the temperature field was obtained
#[derive(Debug, Clone, PartialEq)]
pub enum SolveStatus {
    /// The linear system was solved within the residual tolerance
    Converged(SolverStats),
    /// The solve failed; every node holds (high + low) / 2
    MidpointFallback(SolveError),
}

/// Result of a steady-state solve
#[derive(Debug, Clone)]
pub struct ThermalSolution {
    /// Nodal temperatures in node order
    pub temperatures: Vec<f64>,
    pub status: SolveStatus,
    /// Elements whose stiffness was dropped
    pub degenerate_elements: Vec<DegenerateElement>,
    /// Fixed-temperature node sets that were applied
    pub boundary: BoundaryNodes,
}

impl ThermalSolution {
    pub fn is_converged(&self) -> bool {
        matches!(self.status, SolveStatus::Converged(_))
    }

    /// The error behind a midpoint fallback, if any
    pub fn fallback_error(&self) -> Option<&SolveError> {
        match &self.status {
            SolveStatus::MidpointFallback(err) => Some(err),
            SolveStatus::Converged(_) => None,
        }
    }

    /// Reject the midpoint fallback instead of accepting it
    pub fn into_result(self) -> Result<Vec<f64>, SolveError> {
        match self.status {
            SolveStatus::Converged(_) => Ok(self.temperatures),
            SolveStatus::MidpointFallback(err) => Err(err),
        }
    }

    pub fn temperature_field(&self) -> ScalarField {
        ScalarField::new(TEMPERATURE_FIELD, self.temperatures.clone())
    }

    /// Attach the temperatures to the mesh as a nodal scalar field
    pub fn attach_to(&self, mesh: &mut Mesh) {
        mesh.field_data.add_field(self.temperature_field());
    }

    /// Centroid heat flux q = -k ∇T for every element
    ///
    /// Degenerate elements, and elements referencing nodes outside the
    /// field, report a zero vector.
    pub fn heat_flux(&self, mesh: &Mesh, conductivity: f64) -> ElementVectorField {
        let data = (0..mesh.num_elements())
            .map(|element| {
                let nodes = mesh.connectivity.wedge6_elements[element].nodes;
                if nodes.iter().any(|&n| n >= self.temperatures.len()) {
                    return Vector3::zeros();
                }
                let temps = nodes.map(|n| self.temperatures[n]);
                ElementMatrix::heat_flux(&mesh.element_coordinates(element), &temps, conductivity)
                    .unwrap_or_else(|_| Vector3::zeros())
            })
            .collect();
        ElementVectorField::new(HEAT_FLUX_FIELD, data)
    }
}

/// Steady-state heat conduction solver
///
/// Solves ∇·(k∇T) = 0 on a Wedge6 mesh with two fixed-temperature faces:
/// the minimum face along the boundary axis is held at `high_temp`, the
/// maximum face at `low_temp`. Constraints are imposed with the penalty
/// method and K·T = F is solved by dense LU.
pub struct SteadyStateThermal {
    config: ThermalConfig,
}

impl SteadyStateThermal {
    pub fn new(config: ThermalConfig) -> Self {
        Self { config }
    }

    /// Build K and F with the fixed-temperature penalties applied
    pub fn assemble(
        &self,
        mesh: &Mesh,
        boundary: &BoundaryNodes,
        high_temp: f64,
        low_temp: f64,
    ) -> GlobalSystem {
        let mut context = Assembler::assemble_thermal_stiffness(
            mesh,
            self.config.conductivity,
            self.config.parallel_assembly,
        );
        for set in boundary.with_temperatures(high_temp, low_temp) {
            context.apply_dirichlet_penalty(&set, self.config.penalty);
        }
        context.finish()
    }

    /// Solve for the nodal temperature field
    ///
    /// # Arguments
    /// * `mesh` - Wedge6 mesh
    /// * `high_temp` - Temperature of the minimum face
    /// * `low_temp` - Temperature of the maximum face
    ///
    /// # Returns
    /// Temperatures for every node. Invalid connectivity, a singular or
    /// ill-conditioned system, or an inaccurate solution does not abort: the
    /// field falls back to the midpoint temperature and the status carries
    /// the error.
    pub fn solve(&self, mesh: &Mesh, high_temp: f64, low_temp: f64) -> ThermalSolution {
        let midpoint = 0.5 * (high_temp + low_temp);
        let boundary = BoundaryNodes::find(mesh, self.config.axis, self.config.tolerance);

        if let Some((element, node)) = mesh.connectivity.first_invalid_node(mesh.num_nodes()) {
            let err = SolveError::InvalidConnectivity { element, node, num_nodes: mesh.num_nodes() };
            error!("{}; falling back to uniform {} for all nodes", err, midpoint);
            return ThermalSolution {
                temperatures: vec![midpoint; mesh.num_nodes()],
                status: SolveStatus::MidpointFallback(err),
                degenerate_elements: Vec::new(),
                boundary,
            };
        }

        if mesh.num_nodes() > 0 && (boundary.high.is_empty() || boundary.low.is_empty()) {
            warn!(
                "only {} high / {} low boundary nodes along {:?}",
                boundary.high.len(),
                boundary.low.len(),
                self.config.axis
            );
        }

        let orphans = mesh
            .connectivity
            .referenced_nodes(mesh.num_nodes())
            .iter()
            .filter(|&&used| !used)
            .count();
        if orphans > 0 {
            warn!("{} nodes belong to no element", orphans);
        }

        let system = self.assemble(mesh, &boundary, high_temp, low_temp);
        debug!(
            "assembled K: {} x {}, nnz = {}",
            system.k.rows(),
            system.k.cols(),
            system.k.nnz()
        );

        let mut solver = DirectSolver::new()
            .with_min_pivot_ratio(self.config.min_pivot_ratio)
            .with_residual_tolerance(self.config.residual_tolerance);
        let (temperatures, status) = match solver.solve(&system.k, &system.f) {
            Ok((temperatures, stats)) => {
                info!(
                    "{}: solved {} nodes, relative residual {:.3e}",
                    solver.name(),
                    temperatures.len(),
                    stats.relative_residual
                );
                (temperatures, SolveStatus::Converged(stats))
            }
            Err(err) => {
                error!("{}; falling back to uniform {} for all nodes", err, midpoint);
                (vec![midpoint; mesh.num_nodes()], SolveStatus::MidpointFallback(err))
            }
        };

        ThermalSolution {
            temperatures,
            status,
            degenerate_elements: system.degenerate,
            boundary,
        }
    }
}

impl Default for SteadyStateThermal {
    fn default() -> Self {
        Self::new(ThermalConfig::default())
    }
}

/// Solve steady-state conduction with default settings
pub fn solve_steady_state_heat(mesh: &Mesh, high_temp: f64, low_temp: f64) -> ThermalSolution {
    SteadyStateThermal::default().solve(mesh, high_temp, low_temp)
}
