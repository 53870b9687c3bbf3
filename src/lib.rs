pub mod errors;
pub mod layer;
pub mod triangulate;
pub mod mesh;
pub mod mesh_generator;
pub mod fem;
pub mod linalg;
pub mod physics;
pub mod config;

pub use errors::{ConfigError, DegenerateElement, MeshError, SolveError, StackError, TriangulationError};
pub use layer::{Dimensions, Layer, LayerExtents, Position};
pub use triangulate::{EarClipping, Triangulator};
pub use mesh::{Mesh, Wedge6Element, ScalarField, ElementVectorField, FieldRange, MeshQuality, assess_mesh_quality};
pub use mesh_generator::{generate_swept_mesh, SweptMeshGenerator, DEFAULT_DENSITY};
pub use fem::{element_heat_flux, element_stiffness, Assembler, BoundaryAxis, BoundaryNodes, ElementMatrix, Wedge6Basis};
pub use linalg::{DirectSolver, Solver, SolverStats};
pub use physics::{solve_steady_state_heat, SolveStatus, SteadyStateThermal, ThermalConfig, ThermalSolution};
pub use config::SimulationConfig;

/// Mesh the configured stack and solve for its temperature field
///
/// Temperature (per node) and heat flux (per element) are attached to the
/// returned mesh. Solver failures are not errors here; they surface as
/// `SolveStatus::MidpointFallback`.
pub fn run_pipeline(config: &SimulationConfig) -> Result<(Mesh, ThermalSolution), StackError> {
    config.validate()?;

    let mut mesh = config
        .mesh_generator()
        .generate(&config.layers, config.mesh.density)?;
    log::info!(
        "meshed {} layers: {} nodes, {} wedges",
        config.layers.len(),
        mesh.num_nodes(),
        mesh.num_elements()
    );

    let solution = config.thermal_solver().solve(
        &mesh,
        config.boundary.high_temp,
        config.boundary.low_temp,
    );
    let flux = solution.heat_flux(&mesh, config.solver.conductivity);
    solution.attach_to(&mut mesh);
    mesh.field_data.add_element_vector_field(flux);

    Ok((mesh, solution))
}
