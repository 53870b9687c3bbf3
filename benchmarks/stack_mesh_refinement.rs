/// Device stack under mesh refinement
///
/// Layers only share nodes where their cell grids line up. This runs the
/// four-layer device at several densities and shows which ones weld into a
/// single body and which leave floating layers that make the system singular.

use std::time::Instant;
use stack_thermal::{assess_mesh_quality, run_pipeline, SimulationConfig, SolveStatus};

fn main() {
    println!("=== Device Stack Mesh Refinement ===\n");

    let mut config = SimulationConfig::from_file("configs/device_stack.toml")
        .expect("Failed to load configs/device_stack.toml");

    for density in [20.0, 10.0, 5.0] {
        config.mesh.density = density;
        println!("--- Density {:.1} ---", density);

        let start = Instant::now();
        let (mesh, solution) = match run_pipeline(&config) {
            Ok(result) => result,
            Err(e) => {
                println!("  ✗ {}", e);
                continue;
            }
        };
        let elapsed = start.elapsed().as_secs_f64();

        let quality = assess_mesh_quality(&mesh);
        println!("  Nodes: {}, Elements: {}", mesh.num_nodes(), mesh.num_elements());
        println!("  det(J): min {:.3e}, max {:.3e}", quality.min_jacobian, quality.max_jacobian);

        match &solution.status {
            SolveStatus::Converged(stats) => {
                let range = solution.temperature_field().range();
                println!("  ✓ Converged (relative residual {:.2e})", stats.relative_residual);
                if let Some(range) = range {
                    println!("  T: min {:.2}, mean {:.2}, max {:.2}", range.min, range.mean, range.max);
                }
            }
            SolveStatus::MidpointFallback(err) => {
                println!("  ✗ Fallback to midpoint: {}", err);
            }
        }
        println!("  Time: {:.3} s\n", elapsed);
    }
}
