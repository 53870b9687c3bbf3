use std::collections::BTreeSet;
use stack_thermal::{assess_mesh_quality, run_pipeline, SimulationConfig, SolveStatus};

const DEFAULT_CONFIG: &str = "configs/device_stack.toml";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("=== Layer Stack Steady-State Thermal Demo ===\n");

    let path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    println!("Loading {}...\n", path);
    let config = SimulationConfig::from_file(&path)?;
    config.print_summary();

    let (mesh, solution) = run_pipeline(&config)?;

    println!("Mesh:");
    println!("  Nodes: {}", mesh.num_nodes());
    println!("  Elements: {}", mesh.num_elements());

    let quality = assess_mesh_quality(&mesh);
    println!("\n{}", quality.report());

    println!("Boundary conditions:");
    println!("  High ({:.1}): {} nodes", config.boundary.high_temp, solution.boundary.high.len());
    println!("  Low  ({:.1}): {} nodes", config.boundary.low_temp, solution.boundary.low.len());
    if !solution.degenerate_elements.is_empty() {
        println!("  Degenerate elements skipped: {}", solution.degenerate_elements.len());
    }

    println!("\n--- Solve ---");
    match &solution.status {
        SolveStatus::Converged(stats) => {
            println!("  Relative residual: {:.2e}", stats.relative_residual);
            println!("  Solve time: {:.3} s", stats.solve_time);
        }
        SolveStatus::MidpointFallback(err) => {
            println!("  ✗ Solve failed: {}", err);
            println!("  All nodes set to the midpoint temperature");
        }
    }

    let field = solution.temperature_field();
    if let Some(range) = field.range() {
        println!("\n  Solution statistics:");
        println!("    Min temperature: {:.2}", range.min);
        println!("    Max temperature: {:.2}", range.max);
        println!("    Mean temperature: {:.2}", range.mean);
    }

    println!("\n  Per-layer mean temperature:");
    for (layer_idx, layer) in config.layers.iter().enumerate() {
        let nodes: BTreeSet<usize> = mesh
            .connectivity
            .elements_of_layer(layer_idx)
            .flat_map(|e| e.nodes)
            .collect();
        if nodes.is_empty() {
            continue;
        }
        let mean = nodes.iter().map(|&n| solution.temperatures[n]).sum::<f64>() / nodes.len() as f64;
        println!("    {:<16} {:>8.2}  ({} nodes)", layer.name, mean, nodes.len());
    }

    let flux = solution.heat_flux(&mesh, config.solver.conductivity);
    println!("\n  Max |q|: {:.3e}", flux.max_magnitude());

    println!("\n=== Solve Complete ===");
    Ok(())
}
