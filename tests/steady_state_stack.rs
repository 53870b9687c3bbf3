use stack_thermal::{
    generate_swept_mesh, run_pipeline, solve_steady_state_heat, BoundaryAxis, Layer,
    SimulationConfig, SolveError, SteadyStateThermal, ThermalConfig,
};
use approx::assert_relative_eq;

fn block() -> Layer {
    Layer::boxed("Substrate (Si)", 0x888888, (100.0, 20.0, 100.0), (0.0, 0.0, 0.0))
}

#[test]
fn test_single_block_end_to_end() {
    let mesh = generate_swept_mesh(&[block()], 50.0).unwrap();
    assert_eq!(mesh.num_elements(), 8);
    assert_eq!(mesh.num_nodes(), 18);

    let solution = solve_steady_state_heat(&mesh, 100.0, 0.0);
    assert!(solution.is_converged());
    assert!(solution.degenerate_elements.is_empty());

    for &node in &solution.boundary.high {
        assert_relative_eq!(mesh.geometry.nodes[node].x, -50.0);
        assert_relative_eq!(solution.temperatures[node], 100.0, epsilon = 1e-6);
    }
    for &node in &solution.boundary.low {
        assert_relative_eq!(mesh.geometry.nodes[node].x, 50.0);
        assert_relative_eq!(solution.temperatures[node], 0.0, epsilon = 1e-6);
    }

    // Temperature never rises along x
    let mut by_x: Vec<(f64, f64)> = mesh
        .geometry
        .nodes
        .iter()
        .zip(solution.temperatures.iter())
        .map(|(p, &t)| (p.x, t))
        .collect();
    by_x.sort_by(|a, b| a.0.total_cmp(&b.0));
    for pair in by_x.windows(2) {
        assert!(pair[1].1 <= pair[0].1 + 1e-9, "T increases between x = {} and x = {}", pair[0].0, pair[1].0);
    }

    // The middle plane sits halfway
    for (p, t) in mesh.geometry.nodes.iter().zip(solution.temperatures.iter()) {
        if p.x == 0.0 {
            assert_relative_eq!(*t, 50.0, epsilon = 1e-6);
        }
    }
}

#[test]
fn test_penalty_enforces_arbitrary_temperatures() {
    let mesh = generate_swept_mesh(&[block()], 25.0).unwrap();
    let solution = solve_steady_state_heat(&mesh, 250.0, -40.0);

    for &node in &solution.boundary.high {
        assert_relative_eq!(solution.temperatures[node], 250.0, epsilon = 1e-6);
    }
    for &node in &solution.boundary.low {
        assert_relative_eq!(solution.temperatures[node], -40.0, epsilon = 1e-6);
    }
    for &t in &solution.temperatures {
        assert!((-40.0 - 1e-6..=250.0 + 1e-6).contains(&t));
    }
}

#[test]
fn test_boundary_along_z() {
    let mesh = generate_swept_mesh(&[block()], 25.0).unwrap();
    let solver = SteadyStateThermal::new(ThermalConfig {
        axis: BoundaryAxis::Z,
        ..ThermalConfig::default()
    });

    let temps = solver.solve(&mesh, 100.0, 0.0).into_result().unwrap();
    for (p, t) in mesh.geometry.nodes.iter().zip(temps.iter()) {
        assert_relative_eq!(*t, 50.0 - p.z, epsilon = 1e-6);
    }
}

#[test]
fn test_floating_layer_falls_back_to_midpoint() {
    // Second layer hovers above the block without touching it or either face
    let floating = Layer::boxed("Floating", 0xffaa00, (10.0, 10.0, 10.0), (0.0, 25.0, 0.0));
    let mesh = generate_swept_mesh(&[block(), floating], 50.0).unwrap();

    let solution = solve_steady_state_heat(&mesh, 100.0, 0.0);
    assert!(!solution.is_converged());
    assert!(matches!(
        solution.fallback_error(),
        Some(SolveError::Singular { .. }) | Some(SolveError::IllConditioned { .. })
    ));
    assert_eq!(solution.temperatures.len(), mesh.num_nodes());
    assert!(solution.temperatures.iter().all(|&t| t == 50.0));
}

#[test]
fn test_welded_stack_from_config() {
    let text = r#"
[mesh]
density = 50.0

[boundary]
high_temp = 100.0
low_temp = 0.0

[solver]
parallel_assembly = true

[[layers]]
name = "Substrate (Si)"
color = 0x888888
dimensions = { w = 100.0, h = 20.0, d = 100.0 }
position = { x = 0.0, y = -10.0, z = 0.0 }

[[layers]]
name = "Oxide (SiO2)"
color = 0x00aaff
dimensions = { w = 100.0, h = 10.0, d = 100.0 }
position = { x = 0.0, y = 5.0, z = 0.0 }
"#;
    let config = SimulationConfig::from_toml_str(text).unwrap();
    let (mesh, solution) = run_pipeline(&config).unwrap();

    assert_eq!(mesh.num_nodes(), 27);
    assert!(solution.is_converged());

    // Welded into one body, the profile stays linear through both layers
    for (p, t) in mesh.geometry.nodes.iter().zip(solution.temperatures.iter()) {
        assert_relative_eq!(*t, 50.0 - p.x, epsilon = 1e-6);
    }

    let field = mesh.field_data.get_field("Temperature").unwrap();
    let range = field.range().unwrap();
    assert_relative_eq!(range.min, 0.0, epsilon = 1e-6);
    assert_relative_eq!(range.max, 100.0, epsilon = 1e-6);
    assert_relative_eq!(range.mean, 50.0, epsilon = 1e-6);

    let flux = mesh.field_data.get_element_vector_field("HeatFlux").unwrap();
    assert_eq!(flux.len(), mesh.num_elements());
    assert_relative_eq!(flux.max_magnitude(), 1.0, epsilon = 1e-6);
}

#[test]
fn test_device_stack_config_solves() {
    let config = SimulationConfig::from_file("configs/device_stack.toml").unwrap();
    let (mesh, solution) = run_pipeline(&config).unwrap();

    assert!(solution.is_converged(), "fallback: {:?}", solution.fallback_error());
    assert!(solution.degenerate_elements.is_empty());
    assert_eq!(solution.temperatures.len(), mesh.num_nodes());

    let range = solution.temperature_field().range().unwrap();
    assert_relative_eq!(range.max, 100.0, epsilon = 1e-6);
    assert_relative_eq!(range.min, 0.0, epsilon = 1e-6);
}
