//! Configuration management for layer-stack thermal runs
//!
//! Reads TOML configuration files describing the layer stack, mesh
//! resolution, fixed-temperature faces and solver settings.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use crate::errors::ConfigError;
use crate::fem::{BoundaryAxis, DEFAULT_BOUNDARY_TOLERANCE, DEFAULT_CONDUCTIVITY, DEFAULT_PENALTY};
use crate::layer::Layer;
use crate::linalg::{DEFAULT_MIN_PIVOT_RATIO, DEFAULT_RESIDUAL_TOLERANCE};
use crate::mesh::DEFAULT_WELD_DECIMALS;
use crate::mesh_generator::{SweptMeshGenerator, DEFAULT_DENSITY};
use crate::physics::{SteadyStateThermal, ThermalConfig};

/// Main simulation configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulationConfig {
    #[serde(default)]
    pub mesh: MeshConfig,
    pub boundary: BoundaryConfig,
    #[serde(default)]
    pub solver: SolverConfig,
    /// Ordered layer stack, bottom to top
    #[serde(default)]
    pub layers: Vec<Layer>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MeshConfig {
    /// Target in-plane cell size
    #[serde(default = "default_density")]
    pub density: f64,
    /// Decimal places at which coincident nodes are welded
    #[serde(default = "default_weld_decimals")]
    pub weld_decimals: u32,
}

fn default_density() -> f64 { DEFAULT_DENSITY }
fn default_weld_decimals() -> u32 { DEFAULT_WELD_DECIMALS }

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            density: default_density(),
            weld_decimals: default_weld_decimals(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BoundaryConfig {
    /// Temperature of the minimum face
    pub high_temp: f64,
    /// Temperature of the maximum face
    pub low_temp: f64,
    #[serde(default)]
    pub axis: BoundaryAxis,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

fn default_tolerance() -> f64 { DEFAULT_BOUNDARY_TOLERANCE }

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SolverConfig {
    #[serde(default = "default_penalty")]
    pub penalty: f64,
    #[serde(default = "default_conductivity")]
    pub conductivity: f64,
    #[serde(default = "default_min_pivot_ratio")]
    pub min_pivot_ratio: f64,
    #[serde(default = "default_residual_tolerance")]
    pub residual_tolerance: f64,
    #[serde(default)]
    pub parallel_assembly: bool,
}

fn default_penalty() -> f64 { DEFAULT_PENALTY }
fn default_conductivity() -> f64 { DEFAULT_CONDUCTIVITY }
fn default_min_pivot_ratio() -> f64 { DEFAULT_MIN_PIVOT_RATIO }
fn default_residual_tolerance() -> f64 { DEFAULT_RESIDUAL_TOLERANCE }

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            penalty: default_penalty(),
            conductivity: default_conductivity(),
            min_pivot_ratio: default_min_pivot_ratio(),
            residual_tolerance: default_residual_tolerance(),
            parallel_assembly: false,
        }
    }
}

impl SimulationConfig {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject numbers the mesher or solver cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |name: &str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!("{} must be positive, got {}", name, value)))
            }
        };

        positive("mesh.density", self.mesh.density)?;
        positive("boundary.tolerance", self.boundary.tolerance)?;
        positive("solver.penalty", self.solver.penalty)?;
        positive("solver.conductivity", self.solver.conductivity)?;
        positive("solver.residual_tolerance", self.solver.residual_tolerance)?;

        if !(self.solver.min_pivot_ratio >= 0.0 && self.solver.min_pivot_ratio < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "solver.min_pivot_ratio must lie in [0, 1), got {}",
                self.solver.min_pivot_ratio
            )));
        }
        if !self.boundary.high_temp.is_finite() || !self.boundary.low_temp.is_finite() {
            return Err(ConfigError::Invalid("boundary temperatures must be finite".to_string()));
        }
        if self.mesh.weld_decimals > 12 {
            return Err(ConfigError::Invalid(format!(
                "mesh.weld_decimals must be at most 12, got {}",
                self.mesh.weld_decimals
            )));
        }
        for layer in &self.layers {
            layer
                .validate()
                .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        }
        Ok(())
    }

    /// Mesh generator with the configured weld precision
    pub fn mesh_generator(&self) -> SweptMeshGenerator {
        SweptMeshGenerator::new().with_weld_decimals(self.mesh.weld_decimals)
    }

    /// Solver settings for the steady-state run
    pub fn thermal_config(&self) -> ThermalConfig {
        ThermalConfig {
            conductivity: self.solver.conductivity,
            penalty: self.solver.penalty,
            axis: self.boundary.axis,
            tolerance: self.boundary.tolerance,
            parallel_assembly: self.solver.parallel_assembly,
            min_pivot_ratio: self.solver.min_pivot_ratio,
            residual_tolerance: self.solver.residual_tolerance,
        }
    }

    pub fn thermal_solver(&self) -> SteadyStateThermal {
        SteadyStateThermal::new(self.thermal_config())
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        println!("═══════════════════════════════════════════════════════════════");
        println!("  Layer Stack Configuration");
        println!("═══════════════════════════════════════════════════════════════");
        println!("Layers ({}):", self.layers.len());
        for layer in &self.layers {
            let d = &layer.dimensions;
            let p = &layer.position;
            println!("  {:<16} {:>6.1} × {:>5.1} × {:>6.1} at ({:.1}, {:.1}, {:.1})  #{:06x}",
                layer.name, d.w, d.h, d.d, p.x, p.y, p.z, layer.color);
        }

        println!("\nMesh:");
        println!("  Density: {:.2}", self.mesh.density);
        println!("  Weld precision: {} decimals", self.mesh.weld_decimals);

        println!("\nBoundary Conditions:");
        println!("  Min-{:?} face: {:.2}", self.boundary.axis, self.boundary.high_temp);
        println!("  Max-{:?} face: {:.2}", self.boundary.axis, self.boundary.low_temp);
        println!("  Tolerance: {:.1e}", self.boundary.tolerance);

        println!("\nSolver:");
        println!("  Conductivity: {:.3}", self.solver.conductivity);
        println!("  Penalty: {:.1e}", self.solver.penalty);
        println!("  Min pivot ratio: {:.1e}", self.solver.min_pivot_ratio);
        println!("  Residual tolerance: {:.1e}", self.solver.residual_tolerance);
        println!("  Parallel assembly: {}", self.solver.parallel_assembly);

        println!("═══════════════════════════════════════════════════════════════\n");
    }
}
