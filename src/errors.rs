//! Error types shared across the meshing and solve pipeline.

use thiserror::Error;

/// Malformed input handed to a polygon triangulator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TriangulationError {
    #[error("only 2D coordinates are supported, got dimensionality {0}")]
    UnsupportedDimension(usize),
    #[error("coordinate list length {len} is not a multiple of dimensionality {dim}")]
    RaggedCoordinates { len: usize, dim: usize },
    #[error("ring starting at vertex {start} has {count} vertices, at least 3 required")]
    DegenerateRing { start: usize, count: usize },
    #[error("hole offset {offset} is out of range for {vertices} vertices")]
    InvalidHoleOffset { offset: usize, vertices: usize },
    #[error("polygon with {vertices} vertices produced no triangles")]
    Failed { vertices: usize },
}

/// Rejected layer stack or meshing parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
    #[error("layer '{layer}' has invalid geometry: {reason}")]
    InvalidLayerGeometry { layer: String, reason: String },
    #[error("mesh density must be positive and finite, got {0}")]
    InvalidDensity(f64),
    #[error("triangulation failed: {0}")]
    Triangulation(#[from] TriangulationError),
}

/// Element whose Jacobian determinant is not positive.
///
/// Such an element contributes nothing to the global system.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("element {element} has non-positive Jacobian determinant {det_j:.3e}")]
pub struct DegenerateElement {
    /// Element index in the mesh (0 for standalone stiffness evaluations)
    pub element: usize,
    pub det_j: f64,
}

/// Linear solve failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    #[error("system matrix is {rows}x{cols} but right-hand side has {rhs} entries")]
    DimensionMismatch { rows: usize, cols: usize, rhs: usize },
    #[error("system matrix is singular (zero pivot at row {row})")]
    Singular { row: usize },
    #[error("system matrix is ill-conditioned (pivot ratio {ratio:.3e} below {threshold:.3e})")]
    IllConditioned { ratio: f64, threshold: f64 },
    #[error("solution contains non-finite values")]
    NonFinite,
    #[error("element {element} references node {node}, but the mesh has {num_nodes} nodes")]
    InvalidConnectivity { element: usize, node: usize, num_nodes: usize },
    #[error("relative residual {relative_residual:.3e} exceeds tolerance {tolerance:.3e}")]
    ResidualTooLarge { relative_residual: f64, tolerance: f64 },
}

/// Configuration loading or validation failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level error for the end-to-end pipeline.
#[derive(Debug, Error)]
pub enum StackError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Mesh(#[from] MeshError),
}
