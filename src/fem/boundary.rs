/// Boundary condition handling for FEM
///
/// Two opposite faces of the device carry fixed temperatures. The "high"
/// face is the set of nodes at the minimum coordinate along the boundary
/// axis, the "low" face the set at the maximum.

use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use crate::mesh::Mesh;

/// Default tolerance for matching nodes to an extreme coordinate
pub const DEFAULT_BOUNDARY_TOLERANCE: f64 = 1e-3;

/// Axis along which the two fixed-temperature faces are found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryAxis {
    #[default]
    X,
    Y,
    Z,
}

impl BoundaryAxis {
    pub fn component(&self, p: &Point3<f64>) -> f64 {
        match self {
            BoundaryAxis::X => p.x,
            BoundaryAxis::Y => p.y,
            BoundaryAxis::Z => p.z,
        }
    }
}

/// A fixed-temperature constraint on a set of nodes
#[derive(Debug, Clone, PartialEq)]
pub struct DirichletSet {
    pub nodes: Vec<usize>,
    pub value: f64,
}

/// Nodes on the two fixed-temperature faces
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundaryNodes {
    /// Nodes at the minimum coordinate
    pub high: Vec<usize>,
    /// Nodes at the maximum coordinate
    pub low: Vec<usize>,
}

impl BoundaryNodes {
    /// Scan all nodes for the extreme coordinates along `axis`
    ///
    /// A node within `tolerance` of the minimum goes to `high`; otherwise a
    /// node within `tolerance` of the maximum goes to `low`. An empty mesh
    /// yields two empty sets.
    pub fn find(mesh: &Mesh, axis: BoundaryAxis, tolerance: f64) -> Self {
        let nodes = &mesh.geometry.nodes;
        let (min, max) = nodes.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            let c = axis.component(p);
            (lo.min(c), hi.max(c))
        });

        let mut boundary = Self::default();
        for (node_id, p) in nodes.iter().enumerate() {
            let c = axis.component(p);
            if (c - min).abs() < tolerance {
                boundary.high.push(node_id);
            } else if (c - max).abs() < tolerance {
                boundary.low.push(node_id);
            }
        }
        boundary
    }

    /// Pair each face with its prescribed temperature
    pub fn with_temperatures(&self, high_temp: f64, low_temp: f64) -> [DirichletSet; 2] {
        [
            DirichletSet { nodes: self.high.clone(), value: high_temp },
            DirichletSet { nodes: self.low.clone(), value: low_temp },
        ]
    }

    /// Total number of constrained nodes
    pub fn len(&self) -> usize {
        self.high.len() + self.low.len()
    }

    pub fn is_empty(&self) -> bool {
        self.high.is_empty() && self.low.is_empty()
    }
}
