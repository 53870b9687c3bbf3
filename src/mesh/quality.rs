/// Mesh Quality Assessment
///
/// Measures Jacobian determinants of every wedge and flags elements that are
/// inverted or collapsed. Such elements contribute zero stiffness during
/// assembly, so a mesh with any of them leaves parts of the device thermally
/// disconnected.

use crate::fem::Wedge6Basis;
use crate::mesh::Mesh;
use rayon::prelude::*;

/// Element count above which the assessment runs in parallel
const PARALLEL_THRESHOLD: usize = 1000;

/// Mesh quality statistics
#[derive(Debug, Clone)]
pub struct MeshQuality {
    /// Minimum Jacobian determinant (should be > 0)
    pub min_jacobian: f64,
    /// Average Jacobian determinant
    pub avg_jacobian: f64,
    /// Maximum Jacobian determinant
    pub max_jacobian: f64,
    /// Number of elements whose det(J) is not positive beyond rounding
    pub num_inverted: usize,
    /// Indices of those elements
    pub inverted_elements: Vec<usize>,
    /// Sum of element volumes (det(J) of valid elements)
    pub total_volume: f64,
    /// Total elements
    pub total_elements: usize,
}

impl MeshQuality {
    /// Check if every element contributes to the global system
    pub fn is_acceptable(&self) -> bool {
        self.num_inverted == 0
    }

    /// Human-readable quality report
    pub fn report(&self) -> String {
        format!(
            "Mesh Quality: min_J={:.3e}, avg_J={:.3e}, max_J={:.3e}, inverted={}/{}, volume={:.3e}",
            self.min_jacobian,
            self.avg_jacobian,
            self.max_jacobian,
            self.num_inverted,
            self.total_elements,
            self.total_volume,
        )
    }

    /// Statistics from `(det J, degenerate)` pairs in element order
    fn from_determinants(dets: &[(f64, bool)]) -> Self {
        let mut min_jacobian = f64::INFINITY;
        let mut max_jacobian = f64::NEG_INFINITY;
        let mut sum_jacobian = 0.0;
        let mut total_volume = 0.0;
        let mut inverted_elements = Vec::new();

        for (idx, &(det_j, degenerate)) in dets.iter().enumerate() {
            if degenerate {
                inverted_elements.push(idx);
            } else {
                total_volume += det_j;
            }
            min_jacobian = min_jacobian.min(det_j);
            max_jacobian = max_jacobian.max(det_j);
            sum_jacobian += det_j;
        }

        let total_elements = dets.len();
        let avg_jacobian = if total_elements > 0 {
            sum_jacobian / total_elements as f64
        } else {
            0.0
        };

        Self {
            min_jacobian,
            avg_jacobian,
            max_jacobian,
            num_inverted: inverted_elements.len(),
            inverted_elements,
            total_volume,
            total_elements,
        }
    }
}

/// Assess mesh quality by computing Jacobian determinants for all elements
///
/// Uses parallel computation for large meshes (>1000 elements)
pub fn assess_mesh_quality(mesh: &Mesh) -> MeshQuality {
    let element_det = |idx: usize| {
        let jacobian = Wedge6Basis::jacobian(&mesh.element_coordinates(idx));
        (jacobian.determinant(), Wedge6Basis::is_degenerate(&jacobian))
    };

    let dets: Vec<(f64, bool)> = if mesh.num_elements() > PARALLEL_THRESHOLD {
        (0..mesh.num_elements()).into_par_iter().map(element_det).collect()
    } else {
        (0..mesh.num_elements()).map(element_det).collect()
    };

    MeshQuality::from_determinants(&dets)
}
