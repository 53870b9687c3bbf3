use log::warn;
use nalgebra::{Matrix3, Matrix6, Point3, SMatrix, Vector3, Vector6};
use crate::errors::DegenerateElement;
use crate::fem::Wedge6Basis;

/// Integration weight of the single centroid point (triangle area 1/2 · ζ span 2)
const CENTROID_WEIGHT: f64 = 1.0;

/// Default thermal conductivity k
pub const DEFAULT_CONDUCTIVITY: f64 = 1.0;

/// Element matrix computation for Wedge6 elements
pub struct ElementMatrix;

impl ElementMatrix {
    /// Physical-space shape function gradients B = J⁻¹ · dN/d(ξ,η,ζ)
    ///
    /// # Returns
    /// `(B, det J)`, or the degenerate element if det(J) is not positive
    /// beyond rounding (see [`Wedge6Basis::is_degenerate`])
    #[allow(non_snake_case)]
    pub fn gradient_matrix(
        nodes: &[Point3<f64>; 6],
    ) -> Result<(SMatrix<f64, 3, 6>, f64), DegenerateElement> {
        let dN = Wedge6Basis::centroid_derivatives();
        let J: Matrix3<f64> = dN * Wedge6Basis::coordinate_matrix(nodes);
        let det_J = J.determinant();

        if Wedge6Basis::is_degenerate(&J) {
            return Err(DegenerateElement { element: 0, det_j: det_J });
        }

        let inv_J = J
            .try_inverse()
            .ok_or(DegenerateElement { element: 0, det_j: det_J })?;

        Ok((inv_J * dN, det_J))
    }

    /// Compute element conductivity matrix for steady heat conduction
    ///
    /// K_e = Bᵀ B · k · det(J) · w
    ///
    /// Single-point integration at the wedge centroid (ξ=1/3, η=1/3, ζ=0).
    ///
    /// # Arguments
    /// * `nodes` - The 6 node coordinates (bottom triangle, then top)
    /// * `conductivity` - Thermal conductivity k
    ///
    /// # Returns
    /// 6×6 symmetric element matrix, or the degenerate element when the
    /// Jacobian determinant is not positive
    #[allow(non_snake_case)]
    pub fn thermal_stiffness(
        nodes: &[Point3<f64>; 6],
        conductivity: f64,
    ) -> Result<Matrix6<f64>, DegenerateElement> {
        let (B, det_J) = Self::gradient_matrix(nodes)?;
        Ok(B.transpose() * B * (conductivity * det_J * CENTROID_WEIGHT))
    }

    /// Element conductivity matrix, zero for degenerate geometry
    ///
    /// A degenerate element is logged and tagged with `element`; its zero
    /// matrix leaves the rest of the system untouched.
    pub fn thermal_stiffness_or_zero(
        element: usize,
        nodes: &[Point3<f64>; 6],
        conductivity: f64,
    ) -> (Matrix6<f64>, Option<DegenerateElement>) {
        match Self::thermal_stiffness(nodes, conductivity) {
            Ok(k_elem) => (k_elem, None),
            Err(degenerate) => {
                let degenerate = DegenerateElement { element, ..degenerate };
                warn!("{}; skipping its stiffness contribution", degenerate);
                (Matrix6::zeros(), Some(degenerate))
            }
        }
    }

    /// Heat flux q = -k ∇T at the element centroid
    ///
    /// # Arguments
    /// * `nodes` - The 6 node coordinates
    /// * `temperatures` - Nodal temperatures in the same order
    /// * `conductivity` - Thermal conductivity k
    #[allow(non_snake_case)]
    pub fn heat_flux(
        nodes: &[Point3<f64>; 6],
        temperatures: &[f64; 6],
        conductivity: f64,
    ) -> Result<Vector3<f64>, DegenerateElement> {
        let (B, _) = Self::gradient_matrix(nodes)?;
        let T = Vector6::from_row_slice(temperatures);
        Ok(-(B * T) * conductivity)
    }
}

/// Element conductivity matrix with unit conductivity
///
/// Zero matrix (plus a logged warning) for non-positive det(J).
pub fn element_stiffness(nodes: &[Point3<f64>; 6]) -> Matrix6<f64> {
    ElementMatrix::thermal_stiffness_or_zero(0, nodes, DEFAULT_CONDUCTIVITY).0
}

/// Heat flux at the element centroid
pub fn element_heat_flux(
    nodes: &[Point3<f64>; 6],
    temperatures: &[f64; 6],
    conductivity: f64,
) -> Result<Vector3<f64>, DegenerateElement> {
    ElementMatrix::heat_flux(nodes, temperatures, conductivity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Wedge over triangle (0,0)-(0,w)-(w,0) in (x, z), y from 0 to h
    fn wedge(w: f64, h: f64) -> [Point3<f64>; 6] {
        [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, w),
            Point3::new(w, 0.0, 0.0),
            Point3::new(0.0, h, 0.0),
            Point3::new(0.0, h, w),
            Point3::new(w, h, 0.0),
        ]
    }

    #[test]
    #[allow(non_snake_case)]
    fn test_stiffness_symmetry() {
        let K = ElementMatrix::thermal_stiffness(&wedge(50.0, 20.0), 1.0).unwrap();

        for i in 0..6 {
            for j in 0..6 {
                assert_relative_eq!(K[(i, j)], K[(j, i)], epsilon = 1e-12);
            }
        }
    }

    #[test]
    #[allow(non_snake_case)]
    fn test_stiffness_rows_sum_to_zero() {
        let K = ElementMatrix::thermal_stiffness(&wedge(3.0, 1.5), 2.0).unwrap();

        for i in 0..6 {
            assert!(K[(i, i)] > 0.0, "Diagonal entry {} is not positive", i);
            let row_sum: f64 = (0..6).map(|j| K[(i, j)]).sum();
            assert_relative_eq!(row_sum, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    #[allow(non_snake_case)]
    fn test_stiffness_scales_with_conductivity() {
        let nodes = wedge(1.0, 1.0);
        let K1 = ElementMatrix::thermal_stiffness(&nodes, 1.0).unwrap();
        let K3 = ElementMatrix::thermal_stiffness(&nodes, 3.0).unwrap();

        for i in 0..6 {
            for j in 0..6 {
                assert_relative_eq!(K3[(i, j)], 3.0 * K1[(i, j)], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_inverted_element_gives_zero_matrix() {
        let mut nodes = wedge(1.0, 1.0);
        nodes.swap(1, 2);
        nodes.swap(4, 5);

        let err = ElementMatrix::thermal_stiffness(&nodes, 1.0).unwrap_err();
        assert!(err.det_j < 0.0);

        let (k_elem, degenerate) = ElementMatrix::thermal_stiffness_or_zero(7, &nodes, 1.0);
        assert_eq!(k_elem, Matrix6::zeros());
        assert_eq!(degenerate.map(|d| d.element), Some(7));
    }

    #[test]
    fn test_collapsed_element_gives_zero_matrix() {
        // Top face coincides with bottom face
        let nodes = wedge(1.0, 0.0);
        assert_eq!(element_stiffness(&nodes), Matrix6::zeros());

        let (_, degenerate) = ElementMatrix::thermal_stiffness_or_zero(0, &nodes, 1.0);
        assert_relative_eq!(degenerate.unwrap().det_j, 0.0);
    }

    #[test]
    fn test_collapsed_element_with_rounding_is_rejected() {
        // Same three nodes on both faces; the thickness row of J is rounding noise
        let bottom = [
            Point3::new(-50.0, -10.0, -50.0),
            Point3::new(-50.0, -10.0, 0.0),
            Point3::new(0.0, -10.0, -50.0),
        ];
        let nodes = [bottom[0], bottom[1], bottom[2], bottom[0], bottom[1], bottom[2]];

        let err = ElementMatrix::thermal_stiffness(&nodes, 1.0).unwrap_err();
        assert!(err.det_j.abs() < 1e-6);
        assert!(ElementMatrix::heat_flux(&nodes, &[1.0; 6], 1.0).is_err());
        assert_eq!(element_stiffness(&nodes), Matrix6::zeros());
    }

    #[test]
    fn test_thin_element_is_accepted() {
        let k_elem = ElementMatrix::thermal_stiffness(&wedge(1.0, 1e-6), 1.0).unwrap();
        assert!(k_elem[(0, 0)] > 0.0);
    }

    #[test]
    fn test_heat_flux_linear_field() {
        // T = 100 - 2x is reproduced exactly by linear shape functions
        let nodes = wedge(4.0, 2.0);
        let temps = nodes.map(|p| 100.0 - 2.0 * p.x);

        let q = ElementMatrix::heat_flux(&nodes, &temps, 1.5).unwrap();
        assert_relative_eq!(q.x, 3.0, epsilon = 1e-12);
        assert_relative_eq!(q.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(q.z, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_constant_field_has_no_flux() {
        let nodes = wedge(2.0, 1.0);
        let q = element_heat_flux(&nodes, &[25.0; 6], 1.0).unwrap();
        assert_relative_eq!(q.norm(), 0.0, epsilon = 1e-12);
    }
}
