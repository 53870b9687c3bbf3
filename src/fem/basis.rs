use nalgebra::{Matrix3, Point3, SMatrix};

/// Natural coordinates of the wedge centroid (ξ, η, ζ)
pub const CENTROID: [f64; 3] = [1.0 / 3.0, 1.0 / 3.0, 0.0];

/// det(J) at or below this multiple of ‖J‖³ counts as zero
pub const DEGENERATE_TOLERANCE: f64 = f64::EPSILON * 1e3;

/// Linear shape functions for a 6-node wedge element
///
/// Natural coordinates: (ξ, η) on the reference triangle, ζ ∈ [-1, 1]
/// through the thickness.
///
/// ```text
/// N0 = (1-ξ-η)(1-ζ)/2    N3 = (1-ξ-η)(1+ζ)/2
/// N1 = ξ(1-ζ)/2          N4 = ξ(1+ζ)/2
/// N2 = η(1-ζ)/2          N5 = η(1+ζ)/2
/// ```
pub struct Wedge6Basis;

impl Wedge6Basis {
    /// Evaluate all 6 shape functions at a natural-coordinate point
    pub fn shape_functions(xi: f64, eta: f64, zeta: f64) -> [f64; 6] {
        let l0 = 1.0 - xi - eta;
        let lo = 0.5 * (1.0 - zeta);
        let hi = 0.5 * (1.0 + zeta);
        [l0 * lo, xi * lo, eta * lo, l0 * hi, xi * hi, eta * hi]
    }

    /// Shape function derivatives with respect to (ξ, η, ζ)
    ///
    /// Row 0: d/dξ, row 1: d/dη, row 2: d/dζ
    pub fn shape_derivatives(xi: f64, eta: f64, zeta: f64) -> SMatrix<f64, 3, 6> {
        let l0 = 1.0 - xi - eta;
        let lo = 0.5 * (1.0 - zeta);
        let hi = 0.5 * (1.0 + zeta);
        SMatrix::<f64, 3, 6>::from_row_slice(&[
            -lo, lo, 0.0, -hi, hi, 0.0,
            -lo, 0.0, lo, -hi, 0.0, hi,
            -0.5 * l0, -0.5 * xi, -0.5 * eta, 0.5 * l0, 0.5 * xi, 0.5 * eta,
        ])
    }

    /// Shape function derivatives at the centroid
    ///
    /// Constant for every element; this is the single integration point.
    pub fn centroid_derivatives() -> SMatrix<f64, 3, 6> {
        let sixth = 1.0 / 6.0;
        SMatrix::<f64, 3, 6>::from_row_slice(&[
            -0.5, 0.5, 0.0, -0.5, 0.5, 0.0,
            -0.5, 0.0, 0.5, -0.5, 0.0, 0.5,
            -sixth, -sixth, -sixth, sixth, sixth, sixth,
        ])
    }

    /// Node coordinates as a 6×3 matrix (one row per node)
    pub fn coordinate_matrix(nodes: &[Point3<f64>; 6]) -> SMatrix<f64, 6, 3> {
        SMatrix::<f64, 6, 3>::from_fn(|i, j| nodes[i][j])
    }

    /// Jacobian J = dN/d(ξ,η,ζ) · X at the centroid
    ///
    /// Row r holds d(x, y, z)/d(natural coordinate r).
    pub fn jacobian(nodes: &[Point3<f64>; 6]) -> Matrix3<f64> {
        Self::centroid_derivatives() * Self::coordinate_matrix(nodes)
    }

    /// True when det(J) is zero up to rounding for an element of this size
    ///
    /// The threshold scales with ‖J‖³, so a wedge whose top face sits on its
    /// bottom face is caught even when rounding leaves a tiny positive det(J).
    pub fn is_degenerate(jacobian: &Matrix3<f64>) -> bool {
        let scale = jacobian.norm().powi(3);
        !(jacobian.determinant() > DEGENERATE_TOLERANCE * scale)
    }

    /// Element volume under single-point integration (det J · weight 1)
    pub fn element_volume(nodes: &[Point3<f64>; 6]) -> f64 {
        Self::jacobian(nodes).determinant()
    }
}
