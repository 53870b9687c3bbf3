use log::debug;

use crate::errors::MeshError;
use crate::layer::Layer;
use crate::mesh::{Mesh, NodeWelder, Wedge6Element, DEFAULT_WELD_DECIMALS};
use crate::triangulate::{EarClipping, Triangulator};

/// Default in-plane cell size
pub const DEFAULT_DENSITY: f64 = 10.0;

/// Swept wedge mesh generator for stacks of rectangular layers
///
/// Each layer footprint (x-z plane) is split into a grid of rectangular
/// cells, every cell is triangulated, and each triangle is swept from the
/// layer's bottom face to its top face into one Wedge6 element. Nodes are
/// welded across cells and across abutting layers.
pub struct SweptMeshGenerator<T: Triangulator = EarClipping> {
    triangulator: T,
    weld_decimals: u32,
}

impl SweptMeshGenerator<EarClipping> {
    pub fn new() -> Self {
        Self {
            triangulator: EarClipping,
            weld_decimals: DEFAULT_WELD_DECIMALS,
        }
    }
}

impl Default for SweptMeshGenerator<EarClipping> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Triangulator> SweptMeshGenerator<T> {
    /// Use a different polygon triangulator
    pub fn with_triangulator<U: Triangulator>(self, triangulator: U) -> SweptMeshGenerator<U> {
        SweptMeshGenerator {
            triangulator,
            weld_decimals: self.weld_decimals,
        }
    }

    /// Decimal places at which coincident nodes are merged
    pub fn with_weld_decimals(mut self, decimals: u32) -> Self {
        self.weld_decimals = decimals;
        self
    }

    /// Generate the swept mesh for a layer stack
    ///
    /// # Arguments
    /// * `layers` - Ordered layer stack
    /// * `density` - Target in-plane cell size
    ///
    /// # Returns
    /// Mesh with welded nodes and `2 * nx * nz` wedges per layer
    ///
    /// # Errors
    /// Every layer is validated before any node is created; the first
    /// invalid layer or a non-positive density aborts generation.
    pub fn generate(&self, layers: &[Layer], density: f64) -> Result<Mesh, MeshError> {
        if !density.is_finite() || density <= 0.0 {
            return Err(MeshError::InvalidDensity(density));
        }
        for layer in layers {
            layer.validate()?;
        }

        let mut mesh = Mesh::new();
        let mut welder = NodeWelder::new(self.weld_decimals);

        for (layer_idx, layer) in layers.iter().enumerate() {
            let elements_before = mesh.num_elements();
            self.sweep_layer(&mut mesh, &mut welder, layer_idx, layer, density)?;
            debug!(
                "layer '{}': {} wedges, {} nodes so far",
                layer.name,
                mesh.num_elements() - elements_before,
                mesh.num_nodes()
            );
        }

        Ok(mesh)
    }

    fn sweep_layer(
        &self,
        mesh: &mut Mesh,
        welder: &mut NodeWelder,
        layer_idx: usize,
        layer: &Layer,
        density: f64,
    ) -> Result<(), MeshError> {
        let ext = layer.extents();
        let (num_div_x, num_div_z) = layer.divisions(density);
        let step_x = layer.dimensions.w / num_div_x as f64;
        let step_z = layer.dimensions.d / num_div_z as f64;

        for i in 0..num_div_x {
            for j in 0..num_div_z {
                let x0 = ext.x0 + i as f64 * step_x;
                let z0 = ext.z0 + j as f64 * step_z;
                let x1 = x0 + step_x;
                let z1 = z0 + step_z;

                let corners = [[x0, z0], [x1, z0], [x1, z1], [x0, z1]];
                let flat: Vec<f64> = corners.iter().flatten().copied().collect();
                let triangles = self.triangulator.triangulate(&flat, &[], 2)?;

                let bottom = corners.map(|[x, z]| {
                    welder.node_index(&mut mesh.geometry, x, ext.y_bottom, z)
                });
                let top = corners.map(|[x, z]| {
                    welder.node_index(&mut mesh.geometry, x, ext.y_top, z)
                });

                // Triangles come back counter-clockwise in (x, z); taking
                // (i1, i3, i2) flips the bottom face so that det(J) > 0
                for tri in triangles.chunks_exact(3) {
                    let (i1, i2, i3) = (tri[0], tri[1], tri[2]);
                    mesh.connectivity.add_element(Wedge6Element::new(
                        [bottom[i1], bottom[i3], bottom[i2], top[i1], top[i3], top[i2]],
                        layer.color,
                        layer_idx,
                    ));
                }
            }
        }

        Ok(())
    }
}

/// Generate a swept mesh with the default triangulator and weld precision
pub fn generate_swept_mesh(layers: &[Layer], density: f64) -> Result<Mesh, MeshError> {
    SweptMeshGenerator::new().generate(layers, density)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TriangulationError;
    use crate::fem::Wedge6Basis;

    fn substrate() -> Layer {
        Layer::boxed("Substrate (Si)", 0x888888, (100.0, 20.0, 100.0), (0.0, 0.0, 0.0))
    }

    #[test]
    fn test_single_layer_counts() {
        let mesh = generate_swept_mesh(&[substrate()], 50.0).unwrap();

        assert_eq!(mesh.num_elements(), 8);
        assert_eq!(mesh.num_nodes(), 18);
    }

    #[test]
    fn test_element_count_formula() {
        let layer = Layer::boxed("Strip", 0xffaa00, (35.0, 5.0, 12.0), (1.0, 2.0, 3.0));
        for &density in &[1.0, 4.0, 10.0, 100.0] {
            let mesh = generate_swept_mesh(std::slice::from_ref(&layer), density).unwrap();
            let (nx, nz) = layer.divisions(density);
            assert_eq!(mesh.num_elements(), 2 * nx * nz);
            assert_eq!(mesh.num_nodes(), 2 * (nx + 1) * (nz + 1));
        }
    }

    #[test]
    fn test_elements_carry_layer_tags() {
        let layers = [
            substrate(),
            Layer::boxed("Oxide (SiO2)", 0x00aaff, (100.0, 10.0, 100.0), (0.0, 15.0, 0.0)),
        ];
        let mesh = generate_swept_mesh(&layers, 50.0).unwrap();

        assert_eq!(mesh.connectivity.elements_of_layer(1).count(), 8);
        assert!(mesh
            .connectivity
            .elements_of_layer(1)
            .all(|e| e.color == 0x00aaff));
    }

    #[test]
    fn test_vertical_alignment_and_positive_jacobian() {
        let mesh = generate_swept_mesh(&[substrate()], 25.0).unwrap();

        for (idx, elem) in mesh.connectivity.wedge6_elements.iter().enumerate() {
            for i in 0..3 {
                let b = mesh.geometry.nodes[elem.nodes[i]];
                let t = mesh.geometry.nodes[elem.nodes[i + 3]];
                assert_eq!((b.x, b.z), (t.x, t.z));
                assert!(t.y > b.y);
            }
            let det_j = Wedge6Basis::jacobian(&mesh.element_coordinates(idx)).determinant();
            assert!(det_j > 0.0, "element {} has det(J) = {}", idx, det_j);
        }
    }

    #[test]
    fn test_rejects_invalid_input() {
        let flat = Layer::boxed("Flat", 0, (10.0, 10.0, -1.0), (0.0, 0.0, 0.0));
        assert!(matches!(
            generate_swept_mesh(&[substrate(), flat], 10.0),
            Err(MeshError::InvalidLayerGeometry { .. })
        ));
        assert_eq!(
            generate_swept_mesh(&[substrate()], 0.0).unwrap_err(),
            MeshError::InvalidDensity(0.0)
        );
    }

    struct FailingTriangulator;

    impl Triangulator for FailingTriangulator {
        fn triangulate(&self, _: &[f64], _: &[usize], _: usize) -> Result<Vec<usize>, TriangulationError> {
            Err(TriangulationError::Failed { vertices: 4 })
        }
    }

    #[test]
    fn test_triangulator_errors_propagate() {
        let generator = SweptMeshGenerator::new().with_triangulator(FailingTriangulator);
        assert_eq!(
            generator.generate(&[substrate()], 50.0).unwrap_err(),
            MeshError::Triangulation(TriangulationError::Failed { vertices: 4 })
        );
    }

    #[test]
    fn test_empty_stack() {
        let mesh = generate_swept_mesh(&[], 10.0).unwrap();
        assert_eq!(mesh.num_nodes(), 0);
        assert_eq!(mesh.num_elements(), 0);
    }
}
