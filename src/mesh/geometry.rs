use std::collections::HashMap;
use nalgebra::Point3;
use super::topology::Connectivity;
use super::fields::FieldData;

/// Default number of decimal places at which coincident nodes are welded
pub const DEFAULT_WELD_DECIMALS: u32 = 4;

/// Geometric information for the mesh
#[derive(Debug, Clone)]
pub struct Geometry {
    /// Node coordinates
    pub nodes: Vec<Point3<f64>>,
}

impl Geometry {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn add_node(&mut self, x: f64, y: f64, z: f64) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(Point3::new(x, y, z));
        idx
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn get_node(&self, idx: usize) -> Option<&Point3<f64>> {
        self.nodes.get(idx)
    }

    /// Axis-aligned bounding box `(min, max)`, `None` for an empty geometry
    pub fn bounds(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = *self.nodes.first()?;
        let (min, max) = self.nodes.iter().fold((first, first), |(lo, hi), p| {
            (
                Point3::new(lo.x.min(p.x), lo.y.min(p.y), lo.z.min(p.z)),
                Point3::new(hi.x.max(p.x), hi.y.max(p.y), hi.z.max(p.z)),
            )
        });
        Some((min, max))
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed-precision integer key of a point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeldKey(i64, i64, i64);

/// Spatial hash that hands out one node index per weld cell
///
/// Coordinates are scaled by `10^decimals` and rounded before hashing, so two
/// points that agree to `decimals` places map to the same node.
#[derive(Debug, Clone)]
pub struct NodeWelder {
    scale: f64,
    index: HashMap<WeldKey, usize>,
}

impl NodeWelder {
    pub fn new(decimals: u32) -> Self {
        Self {
            scale: 10f64.powi(decimals as i32),
            index: HashMap::new(),
        }
    }

    pub fn key(&self, x: f64, y: f64, z: f64) -> WeldKey {
        WeldKey(
            (x * self.scale).round() as i64,
            (y * self.scale).round() as i64,
            (z * self.scale).round() as i64,
        )
    }

    /// Index of the node at (x, y, z), creating it in `geometry` on first use
    pub fn node_index(&mut self, geometry: &mut Geometry, x: f64, y: f64, z: f64) -> usize {
        let key = self.key(x, y, z);
        *self
            .index
            .entry(key)
            .or_insert_with(|| geometry.add_node(x, y, z))
    }

    /// Number of distinct weld cells seen so far
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl Default for NodeWelder {
    fn default() -> Self {
        Self::new(DEFAULT_WELD_DECIMALS)
    }
}

/// Complete mesh with geometry and topology
#[derive(Debug, Clone)]
pub struct Mesh {
    pub geometry: Geometry,
    pub connectivity: Connectivity,
    pub field_data: FieldData,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            geometry: Geometry::new(),
            connectivity: Connectivity::new(),
            field_data: FieldData::new(),
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.geometry.num_nodes()
    }

    pub fn num_elements(&self) -> usize {
        self.connectivity.num_elements()
    }

    /// The six node coordinates of an element, in connectivity order
    pub fn element_coordinates(&self, element: usize) -> [Point3<f64>; 6] {
        let nodes = &self.connectivity.wedge6_elements[element].nodes;
        nodes.map(|n| self.geometry.nodes[n])
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}
