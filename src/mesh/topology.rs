/// A 6-node linear triangular prism (Wedge6)
///
/// Node numbering:
/// Bottom triangle: 0, 1, 2
/// Top triangle:    3, 4, 5
///
/// Node `i + 3` sits directly above node `i` (+y). The bottom triangle is
/// clockwise in the (x, z) plane, which keeps the Jacobian determinant
/// positive.
#[derive(Debug, Clone, PartialEq)]
pub struct Wedge6Element {
    /// Global node indices for this element (6 nodes)
    pub nodes: [usize; 6],
    /// Display color of the originating layer
    pub color: u32,
    /// Index of the originating layer in the input stack
    pub layer: usize,
}

impl Wedge6Element {
    pub fn new(nodes: [usize; 6], color: u32, layer: usize) -> Self {
        Self { nodes, color, layer }
    }

    /// Bottom triangle node indices
    pub fn bottom(&self) -> [usize; 3] {
        [self.nodes[0], self.nodes[1], self.nodes[2]]
    }

    /// Top triangle node indices
    pub fn top(&self) -> [usize; 3] {
        [self.nodes[3], self.nodes[4], self.nodes[5]]
    }
}

/// Connectivity information for the mesh
#[derive(Debug, Clone)]
pub struct Connectivity {
    pub wedge6_elements: Vec<Wedge6Element>,
}

impl Connectivity {
    pub fn new() -> Self {
        Self {
            wedge6_elements: Vec::new(),
        }
    }

    pub fn add_element(&mut self, element: Wedge6Element) {
        self.wedge6_elements.push(element);
    }

    pub fn num_elements(&self) -> usize {
        self.wedge6_elements.len()
    }

    /// Elements generated from one layer
    pub fn elements_of_layer(&self, layer: usize) -> impl Iterator<Item = &Wedge6Element> {
        self.wedge6_elements.iter().filter(move |e| e.layer == layer)
    }

    /// For each node, whether at least one element references it
    ///
    /// Indices at or beyond `num_nodes` are ignored; see
    /// [`Connectivity::first_invalid_node`].
    pub fn referenced_nodes(&self, num_nodes: usize) -> Vec<bool> {
        let mut used = vec![false; num_nodes];
        for elem in &self.wedge6_elements {
            for &node in &elem.nodes {
                if let Some(flag) = used.get_mut(node) {
                    *flag = true;
                }
            }
        }
        used
    }

    /// First `(element, node)` pair whose node index is out of range
    pub fn first_invalid_node(&self, num_nodes: usize) -> Option<(usize, usize)> {
        self.wedge6_elements.iter().enumerate().find_map(|(element, elem)| {
            elem.nodes
                .iter()
                .find(|&&node| node >= num_nodes)
                .map(|&node| (element, node))
        })
    }
}

impl Default for Connectivity {
    fn default() -> Self {
        Self::new()
    }
}
