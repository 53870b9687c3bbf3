use nalgebra::Matrix6;
use sprs::{CsMat, TriMat};
use rayon::prelude::*;
use crate::errors::DegenerateElement;
use crate::fem::{DirichletSet, ElementMatrix};
use crate::mesh::Mesh;

/// Default penalty coefficient for fixed-temperature constraints
pub const DEFAULT_PENALTY: f64 = 1e12;

/// One element's share of the global system
#[derive(Debug, Clone)]
pub struct ElementContribution {
    /// Global node indices the local matrix scatters into
    pub nodes: [usize; 6],
    /// Local 6×6 conductivity matrix (zero for degenerate geometry)
    pub matrix: Matrix6<f64>,
    pub degenerate: Option<DegenerateElement>,
}

/// Accumulator for one solve's global system
///
/// Owned by a single solve call. Element contributions are computed
/// independently and reduced into it; nothing is shared between solves.
#[derive(Debug)]
pub struct AssemblyContext {
    triplets: TriMat<f64>,
    load: Vec<f64>,
    degenerate: Vec<DegenerateElement>,
}

impl AssemblyContext {
    pub fn new(num_nodes: usize) -> Self {
        Self {
            triplets: TriMat::new((num_nodes, num_nodes)),
            load: vec![0.0; num_nodes],
            degenerate: Vec::new(),
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.load.len()
    }

    /// Scatter-add an element's 36 entries into K
    pub fn add_element(&mut self, contribution: ElementContribution) {
        if let Some(degenerate) = contribution.degenerate {
            self.degenerate.push(degenerate);
            return;
        }

        for i in 0..6 {
            let global_i = contribution.nodes[i];
            for j in 0..6 {
                let global_j = contribution.nodes[j];
                self.triplets.add_triplet(global_i, global_j, contribution.matrix[(i, j)]);
            }
        }
    }

    /// Apply a Dirichlet constraint using the penalty method
    ///
    /// K[i][i] += P and F[i] += P · value for every node in the set.
    /// Exact only as P → ∞; P must dominate the assembled stiffness entries.
    pub fn apply_dirichlet_penalty(&mut self, set: &DirichletSet, penalty: f64) {
        for &node in &set.nodes {
            self.triplets.add_triplet(node, node, penalty);
            self.load[node] += penalty * set.value;
        }
    }

    /// Elements skipped for a degenerate Jacobian determinant
    pub fn degenerate_elements(&self) -> &[DegenerateElement] {
        &self.degenerate
    }

    /// Sum duplicate entries and compress K to CSR
    pub fn finish(self) -> GlobalSystem {
        GlobalSystem {
            k: self.triplets.to_csr(),
            f: self.load,
            degenerate: self.degenerate,
        }
    }
}

/// Assembled global system K·T = F
#[derive(Debug, Clone)]
pub struct GlobalSystem {
    /// Global conductivity matrix in CSR format
    pub k: CsMat<f64>,
    /// Global load vector
    pub f: Vec<f64>,
    pub degenerate: Vec<DegenerateElement>,
}

impl GlobalSystem {
    pub fn num_nodes(&self) -> usize {
        self.f.len()
    }

    /// Entry K[i][j] (zero when not stored)
    pub fn k_entry(&self, i: usize, j: usize) -> f64 {
        self.k.get(i, j).copied().unwrap_or(0.0)
    }
}

/// Global matrix assembler
pub struct Assembler;

impl Assembler {
    /// Local conductivity matrix of one element, tagged with its index
    pub fn element_contribution(mesh: &Mesh, element: usize, conductivity: f64) -> ElementContribution {
        let nodes = mesh.connectivity.wedge6_elements[element].nodes;
        let coords = mesh.element_coordinates(element);
        let (matrix, degenerate) = ElementMatrix::thermal_stiffness_or_zero(element, &coords, conductivity);
        ElementContribution { nodes, matrix, degenerate }
    }

    /// Assemble global conductivity matrix (serial version)
    ///
    /// K = Σ_e K_e
    ///
    /// # Arguments
    /// * `mesh` - The mesh
    /// * `conductivity` - Thermal conductivity (uniform)
    ///
    /// # Returns
    /// Assembly context with K accumulated and F zero
    pub fn assemble_thermal_stiffness_serial(mesh: &Mesh, conductivity: f64) -> AssemblyContext {
        let mut context = AssemblyContext::new(mesh.num_nodes());

        for element in 0..mesh.num_elements() {
            context.add_element(Self::element_contribution(mesh, element, conductivity));
        }

        context
    }

    /// Assemble global conductivity matrix (parallel version using Rayon)
    ///
    /// Element matrices are computed in parallel, then reduced into the
    /// context in element order, so the result matches the serial version.
    pub fn assemble_thermal_stiffness_parallel(mesh: &Mesh, conductivity: f64) -> AssemblyContext {
        let contributions: Vec<ElementContribution> = (0..mesh.num_elements())
            .into_par_iter()
            .map(|element| Self::element_contribution(mesh, element, conductivity))
            .collect();

        let mut context = AssemblyContext::new(mesh.num_nodes());
        for contribution in contributions {
            context.add_element(contribution);
        }

        context
    }

    /// Assemble with the requested strategy
    pub fn assemble_thermal_stiffness(mesh: &Mesh, conductivity: f64, parallel: bool) -> AssemblyContext {
        if parallel {
            Self::assemble_thermal_stiffness_parallel(mesh, conductivity)
        } else {
            Self::assemble_thermal_stiffness_serial(mesh, conductivity)
        }
    }
}
