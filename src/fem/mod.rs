pub mod basis;
pub mod element;
pub mod assembly;
pub mod boundary;

pub use basis::{Wedge6Basis, DEGENERATE_TOLERANCE};
pub use element::{element_heat_flux, element_stiffness, ElementMatrix, DEFAULT_CONDUCTIVITY};
pub use assembly::{Assembler, AssemblyContext, ElementContribution, GlobalSystem, DEFAULT_PENALTY};
pub use boundary::{BoundaryAxis, BoundaryNodes, DirichletSet, DEFAULT_BOUNDARY_TOLERANCE};
