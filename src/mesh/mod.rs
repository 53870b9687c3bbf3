pub mod topology;
pub mod geometry;
pub mod fields;
pub mod quality;

pub use topology::{Connectivity, Wedge6Element};
pub use geometry::{Geometry, Mesh, NodeWelder, WeldKey, DEFAULT_WELD_DECIMALS};
pub use fields::{ScalarField, ElementVectorField, FieldData, FieldRange};
pub use quality::{MeshQuality, assess_mesh_quality};
