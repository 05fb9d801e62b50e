pub mod candidate;
pub mod edge;
pub mod hull_mesh;
pub mod reduction;
pub mod triangle;
pub mod vertex;

pub use edge::{Edge, EdgeId};
pub use hull_mesh::{HullMesh, MeshError};
pub use reduction::{Operation, Simplifier, Step};
pub use triangle::{FaceId, Triangle};
pub use vertex::{VertId, Vertex};
