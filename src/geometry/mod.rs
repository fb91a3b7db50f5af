//! Geometry: meshes, their faces/edges, and the OBJ loader.

mod mesh;
pub mod obj;
pub mod primitives;

pub use mesh::{Edge, EdgeStyle, Face, FaceStyle, Mesh, MeshFlags, Vertex, VertexId};
