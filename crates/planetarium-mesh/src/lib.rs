//! Sphere geometry for procedural planets.
//!
//! Planets are built from the 20 faces of an icosahedron. Each face is an
//! independent mesh section that can be subdivided to its own level of
//! detail and handed to a [`MeshSink`]. A whole-planet icosphere
//! ([`MeshData`]) is also available for export.

mod error;
pub mod icosahedron;
mod mesh_data;
pub mod obj;
mod section;
mod sink;
mod spherical;

pub use error::MeshError;
pub use icosahedron::NUM_SECTIONS;
pub use mesh_data::{MeshData, MeshSummary};
pub use section::{SectionData, SectionVertex};
pub use sink::{MeshSink, SectionStore};
pub use spherical::{SphericalCoords, sphere_uv};
