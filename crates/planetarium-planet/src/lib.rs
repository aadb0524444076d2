//! Procedural planets built from LOD-driven icosahedron sections.
//!
//! [`ProceduralPlanet`] owns the planet's settings, its noise cubes and a
//! cache of displaced sections keyed by `(lod, section)`. Each update picks
//! a LOD per section from the viewer position and pushes only the sections
//! whose LOD changed to a [`MeshSink`](planetarium_mesh::MeshSink).
//! [`AsyncSectionBuilder`] moves section builds onto worker threads.

mod async_build;
mod error;
mod planet;
mod surface;
mod terrain;

pub use async_build::{AsyncSectionBuilder, BuiltSection, SectionKey};
pub use error::PlanetError;
pub use planet::{MAX_SECTION_LOD, ProceduralPlanet, UNSET_LOD, UpdateReport};
pub use surface::surface_transform;
pub use terrain::PlanetTerrain;
