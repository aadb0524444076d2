//! Terrain data for procedural planets.
//!
//! A planet's height field is stored as two noise cubes: six square height
//! maps, one per cube face, filled from seeded fractal noise. Heightmap decals
//! stamp authored features (craters, mesas) onto cube faces. Debug images
//! render faces and their steepness to PNG.

pub mod debug_viz;
mod decal;
mod error;
mod noise_cube;
mod noise_gen;

pub use debug_viz::{DebugImage, height_to_grey, steepness_to_color};
pub use decal::HeightmapDecal;
pub use error::{DecalError, TerrainError};
pub use noise_cube::{CubeFace, NoiseCube};
pub use noise_gen::{MAX_OCTAVES, NoiseGenerator};
