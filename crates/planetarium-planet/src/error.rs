use planetarium_lod::LodError;
use planetarium_mesh::MeshError;
use planetarium_terrain::TerrainError;

/// Errors from building or updating a procedural planet.
#[derive(Debug, thiserror::Error)]
pub enum PlanetError {
    #[error("planet radius must be positive, got {0}")]
    InvalidRadius(f32),

    #[error("cube resolution must be at least 2, got {0}")]
    InvalidResolution(u32),

    #[error("max LOD {max_lod} exceeds the limit of {limit}")]
    InvalidMaxLod { max_lod: u8, limit: u8 },

    #[error("invalid LOD distances: {0}")]
    Lod(#[from] LodError),

    #[error("terrain generation failed: {0}")]
    Terrain(#[from] TerrainError),

    #[error("mesh update failed: {0}")]
    Mesh(#[from] MeshError),

    #[error("failed to spawn section build worker: {0}")]
    WorkerSpawn(#[source] std::io::Error),

    /// An operation needed noise cubes before `generate_noise_cubes` ran.
    #[error("noise cubes have not been generated")]
    NotGenerated,
}
