use std::path::PathBuf;

use planetarium_config::ConfigError;
use planetarium_mesh::MeshError;
use planetarium_orbit::OrbitError;
use planetarium_planet::PlanetError;
use planetarium_terrain::TerrainError;

use crate::platform::PlatformError;

/// Any failure of a planetarium subcommand.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Planet(#[from] PlanetError),

    #[error(transparent)]
    Terrain(#[from] TerrainError),

    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error(transparent)]
    Orbit(#[from] OrbitError),

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("simulation length {0} is not within 0..=1e9 seconds")]
    InvalidDuration(f64),

    #[error("config already exists at {0} (use --force to overwrite)")]
    ConfigExists(PathBuf),
}

impl AppError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| AppError::Io { path, source }
    }
}
