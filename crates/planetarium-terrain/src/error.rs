use std::path::PathBuf;

/// Errors raised while loading or stamping a heightmap decal.
#[derive(Debug, thiserror::Error)]
pub enum DecalError {
    #[error("failed to open decal {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode decal png: {0}")]
    Decode(#[from] png::DecodingError),

    /// Decal images must be square.
    #[error("decal image is {width}x{height}, expected a square image")]
    NotSquare { width: u32, height: u32 },

    /// Height data length does not match the declared resolution.
    #[error("decal height data has not been initialised for its resolution")]
    Uninitialised,

    #[error("decal of {decal} pixels does not fit a {map} pixel map")]
    TooLarge { decal: usize, map: usize },

    #[error("map holds {actual} values, expected {expected}")]
    ResolutionMismatch { expected: usize, actual: usize },
}

/// Errors raised while building noise cubes or writing their images.
#[derive(Debug, thiserror::Error)]
pub enum TerrainError {
    #[error("cube resolution {0} is too small, need at least 2")]
    InvalidResolution(u32),

    #[error(transparent)]
    Decal(#[from] DecalError),

    #[error("failed to encode png: {0}")]
    Encode(#[from] png::EncodingError),

    #[error("failed to write image: {0}")]
    Io(#[from] std::io::Error),
}
