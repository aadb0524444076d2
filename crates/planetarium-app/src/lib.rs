//! Orbit Planetarium application layer.
//!
//! Each subcommand of the `planetarium` binary is a function here returning a
//! summary of what it did, so the binary stays a thin dispatcher.

pub mod cli;
pub mod error;
pub mod fly;
pub mod game_loop;
pub mod generate;
pub mod platform;
pub mod simulate;

use std::path::{Path, PathBuf};

use planetarium_config::{CONFIG_FILE, Config};
use tracing::info;

pub use cli::{Cli, Command};
pub use error::AppError;
pub use fly::{FlySummary, fly};
pub use game_loop::{FIXED_DT, GameLoop, MAX_FRAME_TIME, SimulatedLoop};
pub use generate::{GenerateSummary, clear, generate};
pub use platform::{PlatformDirs, PlatformError};
pub use simulate::{MAX_SECONDS, SimulationSummary, simulate};

/// Write the default config into `config_dir` and return its path.
///
/// An existing file is only replaced with `force`.
pub fn init_config(config_dir: &Path, force: bool) -> Result<PathBuf, AppError> {
    let path = config_dir.join(CONFIG_FILE);
    if path.exists() && !force {
        return Err(AppError::ConfigExists(path));
    }
    Config::default().save(config_dir)?;
    info!(path = %path.display(), "Wrote default config");
    Ok(path)
}
