//! Global command-line overrides for Orbit Planetarium.

use std::path::PathBuf;

use clap::Args;

use crate::Config;

/// Options shared by every subcommand.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct CliArgs {
    /// Planet seed. Implies a fixed seed.
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Planet base radius.
    #[arg(long, global = true)]
    pub radius: Option<f32>,

    /// Force every planet section to this LOD.
    #[arg(long, global = true)]
    pub lod: Option<u8>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory for generated files.
    #[arg(long, global = true)]
    pub output: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.planet.seed = seed;
            self.planet.use_seed = true;
        }
        if let Some(radius) = args.radius {
            self.planet.radius = radius;
        }
        if let Some(lod) = args.lod {
            self.planet.lod_override = Some(lod);
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if let Some(ref dir) = args.output {
            self.output.directory = dir.clone();
        }
    }
}
