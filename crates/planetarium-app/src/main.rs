//! The `planetarium` binary.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p planetarium-app -- generate` to write a planet mesh, or
//! `cargo run -p planetarium-app -- simulate --seconds 30` to run the orbits.

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use planetarium_app::{AppError, Cli, Command, PlatformDirs};
use planetarium_config::Config;
use tracing::error;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let dirs = match PlatformDirs::resolve_and_create() {
        Ok(dirs) => dirs,
        Err(e) => {
            eprintln!("Failed to initialize platform directories: {e}");
            return ExitCode::FAILURE;
        }
    };
    finish(run(&cli, &dirs))
}

fn run(cli: &Cli, dirs: &PlatformDirs) -> Result<(), AppError> {
    let config_dir = cli.args.config.clone().unwrap_or_else(|| dirs.config_dir.clone());

    // Loading would create the file init-config is about to write.
    let config = match cli.command {
        Command::InitConfig { .. } => None,
        _ => Some(load_config(&config_dir, cli)),
    };
    planetarium_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), config.as_ref());
    let config = config.unwrap_or_default();

    match &cli.command {
        Command::InitConfig { force } => {
            let path = planetarium_app::init_config(&config_dir, *force)?;
            println!("Wrote {}", path.display());
        }
        Command::Generate { viewer, full_lod } => {
            let summary = planetarium_app::generate(&config, *viewer, *full_lod)?;
            println!(
                "Wrote {} ({} vertices, {} triangles, {} textures)",
                summary.obj_path.display(),
                summary.vertices,
                summary.triangles,
                summary.textures.len()
            );
        }
        Command::Clear => {
            let removed = planetarium_app::clear(&config)?;
            println!(
                "Removed {removed} files from {}",
                config.output.directory.display()
            );
        }
        Command::Simulate { seconds, realtime } => {
            let summary = planetarium_app::simulate(&config, *seconds, *realtime)?;
            println!("Simulated {:.2}s in {} steps", summary.sim_time, summary.steps);
            for (name, p) in summary.orbital.iter().chain(&summary.gravity) {
                println!("  {name:<12} ({:.1}, {:.1}, {:.1})", p.x, p.y, p.z);
            }
        }
        Command::Fly { frames, threaded } => {
            let summary = planetarium_app::fly(&config, *frames, *threaded)?;
            let p = summary.final_position;
            println!(
                "Flew {} frames to ({:.1}, {:.1}, {:.1}), {} mesh updates, {} sections changed",
                summary.frames, p.x, p.y, p.z, summary.mesh_updates, summary.sections_changed
            );
            println!("  final LODs: {:?}", summary.final_lods);
        }
    }
    Ok(())
}

fn load_config(config_dir: &Path, cli: &Cli) -> Config {
    let mut config = Config::load_or_create(config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&cli.args);
    config
}

fn finish(result: Result<(), AppError>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
