//! Command-line interface of the `planetarium` binary.

use clap::{Parser, Subcommand};
use glam::Vec3;
use planetarium_config::CliArgs;

#[derive(Parser, Debug)]
#[command(name = "planetarium", version, about = "Procedural planets and orbital systems")]
pub struct Cli {
    #[command(flatten)]
    pub args: CliArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Generate the planet mesh for a viewer and write it as OBJ.
    Generate {
        /// Viewer position as `x,y,z`.
        #[arg(long, value_parser = parse_vec3, default_value = "0,25000,0", allow_hyphen_values = true)]
        viewer: Vec3,

        /// Write the whole planet as one icosphere at this LOD instead of per-section LODs.
        #[arg(long)]
        full_lod: Option<u8>,
    },

    /// Remove generated planet files from the output directory.
    Clear,

    /// Run the orbital and gravity simulation headless.
    Simulate {
        /// Simulated seconds.
        #[arg(long, default_value_t = 10.0)]
        seconds: f64,

        /// Pace the simulation against the wall clock.
        #[arg(long)]
        realtime: bool,
    },

    /// Fly the player camera towards the planet and report LOD changes.
    Fly {
        #[arg(long, default_value_t = 600)]
        frames: u32,

        /// Build sections on worker threads.
        #[arg(long)]
        threaded: bool,
    },

    /// Write the default `config.ron`.
    InitConfig {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

/// Parse `x,y,z` into a vector.
pub fn parse_vec3(s: &str) -> Result<Vec3, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [x, y, z] = parts.as_slice() else {
        return Err(format!("expected x,y,z, got '{s}'"));
    };
    let parse = |v: &str| v.parse::<f32>().map_err(|e| format!("invalid component '{v}': {e}"));
    Ok(Vec3::new(parse(*x)?, parse(*y)?, parse(*z)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vec3() {
        assert_eq!(parse_vec3("1,2,3"), Ok(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(parse_vec3(" -1.5, 0 ,2e3"), Ok(Vec3::new(-1.5, 0.0, 2000.0)));
        assert!(parse_vec3("1,2").is_err());
        assert!(parse_vec3("1,a,3").is_err());
    }

    #[test]
    fn test_global_args_after_subcommand() {
        let cli = Cli::try_parse_from([
            "planetarium",
            "generate",
            "--viewer",
            "0,-30000,0",
            "--seed",
            "7",
            "--lod",
            "3",
        ])
        .unwrap();
        assert_eq!(cli.args.seed, Some(7));
        assert_eq!(cli.args.lod, Some(3));
        assert_eq!(
            cli.command,
            Command::Generate {
                viewer: Vec3::new(0.0, -30_000.0, 0.0),
                full_lod: None
            }
        );
    }

    #[test]
    fn test_subcommand_defaults() {
        let cli = Cli::try_parse_from(["planetarium", "simulate"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Simulate {
                seconds: 10.0,
                realtime: false
            }
        );
        let cli = Cli::try_parse_from(["planetarium", "init-config", "--force"]).unwrap();
        assert_eq!(cli.command, Command::InitConfig { force: true });
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["planetarium"]).is_err());
    }
}
