//! Configuration system for Orbit Planetarium.
//!
//! Provides runtime-configurable settings that persist to disk as RON files.
//! Supports CLI overrides via clap, hot-reload detection, and forward/backward
//! compatible serialization.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    APP_NAME, BodyConfig, CONFIG_FILE, CameraConfig, Config, DebugConfig, FractalNoiseType,
    FractalType, GravityBodyConfig, NoiseConfig, OutputConfig, PlanetConfig,
    SurfaceFeatureConfig, SystemConfig,
};
pub use error::ConfigError;
