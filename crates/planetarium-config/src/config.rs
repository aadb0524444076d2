//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Directory name used under the OS config, data and cache locations.
pub const APP_NAME: &str = "orbit-planetarium";
/// File name of the persisted configuration.
pub const CONFIG_FILE: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Procedural planet settings.
    pub planet: PlanetConfig,
    /// Orbital system and gravity settings.
    pub system: SystemConfig,
    /// Player camera settings.
    pub camera: CameraConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
    /// Where generated meshes and textures are written.
    pub output: OutputConfig,
}

/// Base function a fractal noise generator is built on.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum FractalNoiseType {
    /// Gradient (Perlin) noise.
    #[default]
    Gradient,
    /// Simplex noise.
    Simplex,
    /// Value noise.
    Value,
}

/// How octaves are combined.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum FractalType {
    /// Fractal Brownian motion.
    #[default]
    Fbm,
    /// Absolute-value octaves, puffy shapes.
    Billow,
    /// Inverted absolute-value octaves, sharp ridges.
    RigidMulti,
}

/// Parameters for one fractal noise generator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NoiseConfig {
    pub noise_type: FractalNoiseType,
    pub fractal_type: FractalType,
    pub octaves: u32,
    pub frequency: f64,
    /// Amplitude multiplier between octaves (persistence).
    pub gain: f64,
    /// Frequency multiplier between octaves.
    pub lacunarity: f64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            noise_type: FractalNoiseType::Gradient,
            fractal_type: FractalType::Fbm,
            octaves: 6,
            frequency: 0.5,
            gain: 2.0,
            lacunarity: 0.4,
        }
    }
}

/// A heightmap stamped onto the planet's rough noise cube.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SurfaceFeatureConfig {
    /// Square PNG whose red channel is the height.
    pub heightmap: PathBuf,
    /// Maximum number of placements across the whole planet.
    pub max_amount: u32,
}

/// Procedural planet configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlanetConfig {
    /// Display name, used for output file names and logs.
    pub name: String,
    /// Use `seed` as-is. When false a fresh seed is drawn on every generation.
    pub use_seed: bool,
    pub seed: u64,
    /// Base sphere radius in world units.
    pub radius: f32,
    /// Height of the tallest terrain above the base sphere.
    pub scale: f32,
    /// Exponent applied to the normalized height. Values above 1 flatten lowlands.
    pub redistribution: f32,
    /// Normalized heights below this are raised to it (sea floor).
    pub min_water_level: f32,
    /// Weight of the rough noise cube added to the terrain cube.
    pub roughness_influence: f32,
    /// Pixels per edge of each noise cube face.
    pub cube_resolution: u32,
    /// Large-scale terrain noise.
    pub terrain: NoiseConfig,
    /// Small-scale roughness noise.
    pub rough: NoiseConfig,
    /// Force every section to this LOD instead of selecting by viewer distance.
    pub lod_override: Option<u8>,
    /// Upper bound for any selected LOD, at most 12.
    pub max_lod: u8,
    /// Altitude thresholds for LOD 1..=N, strictly decreasing.
    pub lod_distances: Vec<f64>,
    /// Sections angled further than this from the viewer are treated as occluded.
    pub horizon_angle_deg: f64,
    /// LOD cap for occluded sections.
    pub occluded_lod: u8,
    /// Height above the base sphere used by surface placement queries.
    pub surface_offset: f32,
    pub surface_features: Vec<SurfaceFeatureConfig>,
    /// Seconds between section updates while flying.
    pub mesh_update_rate: f64,
    /// Write noise cube and steepness images alongside the mesh.
    pub generate_debug_textures: bool,
}

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            name: "planet".to_string(),
            use_seed: true,
            seed: 600,
            radius: 20_000.0,
            scale: 1_500.0,
            redistribution: 2.5,
            min_water_level: 0.2,
            roughness_influence: 0.2,
            cube_resolution: 1024,
            terrain: NoiseConfig::default(),
            rough: NoiseConfig {
                frequency: 4.0,
                gain: 0.5,
                lacunarity: 2.0,
                ..NoiseConfig::default()
            },
            lod_override: None,
            max_lod: 8,
            lod_distances: vec![
                300_000.0, 267_210.0, 226_710.0, 186_210.0, 136_710.0, 96_210.0, 55_710.0,
                33_000.0,
            ],
            horizon_angle_deg: 70.0,
            occluded_lod: 1,
            surface_offset: 100.0,
            surface_features: Vec::new(),
            mesh_update_rate: 0.5,
            generate_debug_textures: false,
        }
    }
}

/// A body that follows a closed elliptical orbit around its parent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BodyConfig {
    pub name: String,
    /// Name of the body this one orbits. `None` for a fixed root body.
    pub parent: Option<String>,
    /// Starting position, only meaningful for bodies without an orbit.
    pub position: [f64; 3],
    /// Distance travelled along the orbit per second.
    pub angular_velocity: f64,
    /// Starting time offset along the orbit, in seconds.
    pub t_offset: f64,
    /// Orbit inclination in degrees.
    pub inclination: f64,
    /// Yaw of the orbit plane in degrees.
    pub periapsis_longitude: f64,
    /// Pitch of the orbit plane in degrees.
    pub periapsis_latitude: f64,
    pub periapsis_height: f64,
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    pub max_spline_points: usize,
    /// Immobile bodies never tick.
    pub mobile: bool,
    /// Self-rotation rate in degrees per second (pitch, yaw, roll).
    pub rotation_rate: [f64; 3],
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            name: "body".to_string(),
            parent: None,
            position: [0.0; 3],
            angular_velocity: 0.0,
            t_offset: 0.0,
            inclination: 0.0,
            periapsis_longitude: 0.0,
            periapsis_latitude: 0.0,
            periapsis_height: 150.0,
            semi_major_axis: 0.0,
            eccentricity: 0.0,
            max_spline_points: 20,
            mobile: true,
            rotation_rate: [0.0; 3],
        }
    }
}

/// A point mass in the n-body gravity simulation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GravityBodyConfig {
    pub name: String,
    pub mass: f64,
    pub density: f64,
    pub position: [f64; 3],
    pub velocity: [f64; 3],
}

impl Default for GravityBodyConfig {
    fn default() -> Self {
        Self {
            name: "mass".to_string(),
            mass: 1.0,
            density: 1.0,
            position: [0.0; 3],
            velocity: [0.0; 3],
        }
    }
}

/// Orbital system configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SystemConfig {
    /// Multiplier applied to every gravity step.
    pub time_scale: f64,
    pub bodies: Vec<BodyConfig>,
    pub gravity_bodies: Vec<GravityBodyConfig>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            bodies: vec![
                BodyConfig {
                    name: "Sol".to_string(),
                    mobile: false,
                    ..BodyConfig::default()
                },
                BodyConfig {
                    name: "Terra".to_string(),
                    parent: Some("Sol".to_string()),
                    angular_velocity: 2_000.0,
                    semi_major_axis: 60_000.0,
                    eccentricity: 0.1,
                    periapsis_height: 5_000.0,
                    inclination: 5.0,
                    rotation_rate: [0.0, 10.0, 0.0],
                    ..BodyConfig::default()
                },
                BodyConfig {
                    name: "Luna".to_string(),
                    parent: Some("Terra".to_string()),
                    angular_velocity: 1_500.0,
                    semi_major_axis: 8_000.0,
                    eccentricity: 0.05,
                    periapsis_height: 500.0,
                    ..BodyConfig::default()
                },
            ],
            gravity_bodies: vec![
                GravityBodyConfig {
                    name: "Star".to_string(),
                    mass: 1.0e16,
                    density: 1.0e6,
                    ..GravityBodyConfig::default()
                },
                GravityBodyConfig {
                    name: "Planet".to_string(),
                    mass: 1.0e6,
                    density: 1.0,
                    position: [1_000.0, 0.0, 0.0],
                    velocity: [0.0, 25.83, 0.0],
                },
            ],
        }
    }
}

/// Player camera configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Speed is `base_speed ^ throttle` units per tick.
    pub base_speed: f32,
    pub start_position: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            base_speed: 1.2,
            start_position: [0.0, -400_000.0, 0.0],
        }
    }
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Output locations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("output"),
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// The OS configuration directory for this application.
    pub fn default_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|base| base.join(APP_NAME))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(4))
                .unwrap();
        assert!(ron_str.contains("seed: 600"));
        assert!(ron_str.contains("horizon_angle_deg: 70.0"));
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(planet: (seed: 7))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.planet.seed, 7);
        assert_eq!(config.planet.radius, PlanetConfig::default().radius);
        assert_eq!(config.system, SystemConfig::default());
    }

    #[test]
    fn test_noise_enums_parse_by_name() {
        let ron_str = "(noise_type: Simplex, fractal_type: RigidMulti, octaves: 3)";
        let noise: NoiseConfig = ron::from_str(ron_str).unwrap();
        assert_eq!(noise.noise_type, FractalNoiseType::Simplex);
        assert_eq!(noise.fractal_type, FractalType::RigidMulti);
        assert_eq!(noise.octaves, 3);
        assert_eq!(noise.lacunarity, 0.4);
    }

    #[test]
    fn test_default_lod_distances_strictly_decrease() {
        let distances = PlanetConfig::default().lod_distances;
        assert_eq!(distances.len(), 8);
        assert!(distances.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_default_system_parents_exist() {
        let system = SystemConfig::default();
        for body in &system.bodies {
            if let Some(parent) = &body.parent {
                assert!(system.bodies.iter().any(|b| &b.name == parent));
            }
        }
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.planet.seed = 1234;
        config.planet.lod_override = Some(3);
        config.planet.surface_features.push(SurfaceFeatureConfig {
            heightmap: PathBuf::from("crater.png"),
            max_amount: 4,
        });

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join(CONFIG_FILE).exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.system.time_scale = 10.0;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.unwrap().system.time_scale, 10.0);
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        assert!(config.reload(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{{not valid}}").unwrap();
        let result = Config::load_or_create(dir.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }
}
