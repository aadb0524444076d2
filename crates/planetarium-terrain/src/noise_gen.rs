//! Seeded fractal noise generators configured from [`NoiseConfig`].

use glam::DVec3;
use noise::{Billow, Fbm, MultiFractal, NoiseFn, Perlin, RidgedMulti, Seedable, Simplex, Value};
use planetarium_config::{FractalNoiseType, FractalType, NoiseConfig};

/// Highest octave count the fractal generators accept.
pub const MAX_OCTAVES: u32 = 32;

trait FractalSource: NoiseFn<f64, 2> + NoiseFn<f64, 3> + Send + Sync {}

impl<T> FractalSource for T where T: NoiseFn<f64, 2> + NoiseFn<f64, 3> + Send + Sync {}

/// A fractal noise function over 2D and 3D inputs, clamped to `[-1, 1]`.
pub struct NoiseGenerator {
    source: Box<dyn FractalSource>,
    seed: u32,
}

impl NoiseGenerator {
    /// Build a generator from config. Octaves are clamped to `1..=MAX_OCTAVES`.
    pub fn new(config: &NoiseConfig, seed: u32) -> Self {
        let source = match config.noise_type {
            FractalNoiseType::Gradient => build_fractal::<Perlin>(config, seed),
            FractalNoiseType::Simplex => build_fractal::<Simplex>(config, seed),
            FractalNoiseType::Value => build_fractal::<Value>(config, seed),
        };
        Self { source, seed }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn get_2d(&self, x: f64, y: f64) -> f32 {
        let v = NoiseFn::<f64, 2>::get(self.source.as_ref(), [x, y]);
        v.clamp(-1.0, 1.0) as f32
    }

    pub fn get_3d(&self, p: DVec3) -> f32 {
        let v = NoiseFn::<f64, 3>::get(self.source.as_ref(), p.to_array());
        v.clamp(-1.0, 1.0) as f32
    }
}

impl std::fmt::Debug for NoiseGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseGenerator")
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

fn build_fractal<T>(config: &NoiseConfig, seed: u32) -> Box<dyn FractalSource>
where
    T: Default + Seedable + NoiseFn<f64, 2> + NoiseFn<f64, 3> + Send + Sync + 'static,
{
    let octaves = config.octaves.clamp(1, MAX_OCTAVES) as usize;
    match config.fractal_type {
        FractalType::Fbm => Box::new(
            Fbm::<T>::new(seed)
                .set_octaves(octaves)
                .set_frequency(config.frequency)
                .set_lacunarity(config.lacunarity)
                .set_persistence(config.gain),
        ),
        FractalType::Billow => Box::new(
            Billow::<T>::new(seed)
                .set_octaves(octaves)
                .set_frequency(config.frequency)
                .set_lacunarity(config.lacunarity)
                .set_persistence(config.gain),
        ),
        FractalType::RigidMulti => Box::new(
            RidgedMulti::<T>::new(seed)
                .set_octaves(octaves)
                .set_frequency(config.frequency)
                .set_lacunarity(config.lacunarity)
                .set_persistence(config.gain),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_configs() -> Vec<NoiseConfig> {
        let mut configs = Vec::new();
        for noise_type in [
            FractalNoiseType::Gradient,
            FractalNoiseType::Simplex,
            FractalNoiseType::Value,
        ] {
            for fractal_type in [FractalType::Fbm, FractalType::Billow, FractalType::RigidMulti] {
                configs.push(NoiseConfig {
                    noise_type,
                    fractal_type,
                    ..NoiseConfig::default()
                });
            }
        }
        configs
    }

    #[test]
    fn test_same_seed_same_values() {
        let config = NoiseConfig::default();
        let a = NoiseGenerator::new(&config, 600);
        let b = NoiseGenerator::new(&config, 600);
        for i in 0..50 {
            let x = i as f64 * 0.137;
            let y = i as f64 * 0.071;
            assert_eq!(a.get_2d(x, y), b.get_2d(x, y), "mismatch at ({x}, {y})");
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let config = NoiseConfig::default();
        let a = NoiseGenerator::new(&config, 1);
        let b = NoiseGenerator::new(&config, 2);
        let differs = (0..100).any(|i| {
            let x = 0.31 + i as f64 * 0.173;
            a.get_2d(x, x * 0.5) != b.get_2d(x, x * 0.5)
        });
        assert!(differs, "seeds 1 and 2 should produce different noise");
    }

    #[test]
    fn test_output_clamped_for_every_combination() {
        for config in all_configs() {
            let generator = NoiseGenerator::new(&config, 99);
            for i in 0..200 {
                let x = i as f64 * 0.29;
                let v2 = generator.get_2d(x, -x * 0.7);
                let v3 = generator.get_3d(DVec3::new(x, x * 0.3, -x));
                assert!(
                    (-1.0..=1.0).contains(&v2) && (-1.0..=1.0).contains(&v3),
                    "{:?}/{:?} escaped [-1, 1]: {v2}, {v3}",
                    config.noise_type,
                    config.fractal_type
                );
            }
        }
    }

    #[test]
    fn test_octaves_clamped() {
        let zero = NoiseConfig {
            octaves: 0,
            ..NoiseConfig::default()
        };
        let huge = NoiseConfig {
            octaves: 1000,
            ..NoiseConfig::default()
        };
        // Must not panic inside the noise crate.
        let _ = NoiseGenerator::new(&zero, 3).get_2d(0.5, 0.5);
        let _ = NoiseGenerator::new(&huge, 3).get_2d(0.5, 0.5);
    }

    #[test]
    fn test_seed_accessor() {
        let generator = NoiseGenerator::new(&NoiseConfig::default(), 77);
        assert_eq!(generator.seed(), 77);
    }
}
