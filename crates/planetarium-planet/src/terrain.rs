//! The planet's height field: two noise cubes and the shaping parameters.

use glam::{Vec3, Vec4};
use planetarium_config::PlanetConfig;
use planetarium_mesh::SectionData;
use planetarium_terrain::{HeightmapDecal, NoiseCube, TerrainError};
use rand::Rng;
use tracing::info;

/// Seed offset of the rough cube relative to the terrain cube.
pub(crate) const ROUGH_SEED_OFFSET: u32 = 1000;

/// Immutable terrain shared between the planet and section build workers.
#[derive(Debug)]
pub struct PlanetTerrain {
    radius: f32,
    scale: f32,
    redistribution: f32,
    min_water_level: f32,
    roughness_influence: f32,
    terrain: NoiseCube,
    rough: NoiseCube,
}

impl PlanetTerrain {
    /// Generate both noise cubes and stamp `decals` onto the rough cube.
    pub fn generate<R: Rng + ?Sized>(
        config: &PlanetConfig,
        seed: u32,
        decals: &[HeightmapDecal],
        rng: &mut R,
    ) -> Result<Self, TerrainError> {
        let terrain = NoiseCube::generate(&config.terrain, seed, config.cube_resolution)?;
        let mut rough = NoiseCube::generate(
            &config.rough,
            seed.wrapping_add(ROUGH_SEED_OFFSET),
            config.cube_resolution,
        )?;
        let placed = rough.apply_decals(decals, rng);
        info!(
            seed,
            resolution = config.cube_resolution,
            decals = placed,
            "Generated planet noise cubes"
        );
        Ok(Self::from_cubes(config, terrain, rough))
    }

    pub fn from_cubes(config: &PlanetConfig, terrain: NoiseCube, rough: NoiseCube) -> Self {
        Self {
            radius: config.radius,
            scale: config.scale,
            redistribution: config.redistribution,
            min_water_level: config.min_water_level,
            roughness_influence: config.roughness_influence,
            terrain,
            rough,
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn terrain_cube(&self) -> &NoiseCube {
        &self.terrain
    }

    pub fn rough_cube(&self) -> &NoiseCube {
        &self.rough
    }

    /// Normalised height in `[min_water_level, 1]` along `direction` from the centre.
    pub fn height_at(&self, direction: Vec3) -> f32 {
        let n = direction.normalize_or_zero();
        let raw = self.terrain.sample(n) + self.roughness_influence * self.rough.sample(n);
        let unit = ((raw + 1.0) * 0.5).clamp(0.0, 1.0);
        unit.powf(self.redistribution).max(self.min_water_level)
    }

    /// Point on the displaced surface, relative to the planet centre.
    pub fn surface_point(&self, direction: Vec3) -> Vec3 {
        let n = direction.normalize_or_zero();
        n * (self.radius + self.height_at(n) * self.scale)
    }

    /// Push every vertex out to the terrain surface, colour it by height and
    /// recompute normals.
    pub fn displace_section(&self, section: &mut SectionData) {
        for vertex in &mut section.vertices {
            let dir = vertex.position.normalize_or_zero();
            let h = self.height_at(dir);
            vertex.position = dir * (self.radius + h * self.scale);
            vertex.color = Vec4::new(h, h, h, 1.0);
        }
        section.recompute_normals();
    }

    /// Copy a base section, subdivide it `lod` times and displace it.
    pub fn build_section(&self, base: &SectionData, lod: u8) -> SectionData {
        let mut section = base.clone();
        section.subdivide(lod as u32);
        self.displace_section(&mut section);
        section
    }
}
