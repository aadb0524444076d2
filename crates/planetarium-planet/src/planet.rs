//! The procedural planet: LOD selection, section cache and mesh updates.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use glam::{Quat, Vec3, Vec4};
use planetarium_config::PlanetConfig;
use planetarium_lod::{LodSelector, LodThresholds};
use planetarium_mesh::{MeshData, MeshSink, NUM_SECTIONS, SectionData, sphere_uv};
use planetarium_terrain::{CubeFace, DebugImage, HeightmapDecal};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::async_build::{AsyncSectionBuilder, SectionKey};
use crate::error::PlanetError;
use crate::surface::surface_transform;
use crate::terrain::PlanetTerrain;

/// LOD recorded for a section that has never been pushed to the sink.
pub const UNSET_LOD: u8 = 127;

/// Highest `max_lod` a planet accepts. A section at this LOD holds 4^12 triangles.
pub const MAX_SECTION_LOD: u8 = 12;

/// What one call to an update method changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// Sink sections replaced this update, in ascending order.
    pub updated: Vec<usize>,
    /// Sections whose new LOD was sent to the async builder instead.
    pub queued: Vec<usize>,
    pub cache_hits: usize,
    pub cache_misses: usize,
    /// The sink was (re)created from the base icosahedron first.
    pub created: bool,
}

impl UpdateReport {
    pub fn is_empty(&self) -> bool {
        self.updated.is_empty() && self.queued.is_empty() && !self.created
    }
}

/// A planet whose 20 icosahedron sections are refined independently as the
/// viewer moves.
pub struct ProceduralPlanet {
    config: PlanetConfig,
    center: Vec3,
    seed: u32,
    selector: LodSelector,
    terrain: Option<Arc<PlanetTerrain>>,
    base_sections: Vec<SectionData>,
    previous_lods: [u8; NUM_SECTIONS],
    requested: [Option<u8>; NUM_SECTIONS],
    cache: HashMap<SectionKey, SectionData>,
}

impl ProceduralPlanet {
    /// Validate settings and pick the seed. Noise cubes are generated lazily.
    ///
    /// With `use_seed` the low 32 bits of `config.seed` are used, otherwise a
    /// random seed is drawn.
    pub fn new(config: PlanetConfig, center: Vec3) -> Result<Self, PlanetError> {
        if !(config.radius.is_finite() && config.radius > 0.0) {
            return Err(PlanetError::InvalidRadius(config.radius));
        }
        if config.cube_resolution < 2 {
            return Err(PlanetError::InvalidResolution(config.cube_resolution));
        }
        if config.max_lod > MAX_SECTION_LOD {
            return Err(PlanetError::InvalidMaxLod {
                max_lod: config.max_lod,
                limit: MAX_SECTION_LOD,
            });
        }
        let thresholds = LodThresholds::try_custom(config.lod_distances.clone())?;
        let selector =
            LodSelector::new(thresholds).with_horizon(config.horizon_angle_deg, config.occluded_lod);

        let seed = if config.use_seed {
            config.seed as u32
        } else {
            rand::rng().random()
        };

        Ok(Self {
            config,
            center,
            seed,
            selector,
            terrain: None,
            base_sections: SectionData::base_sections(),
            previous_lods: [UNSET_LOD; NUM_SECTIONS],
            requested: [None; NUM_SECTIONS],
            cache: HashMap::new(),
        })
    }

    pub fn config(&self) -> &PlanetConfig {
        &self.config
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Move the planet. Cached sections stay valid since they are centre-relative.
    pub fn set_center(&mut self, center: Vec3) {
        self.center = center;
    }

    pub fn previous_lods(&self) -> &[u8; NUM_SECTIONS] {
        &self.previous_lods
    }

    pub fn cached_section_count(&self) -> usize {
        self.cache.len()
    }

    pub fn terrain(&self) -> Option<&Arc<PlanetTerrain>> {
        self.terrain.as_ref()
    }

    /// Build the terrain and rough noise cubes and stamp surface features.
    ///
    /// Features that fail to load are logged and skipped. Decal placement uses
    /// an RNG seeded from the planet seed, so the result is reproducible.
    /// Regenerating drops every cached section.
    pub fn generate_noise_cubes(&mut self) -> Result<(), PlanetError> {
        let decals: Vec<HeightmapDecal> = self
            .config
            .surface_features
            .iter()
            .filter_map(|feature| match HeightmapDecal::from_feature(feature) {
                Ok(decal) => Some(decal),
                Err(e) => {
                    warn!(heightmap = %feature.heightmap.display(), "Skipping surface feature: {e}");
                    None
                }
            })
            .collect();

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed as u64);
        let terrain = PlanetTerrain::generate(&self.config, self.seed, &decals, &mut rng)?;
        self.terrain = Some(Arc::new(terrain));
        self.cache.clear();
        self.previous_lods = [UNSET_LOD; NUM_SECTIONS];
        self.requested = [None; NUM_SECTIONS];
        Ok(())
    }

    fn ensure_terrain(&mut self) -> Result<Arc<PlanetTerrain>, PlanetError> {
        if self.terrain.is_none() {
            self.generate_noise_cubes()?;
        }
        self.terrain.clone().ok_or(PlanetError::NotGenerated)
    }

    /// Normalised terrain height along `direction`.
    pub fn height_at(&self, direction: Vec3) -> Result<f32, PlanetError> {
        let terrain = self.terrain.as_ref().ok_or(PlanetError::NotGenerated)?;
        Ok(terrain.height_at(direction))
    }

    /// The LOD each section should have for a viewer at `viewer`.
    pub fn select_lods(&self, viewer: Vec3) -> [u8; NUM_SECTIONS] {
        std::array::from_fn(|i| {
            let lod = self.config.lod_override.unwrap_or_else(|| {
                self.selector.select_section_lod(
                    viewer,
                    self.center,
                    self.config.radius,
                    self.base_sections[i].section_normal,
                )
            });
            lod.min(self.config.max_lod)
        })
    }

    /// Populate an empty or mismatched sink with the base icosahedron.
    fn prepare_sink<S: MeshSink + ?Sized>(&mut self, sink: &mut S) -> bool {
        if sink.section_count() == NUM_SECTIONS {
            return false;
        }
        sink.clear_all();
        for (i, base) in self.base_sections.iter().enumerate() {
            sink.create_section(i, base);
        }
        self.previous_lods = [UNSET_LOD; NUM_SECTIONS];
        true
    }

    /// Rebuild every section whose LOD changed for `viewer` and push it to `sink`.
    pub fn update_sections<S: MeshSink + ?Sized>(
        &mut self,
        viewer: Vec3,
        sink: &mut S,
    ) -> Result<UpdateReport, PlanetError> {
        let terrain = self.ensure_terrain()?;
        let mut report = UpdateReport {
            created: self.prepare_sink(sink),
            ..UpdateReport::default()
        };

        let lods = self.select_lods(viewer);
        for (i, &lod) in lods.iter().enumerate() {
            if lod == self.previous_lods[i] {
                continue;
            }

            let key = SectionKey { lod, section: i };
            let section = match self.cache.entry(key) {
                Entry::Occupied(entry) => {
                    report.cache_hits += 1;
                    entry.into_mut()
                }
                Entry::Vacant(entry) => {
                    report.cache_misses += 1;
                    entry.insert(terrain.build_section(&self.base_sections[i], lod))
                }
            };

            sink.update_section(i, section)?;
            self.previous_lods[i] = lod;
            self.requested[i] = None;
            report.updated.push(i);
        }

        if !report.updated.is_empty() {
            debug!(
                planet = %self.config.name,
                updated = report.updated.len(),
                hits = report.cache_hits,
                misses = report.cache_misses,
                "Updated planet sections"
            );
        }
        Ok(report)
    }

    /// Like [`update_sections`](Self::update_sections), but uncached sections
    /// are built on `builder` and applied on a later call once finished.
    pub fn update_sections_async<S: MeshSink + ?Sized>(
        &mut self,
        viewer: Vec3,
        sink: &mut S,
        builder: &AsyncSectionBuilder,
    ) -> Result<UpdateReport, PlanetError> {
        let terrain = self.ensure_terrain()?;
        let mut report = UpdateReport {
            created: self.prepare_sink(sink),
            ..UpdateReport::default()
        };

        for built in builder.drain_results() {
            report.cache_misses += 1;
            self.cache.insert(built.key, built.data);
        }

        let lods = self.select_lods(viewer);
        for (i, &lod) in lods.iter().enumerate() {
            if lod == self.previous_lods[i] {
                if let Some(stale) = self.requested[i].take() {
                    builder.cancel(&SectionKey { lod: stale, section: i });
                }
                continue;
            }

            let key = SectionKey { lod, section: i };
            if let Some(section) = self.cache.get(&key) {
                if self.requested[i] != Some(lod) {
                    report.cache_hits += 1;
                }
                sink.update_section(i, section)?;
                self.previous_lods[i] = lod;
                self.requested[i] = None;
                report.updated.push(i);
                continue;
            }

            if let Some(stale) = self.requested[i].filter(|&r| r != lod) {
                builder.cancel(&SectionKey { lod: stale, section: i });
                self.requested[i] = None;
            }
            if builder.is_pending(&key) {
                report.queued.push(i);
                continue;
            }
            match builder.submit(key, &self.base_sections[i], &terrain) {
                Ok(()) => {
                    self.requested[i] = Some(lod);
                    report.queued.push(i);
                }
                Err(_) => debug!(section = i, lod, "Section build queue full, retrying next update"),
            }
        }

        Ok(report)
    }

    /// Drop all sink sections and forget what was pushed. The cache survives.
    pub fn clear<S: MeshSink + ?Sized>(&mut self, sink: &mut S) {
        sink.clear_all();
        self.previous_lods = [UNSET_LOD; NUM_SECTIONS];
        self.requested = [None; NUM_SECTIONS];
        info!(planet = %self.config.name, "Cleared planet mesh");
    }

    /// One displaced icosphere at `lod` with normals, UVs, colours and tangents.
    pub fn build_full_mesh(&mut self, lod: u8) -> Result<MeshData, PlanetError> {
        let terrain = self.ensure_terrain()?;
        let mut mesh = MeshData::icosphere(lod.min(self.config.max_lod) as u32);

        mesh.colors.reserve(mesh.vertices.len());
        mesh.uvs.reserve(mesh.vertices.len());
        for v in &mut mesh.vertices {
            let dir = v.normalize_or_zero();
            let h = terrain.height_at(dir);
            *v = dir * (terrain.radius() + h * terrain.scale());
            mesh.colors.push(Vec4::new(h, h, h, 1.0));
            mesh.uvs.push(sphere_uv(dir));
        }
        mesh.recompute_normals();
        mesh.compute_tangents();

        info!(planet = %self.config.name, lod, "Built full planet mesh: {}", mesh.summary());
        Ok(mesh)
    }

    /// World position and orientation `surface_offset` above the base sphere,
    /// directly below or above `point`.
    pub fn surface_position(&self, point: Vec3) -> (Vec3, Quat) {
        surface_transform(
            self.center,
            self.config.radius + self.config.surface_offset,
            point,
        )
    }

    /// Height and steepness images for each face of the terrain cube.
    pub fn debug_textures(&mut self) -> Result<Vec<(String, DebugImage)>, PlanetError> {
        let terrain = self.ensure_terrain()?;
        let cube = terrain.terrain_cube();
        let mut images = Vec::with_capacity(12);
        for face in CubeFace::ALL {
            images.push((format!("noise_{}", face.name()), cube.face_image(face)));
        }
        for face in CubeFace::ALL {
            images.push((format!("steepness_{}", face.name()), cube.steepness_image(face)));
        }
        Ok(images)
    }
}
