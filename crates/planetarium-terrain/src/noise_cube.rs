//! Six-face noise cube: one square height map per cube face, sampled by direction.

use std::sync::OnceLock;

use glam::Vec3;
use planetarium_config::NoiseConfig;
use rand::Rng;
use tracing::{debug, warn};

use crate::debug_viz::{DebugImage, height_to_grey, steepness_to_color};
use crate::decal::HeightmapDecal;
use crate::error::TerrainError;
use crate::noise_gen::NoiseGenerator;

/// Seed offset between consecutive faces.
const FACE_SEED_STEP: u32 = 10;

const DECAL_SCALE_MIN: f32 = 0.1;
const DECAL_SCALE_MAX: f32 = 0.6;

/// One face of the cube, in generation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CubeFace {
    XPos,
    XNeg,
    YPos,
    YNeg,
    ZPos,
    ZNeg,
}

impl CubeFace {
    pub const ALL: [CubeFace; 6] = [
        CubeFace::XPos,
        CubeFace::XNeg,
        CubeFace::YPos,
        CubeFace::YNeg,
        CubeFace::ZPos,
        CubeFace::ZNeg,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            CubeFace::XPos => "XPos",
            CubeFace::XNeg => "XNeg",
            CubeFace::YPos => "YPos",
            CubeFace::YNeg => "YNeg",
            CubeFace::ZPos => "ZPos",
            CubeFace::ZNeg => "ZNeg",
        }
    }
}

/// Height maps for the six faces of a cube, each `resolution²` values in `[-1, 1]`
/// before decals are applied.
///
/// A direction is sampled by blending the three faces it points towards,
/// weighted by the absolute value of each component.
#[derive(Debug)]
pub struct NoiseCube {
    resolution: u32,
    faces: [Vec<f32>; 6],
    steepness: OnceLock<[Vec<f32>; 6]>,
}

impl NoiseCube {
    /// Fill all six faces from a fractal generator.
    ///
    /// Face `i` uses seed `seed + 10 * i` and reads the 2D noise plane at
    /// `(i + x / res, y / res)`, so faces never share a noise window.
    pub fn generate(config: &NoiseConfig, seed: u32, resolution: u32) -> Result<Self, TerrainError> {
        if resolution < 2 {
            return Err(TerrainError::InvalidResolution(resolution));
        }

        let faces: [Vec<f32>; 6] = std::thread::scope(|scope| {
            let handles = CubeFace::ALL.map(|face| {
                scope.spawn(move || {
                    let face_seed = seed.wrapping_add(FACE_SEED_STEP * face.index() as u32);
                    let generator = NoiseGenerator::new(config, face_seed);
                    fill_face(&generator, resolution, face.index() as f64)
                })
            });
            handles.map(|handle| match handle.join() {
                Ok(face) => face,
                Err(panic) => std::panic::resume_unwind(panic),
            })
        });

        debug!(seed, resolution, "Generated noise cube");
        Ok(Self::from_faces(resolution, faces))
    }

    fn from_faces(resolution: u32, faces: [Vec<f32>; 6]) -> Self {
        Self {
            resolution,
            faces,
            steepness: OnceLock::new(),
        }
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn face(&self, face: CubeFace) -> &[f32] {
        &self.faces[face.index()]
    }

    /// Blend the three faces `normal` points towards.
    pub fn sample(&self, normal: Vec3) -> f32 {
        let x_face = if normal.x > 0.0 { CubeFace::XPos } else { CubeFace::XNeg };
        let y_face = if normal.y > 0.0 { CubeFace::YPos } else { CubeFace::YNeg };
        let z_face = if normal.z > 0.0 { CubeFace::ZPos } else { CubeFace::ZNeg };

        let h_x = self.read(&self.faces[x_face.index()], normal.y, normal.z);
        let h_y = self.read(&self.faces[y_face.index()], normal.x, normal.z);
        let h_z = self.read(&self.faces[z_face.index()], normal.x, normal.y);

        normal.x.abs() * h_x + normal.y.abs() * h_y + normal.z.abs() * h_z
    }

    /// Average steepness around `normal`, roughly in `[0, 1]`. Zero for a zero vector.
    pub fn sample_steepness(&self, normal: Vec3) -> f32 {
        let n = normal.normalize_or_zero();
        if n == Vec3::ZERO {
            return 0.0;
        }
        let steepness = self.steepness_faces();

        let x_face = if n.x > 0.0 { CubeFace::XPos } else { CubeFace::XNeg };
        let y_face = if n.y > 0.0 { CubeFace::YPos } else { CubeFace::YNeg };
        let z_face = if n.z > 0.0 { CubeFace::ZPos } else { CubeFace::ZNeg };

        let s_x = self.read(&steepness[x_face.index()], n.y, n.z);
        let s_y = self.read(&steepness[y_face.index()], n.x, n.z);
        let s_z = self.read(&steepness[z_face.index()], n.x, n.y);

        (n.x.abs() * s_x + n.y.abs() * s_y + n.z.abs() * s_z) / 3.0
    }

    /// Per-face steepness maps, computed on first use.
    pub fn steepness_faces(&self) -> &[Vec<f32>; 6] {
        self.steepness.get_or_init(|| {
            let res = self.resolution as usize;
            self.faces.each_ref().map(|heights| steepness_map(heights, res))
        })
    }

    /// Scatter every decal's placements randomly over the six faces.
    ///
    /// Decals that fail to apply are logged and skipped. Returns the number of
    /// placements made.
    pub fn apply_decals<R: Rng + ?Sized>(&mut self, decals: &[HeightmapDecal], rng: &mut R) -> u32 {
        let mut placed = 0;
        for decal in decals {
            let mut per_face = [0u32; 6];
            for _ in 0..decal.max_frequency() {
                per_face[rng.random_range(0..6)] += 1;
            }

            for face in CubeFace::ALL {
                let count = per_face[face.index()];
                if count == 0 {
                    continue;
                }
                let scale = rng.random_range(DECAL_SCALE_MIN..=DECAL_SCALE_MAX);
                let map = &mut self.faces[face.index()];
                match decal.apply(map, self.resolution, scale, count, true, rng) {
                    Ok(()) => placed += count,
                    Err(e) => warn!(face = face.name(), "Skipping heightmap decal: {e}"),
                }
            }
        }
        self.steepness = OnceLock::new();
        placed
    }

    pub fn face_image(&self, face: CubeFace) -> DebugImage {
        let res = self.resolution;
        let heights = &self.faces[face.index()];
        DebugImage::from_fn(res, res, |x, y| {
            height_to_grey(heights[(y * res + x) as usize])
        })
    }

    pub fn steepness_image(&self, face: CubeFace) -> DebugImage {
        let res = self.resolution;
        let steepness = &self.steepness_faces()[face.index()];
        DebugImage::from_fn(res, res, |x, y| {
            steepness_to_color(steepness[(y * res + x) as usize])
        })
    }

    /// Read the pixel addressed by two direction components in `[-1, 1]`.
    fn read(&self, data: &[f32], u: f32, v: f32) -> f32 {
        let res = self.resolution as usize;
        let x = pixel_index(u, res);
        let y = pixel_index(v, res);
        data[y * res + x]
    }
}

fn pixel_index(component: f32, res: usize) -> usize {
    // Float-to-int casts saturate, so negatives and NaN land on 0.
    (((component + 1.0) * 0.5 * res as f32) as usize).min(res - 1)
}

fn fill_face(generator: &NoiseGenerator, resolution: u32, offset: f64) -> Vec<f32> {
    let res = resolution as usize;
    let step = 1.0 / resolution as f64;
    let mut heights = Vec::with_capacity(res * res);
    for y in 0..res {
        for x in 0..res {
            heights.push(generator.get_2d(offset + x as f64 * step, y as f64 * step));
        }
    }
    heights
}

/// Forward differences. The last row and column stay zero.
fn steepness_map(heights: &[f32], res: usize) -> Vec<f32> {
    let mut out = vec![0.0; res * res];
    for y in 0..res.saturating_sub(1) {
        for x in 0..res - 1 {
            let h = heights[y * res + x];
            let dx = heights[y * res + x + 1] - h;
            let dy = heights[(y + 1) * res + x] - h;
            out[y * res + x] = dx.abs() + dy.abs();
        }
    }
    out
}
