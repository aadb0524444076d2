//! Heightmap decals: small square height images stamped onto noise maps.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use planetarium_config::SurfaceFeatureConfig;
use rand::Rng;

use crate::error::DecalError;

/// A square grid of heights in `[0, 1]` that can be stamped onto a noise map.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightmapDecal {
    resolution: u32,
    heights: Vec<f32>,
    max_frequency: u32,
}

impl HeightmapDecal {
    /// Wrap raw heights. Validation happens when the decal is applied.
    pub fn from_heights(resolution: u32, heights: Vec<f32>, max_frequency: u32) -> Self {
        Self {
            resolution,
            heights,
            max_frequency,
        }
    }

    /// One byte per pixel, mapped from `0..=255` to `[0, 1]`.
    pub fn from_luma(resolution: u32, data: &[u8], max_frequency: u32) -> Self {
        let heights = data.iter().map(|&b| b as f32 / 255.0).collect();
        Self::from_heights(resolution, heights, max_frequency)
    }

    /// Decode a square PNG and keep its red (or grey) channel.
    pub fn from_png(path: &Path, max_frequency: u32) -> Result<Self, DecalError> {
        let file = File::open(path).map_err(|source| DecalError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut decoder = png::Decoder::new(BufReader::new(file));
        decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
        let mut reader = decoder.read_info()?;
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf)?;

        if info.width != info.height {
            return Err(DecalError::NotSquare {
                width: info.width,
                height: info.height,
            });
        }

        let channels = info.color_type.samples();
        let mut red = Vec::with_capacity((info.width * info.height) as usize);
        for row in buf.chunks(info.line_size).take(info.height as usize) {
            red.extend(row.chunks(channels).take(info.width as usize).map(|px| px[0]));
        }

        Ok(Self::from_luma(info.width, &red, max_frequency))
    }

    /// Load the heightmap named by a surface feature.
    pub fn from_feature(feature: &SurfaceFeatureConfig) -> Result<Self, DecalError> {
        Self::from_png(&feature.heightmap, feature.max_amount)
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Maximum number of placements across a whole noise cube.
    pub fn max_frequency(&self) -> u32 {
        self.max_frequency
    }

    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    /// Stamp the decal `count` times onto a square `map`.
    ///
    /// The decal is resized by `scale` with nearest-neighbour sampling and each
    /// copy is placed at a random position that keeps it fully inside the map.
    pub fn apply<R: Rng + ?Sized>(
        &self,
        map: &mut [f32],
        map_resolution: u32,
        scale: f32,
        count: u32,
        additive: bool,
        rng: &mut R,
    ) -> Result<(), DecalError> {
        let res = self.resolution as usize;
        if self.heights.len() != res * res || self.heights.len() < 2 {
            return Err(DecalError::Uninitialised);
        }

        let map_res = map_resolution as usize;
        let decal_res = (res as f32 * scale) as usize;
        if decal_res > map_res {
            return Err(DecalError::TooLarge {
                decal: decal_res,
                map: map_res,
            });
        }
        if map.len() != map_res * map_res {
            return Err(DecalError::ResolutionMismatch {
                expected: map_res * map_res,
                actual: map.len(),
            });
        }
        if decal_res == 0 {
            return Ok(());
        }

        for _ in 0..count {
            let start_x = rng.random_range(0..=map_res - decal_res);
            let start_y = rng.random_range(0..=map_res - decal_res);

            for oy in 0..decal_res {
                let sy = ((oy as f32 / scale) as usize).min(res - 1);
                for ox in 0..decal_res {
                    let sx = ((ox as f32 / scale) as usize).min(res - 1);
                    let value = self.heights[sy * res + sx];
                    let target = &mut map[(start_y + oy) * map_res + start_x + ox];
                    if additive {
                        *target += value;
                    } else {
                        *target = value;
                    }
                }
            }
        }

        Ok(())
    }
}
