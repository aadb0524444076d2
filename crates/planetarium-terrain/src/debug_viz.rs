//! RGBA debug images for noise cube faces and steepness maps.

use std::io::Cursor;
use std::path::Path;

use crate::error::TerrainError;

/// Bytes needed for a `width` x `height` RGBA image.
fn byte_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 4
}

/// A 2D debug image stored as row-major RGBA pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DebugImage {
    pub width: u32,
    pub height: u32,
    /// Length = `width * height * 4`.
    pub pixels: Vec<u8>,
}

impl DebugImage {
    /// A transparent black image.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; byte_len(width, height)],
        }
    }

    /// Build an image by evaluating `color` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut color: impl FnMut(u32, u32) -> [u8; 4]) -> Self {
        let mut image = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let [r, g, b, a] = color(x, y);
                image.set_pixel(x, y, r, g, b, a);
            }
        }
        image
    }

    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    pub fn set_pixel(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8, a: u8) {
        let idx = self.byte_offset(x, y);
        self.pixels[idx..idx + 4].copy_from_slice(&[r, g, b, a]);
    }

    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    pub fn get_pixel(&self, x: u32, y: u32) -> (u8, u8, u8, u8) {
        let idx = self.byte_offset(x, y);
        (
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        )
    }

    fn byte_offset(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{} image",
            self.width,
            self.height
        );
        (y as usize * self.width as usize + x as usize) * 4
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Count distinct colors, ignoring alpha.
    pub fn unique_color_count(&self) -> usize {
        let mut colors = std::collections::HashSet::new();
        for chunk in self.pixels.chunks_exact(4) {
            colors.insert((chunk[0], chunk[1], chunk[2]));
        }
        colors.len()
    }

    /// Encode as an 8-bit RGBA PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>, TerrainError> {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut encoder = png::Encoder::new(&mut buf, self.width, self.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header()?;
            writer.write_image_data(&self.pixels)?;
        }
        Ok(buf.into_inner())
    }

    pub fn write_png(&self, path: &Path) -> Result<(), TerrainError> {
        let bytes = self.encode_png()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

/// Map a height in `[-1, 1]` to an opaque grey.
pub fn height_to_grey(height: f32) -> [u8; 4] {
    let v = (((height + 1.0) * 0.5).clamp(0.0, 1.0) * 255.0) as u8;
    [v, v, v, 255]
}

/// Green for flat ground, through yellow, to red for cliffs.
pub fn steepness_to_color(steepness: f32) -> [u8; 4] {
    let s = steepness.clamp(0.0, 1.0);
    if s > 0.5 {
        [255, (255.0 - s * 255.0) as u8, 0, 255]
    } else {
        [(s * 255.0) as u8, 255, 0, 255]
    }
}
