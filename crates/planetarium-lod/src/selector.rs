//! Altitude-based LOD selection with horizon capping.

use glam::Vec3;

/// Rejected threshold lists.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LodError {
    #[error("must have at least one threshold")]
    Empty,
    #[error("threshold {index} is {value}, thresholds must be positive")]
    NonPositive { index: usize, value: f64 },
    #[error("threshold {index} is not below its predecessor, thresholds must be strictly decreasing")]
    NotDecreasing { index: usize },
    #[error("{count} thresholds exceed the maximum of {max}")]
    TooMany { count: usize, max: usize },
}

/// LODs are `u8`, so at most this many thresholds fit.
pub const MAX_THRESHOLDS: usize = u8::MAX as usize;

/// Altitude boundaries for LOD 1..=N.
///
/// `thresholds[i]` is the altitude below which a section reaches at least LOD
/// `i + 1`. Higher LODs are finer, so thresholds shrink as the index grows.
#[derive(Clone, Debug, PartialEq)]
pub struct LodThresholds {
    thresholds: Vec<f64>,
}

impl LodThresholds {
    /// 300000, 267210, 226710, 186210, 136710, 96210, 55710, 33000.
    pub fn default_planet() -> Self {
        Self {
            thresholds: vec![
                300_000.0, 267_210.0, 226_710.0, 186_210.0, 136_710.0, 96_210.0, 55_710.0,
                33_000.0,
            ],
        }
    }

    /// # Panics
    ///
    /// Panics if thresholds are empty, not strictly decreasing, or contain
    /// non-positive values.
    pub fn custom(thresholds: Vec<f64>) -> Self {
        match Self::try_custom(thresholds) {
            Ok(t) => t,
            Err(e) => panic!("{e}"),
        }
    }

    pub fn try_custom(thresholds: Vec<f64>) -> Result<Self, LodError> {
        if thresholds.is_empty() {
            return Err(LodError::Empty);
        }
        if thresholds.len() > MAX_THRESHOLDS {
            return Err(LodError::TooMany { count: thresholds.len(), max: MAX_THRESHOLDS });
        }
        for (index, &value) in thresholds.iter().enumerate() {
            if value.is_nan() || value <= 0.0 {
                return Err(LodError::NonPositive { index, value });
            }
            if index > 0 && value >= thresholds[index - 1] {
                return Err(LodError::NotDecreasing { index });
            }
        }
        Ok(Self { thresholds })
    }

    /// The finest LOD these thresholds can produce.
    pub fn max_lod(&self) -> u8 {
        self.thresholds.len() as u8
    }

    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }
}

impl Default for LodThresholds {
    fn default() -> Self {
        Self::default_planet()
    }
}

/// Picks a subdivision level for each planet section.
#[derive(Clone, Debug)]
pub struct LodSelector {
    thresholds: LodThresholds,
    horizon_angle_deg: f64,
    occluded_lod: u8,
}

impl LodSelector {
    pub const DEFAULT_HORIZON_ANGLE_DEG: f64 = 70.0;
    pub const DEFAULT_OCCLUDED_LOD: u8 = 1;

    pub fn new(thresholds: LodThresholds) -> Self {
        Self {
            thresholds,
            horizon_angle_deg: Self::DEFAULT_HORIZON_ANGLE_DEG,
            occluded_lod: Self::DEFAULT_OCCLUDED_LOD,
        }
    }

    /// Sections further than `angle_deg` from the viewer direction are capped at `occluded_lod`.
    pub fn with_horizon(mut self, angle_deg: f64, occluded_lod: u8) -> Self {
        self.horizon_angle_deg = angle_deg;
        self.occluded_lod = occluded_lod;
        self
    }

    pub fn thresholds(&self) -> &LodThresholds {
        &self.thresholds
    }

    pub fn horizon_angle_deg(&self) -> f64 {
        self.horizon_angle_deg
    }

    /// Number of thresholds the altitude is below. 0 far away, `max_lod` up close.
    pub fn lod_for_altitude(&self, altitude: f64) -> u8 {
        self.thresholds
            .thresholds
            .iter()
            .take_while(|&&t| altitude < t)
            .count() as u8
    }

    /// LOD for the section whose centre points along `section_normal`.
    ///
    /// A viewer exactly at the planet centre gets LOD 0 for every section.
    pub fn select_section_lod(
        &self,
        viewer: Vec3,
        planet_center: Vec3,
        planet_radius: f32,
        section_normal: Vec3,
    ) -> u8 {
        let offset = (viewer - planet_center).as_dvec3();
        let Some(to_viewer) = offset.try_normalize() else {
            return 0;
        };

        let cos = section_normal.as_dvec3().normalize_or_zero().dot(to_viewer);
        let angle = cos.clamp(-1.0, 1.0).acos().to_degrees();

        let altitude = (planet_radius as f64 - offset.length()).abs();
        let lod = self.lod_for_altitude(altitude);

        if angle > self.horizon_angle_deg {
            lod.min(self.occluded_lod)
        } else {
            lod
        }
    }
}

impl Default for LodSelector {
    fn default() -> Self {
        Self::new(LodThresholds::default_planet())
    }
}
