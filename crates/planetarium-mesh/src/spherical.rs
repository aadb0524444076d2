//! Spherical coordinates and sphere texture mapping.

use std::f32::consts::PI;

use glam::{Vec2, Vec3};

/// A point as polar angle `phi` from +Z, azimuth `theta` in the XY plane, and radius.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SphericalCoords {
    pub theta: f32,
    pub phi: f32,
    pub radius: f32,
}

impl SphericalCoords {
    /// The zero vector maps to all zeros.
    pub fn from_cartesian(v: Vec3) -> Self {
        let radius = v.length();
        if radius == 0.0 {
            return Self::default();
        }
        Self {
            theta: v.y.atan2(v.x),
            phi: (v.z / radius).clamp(-1.0, 1.0).acos(),
            radius,
        }
    }

    pub fn to_cartesian(self) -> Vec3 {
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        self.radius * Vec3::new(sin_phi * cos_theta, sin_phi * sin_theta, cos_phi)
    }
}

/// Equirectangular UV for a unit direction.
pub fn sphere_uv(dir: Vec3) -> Vec2 {
    Vec2::new(0.5 + dir.x.atan2(dir.z) / (2.0 * PI), 0.5 + dir.y * 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cartesian_roundtrip() {
        for v in [
            Vec3::new(3.0, -4.0, 12.0),
            Vec3::new(-1.0, 0.5, -0.25),
            Vec3::new(0.0, 0.0, 7.0),
        ] {
            let back = SphericalCoords::from_cartesian(v).to_cartesian();
            assert!((back - v).length() < 1e-4, "{v} came back as {back}");
        }
    }

    #[test]
    fn test_zero_vector() {
        assert_eq!(SphericalCoords::from_cartesian(Vec3::ZERO), SphericalCoords::default());
    }

    #[test]
    fn test_pole_angles() {
        let north = SphericalCoords::from_cartesian(Vec3::new(0.0, 0.0, 2.0));
        assert_eq!(north.radius, 2.0);
        assert!(north.phi.abs() < 1e-6);
        let south = SphericalCoords::from_cartesian(Vec3::NEG_Z);
        assert!((south.phi - PI).abs() < 1e-6);
    }

    #[test]
    fn test_sphere_uv_ranges() {
        assert_eq!(sphere_uv(Vec3::Z), Vec2::new(0.5, 0.5));
        assert_eq!(sphere_uv(Vec3::Y).y, 1.0);
        assert_eq!(sphere_uv(Vec3::NEG_Y).y, 0.0);
        assert!((sphere_uv(Vec3::X).x - 0.75).abs() < 1e-6);
    }
}
