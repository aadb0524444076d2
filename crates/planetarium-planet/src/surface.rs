//! Placing objects on a planet's surface.

use glam::{Mat3, Quat, Vec3};

/// Project `point` onto the sphere of `radius` around `center`.
///
/// Returns the world position and a rotation whose up axis (+Y) is the
/// outward surface normal and whose forward axis (-Z) is tangent to the
/// surface. A point at the centre projects to the top of the sphere.
pub fn surface_transform(center: Vec3, radius: f32, point: Vec3) -> (Vec3, Quat) {
    let outward = (point - center).try_normalize().unwrap_or(Vec3::Y);
    let position = center + outward * radius;

    let inward = -outward;
    let towards_up = (center - (point + Vec3::Y)).normalize_or_zero();
    let Some(forward) = inward.cross(towards_up).try_normalize() else {
        return (position, Quat::from_rotation_arc(Vec3::Y, outward));
    };

    let right = forward.cross(outward);
    let rotation = Quat::from_mat3(&Mat3::from_cols(right, outward, -forward));
    (position, rotation.normalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_on_offset_sphere() {
        let center = Vec3::new(10.0, 0.0, -5.0);
        let (pos, _) = surface_transform(center, 120.0, center + Vec3::new(300.0, 400.0, 0.0));
        assert!(((pos - center).length() - 120.0).abs() < 1e-3);
        assert!((pos - center).normalize().dot(Vec3::new(0.6, 0.8, 0.0)) > 0.9999);
    }

    #[test]
    fn test_rotation_up_is_surface_normal() {
        let (pos, rot) = surface_transform(Vec3::ZERO, 50.0, Vec3::new(0.0, 0.0, 80.0));
        let up = rot * Vec3::Y;
        assert!(up.dot(pos.normalize()) > 0.999);
        let forward = rot * Vec3::NEG_Z;
        assert!(forward.dot(up).abs() < 1e-4, "forward must be tangent");
    }

    #[test]
    fn test_pole_falls_back_to_arc() {
        let (pos, rot) = surface_transform(Vec3::ZERO, 10.0, Vec3::new(0.0, 25.0, 0.0));
        assert!((pos - Vec3::new(0.0, 10.0, 0.0)).length() < 1e-5);
        assert!((rot * Vec3::Y - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn test_point_at_center() {
        let (pos, _) = surface_transform(Vec3::ONE, 2.0, Vec3::ONE);
        assert_eq!(pos, Vec3::new(1.0, 3.0, 1.0));
    }
}
