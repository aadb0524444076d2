//! Axis-aligned ellipse helpers. Ellipses are centred on the origin with the
//! major axis along X.

use glam::DVec3;
use tracing::warn;

/// Fewest points an orbit ellipse is sampled with.
pub const MIN_ELLIPSE_POINTS: usize = 4;

/// `b = a * sqrt(1 - e²)`.
pub fn semi_minor_axis(semi_major_axis: f64, eccentricity: f64) -> f64 {
    semi_major_axis * (1.0 - eccentricity * eccentricity).sqrt()
}

/// `count` points evenly spaced in angle, `(a cos θ, b sin θ, 0)`.
///
/// Fewer than [`MIN_ELLIPSE_POINTS`] is raised to that minimum.
pub fn ellipse_points(a: f64, b: f64, count: usize) -> Vec<DVec3> {
    let count = if count < MIN_ELLIPSE_POINTS {
        warn!(count, "Ellipse needs at least {MIN_ELLIPSE_POINTS} points, using {MIN_ELLIPSE_POINTS}");
        MIN_ELLIPSE_POINTS
    } else {
        count
    };

    let step = std::f64::consts::TAU / count as f64;
    (0..count)
        .map(|i| {
            let angle = i as f64 * step;
            DVec3::new(a * angle.cos(), b * angle.sin(), 0.0)
        })
        .collect()
}

/// Positive `x` on the ellipse at height `y`. NaN when `|y| > b`.
pub fn solve_ellipse_for_x(a: f64, b: f64, y: f64) -> f64 {
    ((1.0 - (y * y) / (b * b)) * a * a).sqrt()
}

/// Positive `y` on the ellipse at `x`. NaN when `|x| > a`.
pub fn solve_ellipse_for_y(a: f64, b: f64, x: f64) -> f64 {
    ((1.0 - (x * x) / (a * a)) * b * b).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_has_equal_axes() {
        assert_eq!(semi_minor_axis(100.0, 0.0), 100.0);
        assert!((semi_minor_axis(100.0, 0.6) - 80.0).abs() < 1e-9);
        assert_eq!(semi_minor_axis(100.0, 1.0), 0.0);
    }

    #[test]
    fn test_points_lie_on_ellipse() {
        let (a, b) = (300.0, 200.0);
        let points = ellipse_points(a, b, 12);
        assert_eq!(points.len(), 12);
        assert_eq!(points[0], DVec3::new(a, 0.0, 0.0));
        for p in &points {
            let v = (p.x / a).powi(2) + (p.y / b).powi(2);
            assert!((v - 1.0).abs() < 1e-9, "{p} is off the ellipse");
            assert_eq!(p.z, 0.0);
        }
        assert!((points[3] - DVec3::new(0.0, b, 0.0)).length() < 1e-9);
    }

    #[test]
    fn test_too_few_points_raised() {
        assert_eq!(ellipse_points(1.0, 1.0, 0).len(), MIN_ELLIPSE_POINTS);
        assert_eq!(ellipse_points(1.0, 1.0, 3).len(), MIN_ELLIPSE_POINTS);
        assert_eq!(ellipse_points(1.0, 1.0, 5).len(), 5);
    }

    #[test]
    fn test_solve_for_axes() {
        assert!((solve_ellipse_for_x(5.0, 3.0, 0.0) - 5.0).abs() < 1e-12);
        assert!((solve_ellipse_for_y(5.0, 3.0, 0.0) - 3.0).abs() < 1e-12);
        assert!((solve_ellipse_for_y(5.0, 3.0, 4.0) - 1.8).abs() < 1e-12);
        assert!(solve_ellipse_for_x(5.0, 3.0, 4.0).is_nan());
    }
}
