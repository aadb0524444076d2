//! Closed Catmull-Rom splines that orbiting bodies follow.

use glam::{DQuat, DVec3, EulerRot};

use crate::body::OrbitalBody;
use crate::ellipse::{MIN_ELLIPSE_POINTS, ellipse_points};
use crate::error::OrbitError;

const SAMPLES_PER_SEGMENT: usize = 32;

/// A closed loop through control points, stored in a local frame that is
/// rotated and then translated to `center`.
///
/// Distances are arc lengths measured from the first control point.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitSpline {
    points: Vec<DVec3>,
    rotation: DQuat,
    center: DVec3,
    /// `(distance, parameter)` pairs, ascending in both.
    arc_table: Vec<(f64, f64)>,
    length: f64,
}

impl OrbitSpline {
    pub fn new(points: Vec<DVec3>, rotation: DQuat, center: DVec3) -> Result<Self, OrbitError> {
        if points.len() < MIN_ELLIPSE_POINTS {
            return Err(OrbitError::TooFewPoints {
                count: points.len(),
                min: MIN_ELLIPSE_POINTS,
            });
        }
        let mut spline = Self {
            points,
            rotation,
            center,
            arc_table: Vec::new(),
            length: 0.0,
        };
        spline.rebuild_arc_table();
        Ok(spline)
    }

    /// The orbit of `body` around a parent at `center`.
    ///
    /// The ellipse is shifted along X so its near end sits `periapsis_height`
    /// from the parent, tilted about X by the inclination, then turned by
    /// yaw = periapsis longitude and pitch = periapsis latitude. Z is the
    /// normal of an uninclined orbit plane.
    pub fn for_body(body: &OrbitalBody, point_count: usize, center: DVec3) -> Self {
        let a = body.semi_major_axis();
        let shift = DVec3::X * (a - body.periapsis_height());
        let tilt = DQuat::from_rotation_x(body.inclination().to_radians());
        let points = ellipse_points(a, body.semi_minor_axis(), point_count.max(MIN_ELLIPSE_POINTS))
            .into_iter()
            .map(|p| tilt * (p + shift))
            .collect();
        let rotation = DQuat::from_euler(
            EulerRot::ZYX,
            body.periapsis_longitude().to_radians(),
            body.periapsis_latitude().to_radians(),
            0.0,
        );

        let mut spline = Self {
            points,
            rotation,
            center,
            arc_table: Vec::new(),
            length: 0.0,
        };
        spline.rebuild_arc_table();
        spline
    }

    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    pub fn rotation(&self) -> DQuat {
        self.rotation
    }

    pub fn center(&self) -> DVec3 {
        self.center
    }

    /// Move the whole loop. Lengths are unaffected.
    pub fn set_center(&mut self, center: DVec3) {
        self.center = center;
    }

    /// Total arc length of the closed loop.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// World-space point `distance` along the loop, clamped to `[0, length]`.
    pub fn location_at_distance(&self, distance: f64) -> DVec3 {
        self.center + self.rotation * self.local_location_at_distance(distance)
    }

    /// Like [`location_at_distance`](Self::location_at_distance), before rotation and translation.
    pub fn local_location_at_distance(&self, distance: f64) -> DVec3 {
        let d = if distance.is_nan() {
            0.0
        } else {
            distance.clamp(0.0, self.length)
        };
        let idx = self.arc_table.partition_point(|&(dist, _)| dist < d);
        let param = match idx {
            0 => 0.0,
            i if i >= self.arc_table.len() => self.points.len() as f64,
            i => {
                let (d0, p0) = self.arc_table[i - 1];
                let (d1, p1) = self.arc_table[i];
                let span = d1 - d0;
                if span <= f64::EPSILON {
                    p1
                } else {
                    p0 + (p1 - p0) * (d - d0) / span
                }
            }
        };
        self.point_at_param(param)
    }

    /// Point at spline parameter `param`, where each control point interval spans 1.
    fn point_at_param(&self, param: f64) -> DVec3 {
        let n = self.points.len();
        let wrapped = param.rem_euclid(n as f64);
        let segment = (wrapped.floor() as usize).min(n - 1);
        let t = wrapped - segment as f64;

        let p0 = self.points[(segment + n - 1) % n];
        let p1 = self.points[segment];
        let p2 = self.points[(segment + 1) % n];
        let p3 = self.points[(segment + 2) % n];

        let t2 = t * t;
        let t3 = t2 * t;
        0.5 * (2.0 * p1
            + (p2 - p0) * t
            + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
            + (3.0 * p1 - p0 - 3.0 * p2 + p3) * t3)
    }

    fn rebuild_arc_table(&mut self) {
        let steps = self.points.len() * SAMPLES_PER_SEGMENT;
        let mut table = Vec::with_capacity(steps + 1);
        let mut total = 0.0;
        let mut prev = self.point_at_param(0.0);
        table.push((0.0, 0.0));
        for i in 1..=steps {
            let param = i as f64 / SAMPLES_PER_SEGMENT as f64;
            let p = self.point_at_param(param);
            total += p.distance(prev);
            table.push((total, param));
            prev = p;
        }
        self.arc_table = table;
        self.length = total;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planetarium_config::BodyConfig;
    use std::f64::consts::TAU;

    fn circle(radius: f64, n: usize) -> OrbitSpline {
        OrbitSpline::new(ellipse_points(radius, radius, n), DQuat::IDENTITY, DVec3::ZERO).unwrap()
    }

    #[test]
    fn test_rejects_too_few_points() {
        let err = OrbitSpline::new(vec![DVec3::ZERO; 3], DQuat::IDENTITY, DVec3::ZERO).unwrap_err();
        assert_eq!(err, OrbitError::TooFewPoints { count: 3, min: 4 });
    }

    #[test]
    fn test_circle_length_close_to_circumference() {
        let spline = circle(1000.0, 20);
        let expected = TAU * 1000.0;
        let rel = (spline.length() - expected).abs() / expected;
        assert!(rel < 0.01, "length {} vs {expected}", spline.length());
    }

    #[test]
    fn test_passes_through_control_points() {
        let spline = circle(100.0, 8);
        assert!((spline.location_at_distance(0.0) - DVec3::new(100.0, 0.0, 0.0)).length() < 1e-9);
        let end = spline.location_at_distance(spline.length());
        assert!((end - DVec3::new(100.0, 0.0, 0.0)).length() < 1e-6, "loop must close, got {end}");
    }

    #[test]
    fn test_distance_clamped() {
        let spline = circle(50.0, 12);
        assert_eq!(spline.location_at_distance(-10.0), spline.location_at_distance(0.0));
        assert_eq!(
            spline.location_at_distance(spline.length() * 3.0),
            spline.location_at_distance(spline.length())
        );
    }

    #[test]
    fn test_quarter_distance_reaches_quarter_angle() {
        let spline = circle(100.0, 16);
        let p = spline.location_at_distance(spline.length() / 4.0);
        assert!((p - DVec3::new(0.0, 100.0, 0.0)).length() < 1.0, "got {p}");
    }

    #[test]
    fn test_center_translates_points() {
        let mut spline = circle(10.0, 8);
        let before = spline.location_at_distance(3.0);
        spline.set_center(DVec3::new(5.0, -5.0, 1.0));
        assert_eq!(spline.location_at_distance(3.0), before + DVec3::new(5.0, -5.0, 1.0));
        assert_eq!(spline.length(), circle(10.0, 8).length());
    }

    #[test]
    fn test_body_orbit_periapsis_distance() {
        let body = OrbitalBody::from_config(&BodyConfig {
            semi_major_axis: 1000.0,
            eccentricity: 0.5,
            periapsis_height: 200.0,
            ..BodyConfig::default()
        });
        let spline = OrbitSpline::for_body(&body, 20, DVec3::ZERO);
        let nearest = spline
            .points()
            .iter()
            .map(|p| p.length())
            .fold(f64::INFINITY, f64::min);
        assert!((nearest - 200.0).abs() < 1e-9, "nearest control point at {nearest}");
        assert_eq!(spline.points()[0], DVec3::new(1800.0, 0.0, 0.0));
    }

    #[test]
    fn test_body_orbit_inclination_tilts_plane() {
        let body = OrbitalBody::from_config(&BodyConfig {
            semi_major_axis: 1000.0,
            inclination: 90.0,
            periapsis_height: 1000.0,
            ..BodyConfig::default()
        });
        let spline = OrbitSpline::for_body(&body, 8, DVec3::ZERO);
        // A quarter turn about X moves the +Y extreme onto ±Z.
        let p = spline.points()[2];
        assert!(p.y.abs() < 1e-9 && (p.z.abs() - 1000.0).abs() < 1e-9, "got {p}");
    }

    #[test]
    fn test_body_orbit_longitude_rotates_about_z() {
        let body = OrbitalBody::from_config(&BodyConfig {
            semi_major_axis: 100.0,
            periapsis_height: 100.0,
            periapsis_longitude: 90.0,
            ..BodyConfig::default()
        });
        let spline = OrbitSpline::for_body(&body, 4, DVec3::ZERO);
        let start = spline.location_at_distance(0.0);
        assert!((start - DVec3::new(0.0, 100.0, 0.0)).length() < 1e-9, "got {start}");
    }
}
