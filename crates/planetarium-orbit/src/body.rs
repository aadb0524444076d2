//! Orbital elements and spline sampling for a single body.
//!
//! An [`OrbitalBody`] owns its orbit shape; the parent position it circles is
//! supplied each tick by the [`OrbitalSystem`](crate::OrbitalSystem).

use glam::{DQuat, DVec3, EulerRot};
use planetarium_config::BodyConfig;

use crate::ellipse::semi_minor_axis;
use crate::spline::OrbitSpline;

/// A body that travels along an elliptical spline around its parent.
///
/// Orbital elements are edited through setters so the derived semi-minor
/// axis and the periapsis clamp stay consistent.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitalBody {
    name: String,
    position: DVec3,
    /// Accumulated self-rotation in degrees (pitch, yaw, roll).
    rotation: DVec3,
    rotation_rate: DVec3,
    angular_velocity: f64,
    t: f64,
    t_offset: f64,
    inclination: f64,
    periapsis_longitude: f64,
    periapsis_latitude: f64,
    periapsis_height: f64,
    semi_major_axis: f64,
    semi_minor_axis: f64,
    eccentricity: f64,
    max_spline_points: usize,
    mobile: bool,
    spline: Option<OrbitSpline>,
}

impl OrbitalBody {
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_config(&BodyConfig {
            name: name.into(),
            ..BodyConfig::default()
        })
    }

    pub fn from_config(config: &BodyConfig) -> Self {
        let mut body = Self {
            name: config.name.clone(),
            position: DVec3::from_array(config.position),
            rotation: DVec3::ZERO,
            rotation_rate: DVec3::from_array(config.rotation_rate),
            angular_velocity: config.angular_velocity,
            t: config.t_offset,
            t_offset: config.t_offset,
            inclination: config.inclination,
            periapsis_longitude: config.periapsis_longitude,
            periapsis_latitude: config.periapsis_latitude,
            periapsis_height: config.periapsis_height,
            semi_major_axis: config.semi_major_axis.max(0.0),
            semi_minor_axis: 0.0,
            eccentricity: config.eccentricity,
            max_spline_points: config.max_spline_points,
            mobile: config.mobile,
            spline: None,
        };
        body.set_eccentricity(config.eccentricity);
        body
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> DVec3 {
        self.position
    }

    pub fn set_position(&mut self, position: DVec3) {
        self.position = position;
    }

    /// Accumulated self-rotation in degrees.
    pub fn rotation_degrees(&self) -> DVec3 {
        self.rotation
    }

    pub fn orientation(&self) -> DQuat {
        let r = self.rotation;
        DQuat::from_euler(
            EulerRot::ZYX,
            r.y.to_radians(),
            r.x.to_radians(),
            r.z.to_radians(),
        )
    }

    pub fn angular_velocity(&self) -> f64 {
        self.angular_velocity
    }

    pub fn set_angular_velocity(&mut self, angular_velocity: f64) {
        self.angular_velocity = angular_velocity;
    }

    /// Seconds travelled along the current lap.
    pub fn time(&self) -> f64 {
        self.t
    }

    pub fn t_offset(&self) -> f64 {
        self.t_offset
    }

    /// Also restarts the body from the new offset.
    pub fn set_t_offset(&mut self, t_offset: f64) {
        self.t_offset = t_offset;
        self.t = t_offset;
    }

    pub fn reset_time(&mut self) {
        self.t = self.t_offset;
    }

    pub fn inclination(&self) -> f64 {
        self.inclination
    }

    pub fn set_inclination(&mut self, degrees: f64) {
        self.inclination = degrees;
    }

    pub fn periapsis_longitude(&self) -> f64 {
        self.periapsis_longitude
    }

    pub fn set_periapsis_longitude(&mut self, degrees: f64) {
        self.periapsis_longitude = degrees;
    }

    pub fn periapsis_latitude(&self) -> f64 {
        self.periapsis_latitude
    }

    pub fn set_periapsis_latitude(&mut self, degrees: f64) {
        self.periapsis_latitude = degrees;
    }

    pub fn periapsis_height(&self) -> f64 {
        self.periapsis_height
    }

    /// Clamped to `[0, semi_major_axis]`.
    pub fn set_periapsis_height(&mut self, height: f64) {
        self.periapsis_height = height.clamp(0.0, self.semi_major_axis);
    }

    pub fn semi_major_axis(&self) -> f64 {
        self.semi_major_axis
    }

    pub fn set_semi_major_axis(&mut self, a: f64) {
        self.semi_major_axis = a.max(0.0);
        self.set_eccentricity(self.eccentricity);
    }

    pub fn semi_minor_axis(&self) -> f64 {
        self.semi_minor_axis
    }

    pub fn eccentricity(&self) -> f64 {
        self.eccentricity
    }

    /// Clamped to `[0, 1]`. Recomputes the semi-minor axis and re-clamps the
    /// periapsis height.
    pub fn set_eccentricity(&mut self, e: f64) {
        self.eccentricity = e.clamp(0.0, 1.0);
        self.semi_minor_axis = semi_minor_axis(self.semi_major_axis, self.eccentricity);
        self.periapsis_height = self.periapsis_height.clamp(0.0, self.semi_major_axis);
    }

    pub fn max_spline_points(&self) -> usize {
        self.max_spline_points
    }

    pub fn set_max_spline_points(&mut self, points: usize) {
        self.max_spline_points = points;
    }

    pub fn is_mobile(&self) -> bool {
        self.mobile
    }

    pub fn set_mobile(&mut self, mobile: bool) {
        self.mobile = mobile;
    }

    /// Degrees per second (pitch, yaw, roll).
    pub fn rotation_rate(&self) -> DVec3 {
        self.rotation_rate
    }

    pub fn set_rotation_rate(&mut self, rate: DVec3) {
        self.rotation_rate = rate;
    }

    pub fn spline(&self) -> Option<&OrbitSpline> {
        self.spline.as_ref()
    }

    pub fn spline_mut(&mut self) -> Option<&mut OrbitSpline> {
        self.spline.as_mut()
    }

    /// Replace the orbit with a fresh spline around `center`.
    pub fn rebuild_spline(&mut self, center: DVec3) {
        self.spline = Some(OrbitSpline::for_body(self, self.max_spline_points, center));
    }

    /// Move to the spline location for the current time.
    ///
    /// Overshooting the loop restarts the lap at `t = 0` with the body held at
    /// the end of the loop for this update. A non-positive distance maps to
    /// the end of the loop. Without a spline the position is unchanged.
    pub fn update_position(&mut self) {
        let Some(spline) = &self.spline else {
            return;
        };
        let length = spline.length();
        let mut dist = self.angular_velocity * self.t;
        if dist > length {
            self.t = 0.0;
        } else if dist <= 0.0 {
            dist = length;
        }
        self.position = spline.location_at_distance(dist);
    }

    /// Advance time, follow the spline and spin. Immobile bodies do nothing.
    pub fn tick(&mut self, dt: f64) {
        if !self.mobile {
            return;
        }
        self.t += dt;
        self.update_position();
        self.rotation += self.rotation_rate * dt;
    }
}
