//! N-body Newtonian gravity between point masses.
//!
//! Bodies join a [`GravitySystem`] by sending a [`RegisterBodyMessage`]
//! through a registrar channel. Registrations are applied on the next
//! [`GravitySystem::process_registrations`], after which every body is
//! attracted by every other.

use std::f64::consts::PI;

use crossbeam_channel::{Receiver, Sender, unbounded};
use glam::DVec3;
use planetarium_config::{GravityBodyConfig, SystemConfig};
use tracing::{debug, info};

/// Gravitational constant used by the simulation.
pub const G: f64 = 6.673e-11;

/// Squared separation below which two bodies are treated as coincident.
const MIN_SEPARATION_SQ: f64 = 1e-12;

/// A point mass with a radius derived from its density.
#[derive(Debug, Clone, PartialEq)]
pub struct GravityBody {
    pub name: String,
    mass: f64,
    density: f64,
    radius: f64,
    pub position: DVec3,
    pub velocity: DVec3,
    pub acceleration: DVec3,
}

impl GravityBody {
    pub fn new(name: impl Into<String>, mass: f64, density: f64) -> Self {
        let mut body = Self {
            name: name.into(),
            mass: 0.0,
            density: 0.0,
            radius: 0.0,
            position: DVec3::ZERO,
            velocity: DVec3::ZERO,
            acceleration: DVec3::ZERO,
        };
        body.set_mass_density(mass, density);
        body
    }

    pub fn from_config(config: &GravityBodyConfig) -> Self {
        let mut body = Self::new(config.name.clone(), config.mass, config.density);
        body.position = DVec3::from_array(config.position);
        body.velocity = DVec3::from_array(config.velocity);
        body
    }

    pub fn with_position(mut self, position: DVec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_velocity(mut self, velocity: DVec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    /// Radius of a sphere with this mass and density. Zero when density is zero.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Negative values are clamped to zero. Updates the radius.
    pub fn set_mass_density(&mut self, mass: f64, density: f64) {
        self.mass = mass.max(0.0);
        self.density = density.max(0.0);
        self.radius = if self.density > 0.0 {
            let volume = self.mass / self.density;
            (3.0 * volume / (4.0 * PI)).cbrt()
        } else {
            0.0
        };
    }

    /// Sum of the attraction towards every body in `others`. Bodies at the
    /// same position contribute nothing.
    pub fn net_force<'a>(&self, others: impl IntoIterator<Item = &'a GravityBody>) -> DVec3 {
        others
            .into_iter()
            .filter_map(|other| {
                let offset = other.position - self.position;
                let r_sq = offset.length_squared();
                if r_sq < MIN_SEPARATION_SQ {
                    return None;
                }
                let magnitude = G * self.mass * other.mass / r_sq;
                Some(offset / r_sq.sqrt() * magnitude)
            })
            .sum()
    }

    /// `F / m`, or zero for a massless body.
    pub fn acceleration_from_force(&self, force: DVec3) -> DVec3 {
        if self.mass > 0.0 {
            force / self.mass
        } else {
            DVec3::ZERO
        }
    }

    /// Move by `v t + ½ a t²` and update velocity by `a t`.
    pub fn integrate(&mut self, t: f64) {
        self.position += self.velocity * t + 0.5 * self.acceleration * t * t;
        self.velocity += self.acceleration * t;
    }

    pub fn momentum(&self) -> DVec3 {
        self.velocity * self.mass
    }
}

/// Asks a [`GravitySystem`] to add a body.
#[derive(Debug, Clone)]
pub struct RegisterBodyMessage {
    pub body: GravityBody,
}

impl RegisterBodyMessage {
    pub fn new(body: GravityBody) -> Self {
        Self { body }
    }
}

/// Owns the registered bodies and steps them together.
pub struct GravitySystem {
    bodies: Vec<GravityBody>,
    /// Indices of the bodies each body is attracted by.
    influencing: Vec<Vec<usize>>,
    time_scale: f64,
    registrar: Sender<RegisterBodyMessage>,
    registrations: Receiver<RegisterBodyMessage>,
}

impl GravitySystem {
    pub fn new(time_scale: f64) -> Self {
        let (registrar, registrations) = unbounded();
        Self {
            bodies: Vec::new(),
            influencing: Vec::new(),
            time_scale,
            registrar,
            registrations,
        }
    }

    /// A system with every configured gravity body queued for registration.
    pub fn from_config(config: &SystemConfig) -> Self {
        let system = Self::new(config.time_scale);
        for body in &config.gravity_bodies {
            // The receiver is owned by `system`, so sending cannot fail here.
            let _ = system
                .registrar
                .send(RegisterBodyMessage::new(GravityBody::from_config(body)));
        }
        system
    }

    /// A sender bodies can use to register themselves, from any thread.
    pub fn registrar(&self) -> Sender<RegisterBodyMessage> {
        self.registrar.clone()
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn set_time_scale(&mut self, time_scale: f64) {
        self.time_scale = time_scale;
    }

    pub fn bodies(&self) -> &[GravityBody] {
        &self.bodies
    }

    pub fn body(&self, name: &str) -> Option<&GravityBody> {
        self.bodies.iter().find(|b| b.name == name)
    }

    pub fn influencing(&self, index: usize) -> &[usize] {
        self.influencing.get(index).map(Vec::as_slice).unwrap_or_default()
    }

    /// Apply every pending registration and rebuild each body's influencing
    /// set. Returns how many bodies were added.
    pub fn process_registrations(&mut self) -> usize {
        let mut added = 0;
        while let Ok(message) = self.registrations.try_recv() {
            debug!(body = %message.body.name, mass = message.body.mass(), "Registered gravity body");
            self.bodies.push(message.body);
            added += 1;
        }
        if added > 0 {
            let n = self.bodies.len();
            self.influencing = (0..n)
                .map(|i| (0..n).filter(|&j| j != i).collect())
                .collect();
            info!(added, total = n, "Updated gravity bodies");
        }
        added
    }

    /// Advance the simulation by `dt * time_scale`. All accelerations are
    /// computed from the current positions before any body moves.
    pub fn step(&mut self, dt: f64) {
        let t = dt * self.time_scale;
        let accelerations: Vec<DVec3> = self
            .bodies
            .iter()
            .enumerate()
            .map(|(i, body)| {
                let others = self.influencing(i).iter().map(|&j| &self.bodies[j]);
                body.acceleration_from_force(body.net_force(others))
            })
            .collect();

        for (body, acceleration) in self.bodies.iter_mut().zip(accelerations) {
            body.acceleration = acceleration;
            body.integrate(t);
        }
    }

    pub fn total_momentum(&self) -> DVec3 {
        self.bodies.iter().map(GravityBody::momentum).sum()
    }
}
