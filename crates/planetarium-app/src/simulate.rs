//! Headless run of the configured orbital and gravity systems.

use std::time::Duration;

use glam::DVec3;
use planetarium_config::Config;
use planetarium_orbit::{GravitySystem, OrbitError, OrbitalSystem};
use tracing::info;

use crate::error::AppError;
use crate::game_loop::{FIXED_DT, GameLoop, SimulatedLoop};

/// Final state of a simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationSummary {
    pub steps: u64,
    pub sim_time: f64,
    /// Name and position of every spline-orbit body.
    pub orbital: Vec<(String, DVec3)>,
    /// Name and position of every gravity body.
    pub gravity: Vec<(String, DVec3)>,
}

/// Longest accepted run, in simulated seconds.
pub const MAX_SECONDS: f64 = 1.0e9;

struct Simulation {
    orbital: OrbitalSystem,
    gravity: GravitySystem,
    failure: Option<OrbitError>,
    next_report: f64,
    target_steps: u64,
    steps: u64,
    sim_time: f64,
}

impl Simulation {
    fn new(config: &Config, target_steps: u64) -> Result<Self, AppError> {
        let mut orbital = OrbitalSystem::from_config(&config.system)?;
        orbital.begin_play()?;
        let mut gravity = GravitySystem::from_config(&config.system);
        gravity.process_registrations();
        Ok(Self {
            orbital,
            gravity,
            failure: None,
            next_report: 1.0,
            target_steps,
            steps: 0,
            sim_time: 0.0,
        })
    }

    fn done(&self) -> bool {
        self.failure.is_some() || self.steps >= self.target_steps
    }

    /// Advance one fixed step. Steps past the target are ignored, so a frame
    /// that catches up several steps never overshoots the run length.
    fn step(&mut self, dt: f64, sim_time: f64) {
        if self.done() {
            return;
        }
        if let Err(e) = self.orbital.tick(dt) {
            self.failure = Some(e);
            return;
        }
        self.gravity.process_registrations();
        self.gravity.step(dt);

        let now = sim_time + dt;
        self.steps += 1;
        self.sim_time = now;
        if now >= self.next_report {
            self.next_report += 1.0;
            self.log_positions(now);
        }
    }

    fn log_positions(&self, sim_time: f64) {
        for (_, body) in self.orbital.iter() {
            let p = body.position();
            info!(t = sim_time, body = body.name(), x = p.x, y = p.y, z = p.z, "Orbital body");
        }
        for body in self.gravity.bodies() {
            let p = body.position;
            info!(t = sim_time, body = %body.name, x = p.x, y = p.y, z = p.z, "Gravity body");
        }
    }

    fn finish(self) -> Result<SimulationSummary, AppError> {
        if let Some(e) = self.failure {
            return Err(e.into());
        }
        Ok(SimulationSummary {
            steps: self.steps,
            sim_time: self.sim_time,
            orbital: self
                .orbital
                .iter()
                .map(|(_, b)| (b.name().to_string(), b.position()))
                .collect(),
            gravity: self
                .gravity
                .bodies()
                .iter()
                .map(|b| (b.name.clone(), b.position))
                .collect(),
        })
    }
}

/// Step the systems from `config` for `seconds` of simulated time at the
/// fixed timestep. With `realtime` the run is paced by the wall clock.
///
/// `seconds` must lie in `0.0..=MAX_SECONDS`.
pub fn simulate(config: &Config, seconds: f64, realtime: bool) -> Result<SimulationSummary, AppError> {
    if !(0.0..=MAX_SECONDS).contains(&seconds) {
        return Err(AppError::InvalidDuration(seconds));
    }
    let target_steps = (seconds / FIXED_DT).round() as u64;
    let mut sim = Simulation::new(config, target_steps)?;
    info!(
        bodies = sim.orbital.len(),
        gravity_bodies = sim.gravity.bodies().len(),
        seconds,
        realtime,
        "Starting simulation"
    );

    if realtime {
        let mut game_loop = GameLoop::new();
        while !sim.done() {
            game_loop.tick(|dt, t| sim.step(dt, t), |_| {});
            std::thread::sleep(Duration::from_secs_f64(FIXED_DT / 4.0));
        }
    } else {
        let mut sim_loop = SimulatedLoop::new();
        while !sim.done() {
            sim_loop.tick(FIXED_DT, |dt, t| sim.step(dt, t), |_| {});
        }
    }

    info!(steps = sim.steps, sim_time = sim.sim_time, "Simulation finished");
    sim.finish()
}
