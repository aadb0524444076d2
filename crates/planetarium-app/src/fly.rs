//! Scripted flight of the player camera down to the planet surface.
//!
//! The camera starts at its configured position facing the planet, then
//! throttles up while moving forward until it touches down. The planet's
//! sections are refreshed every `mesh_update_rate` seconds of simulated time,
//! so the log shows the LOD rings tightening as the camera descends.

use std::time::{Duration, Instant};

use glam::{Quat, Vec3};
use planetarium_config::Config;
use planetarium_mesh::SectionStore;
use planetarium_planet::{AsyncSectionBuilder, ProceduralPlanet, UpdateReport};
use planetarium_player::{InputAxis, PlayerCam};
use tracing::{debug, info};

use crate::error::AppError;
use crate::game_loop::{FIXED_DT, SimulatedLoop};

/// Throttle added every frame of the flight.
const THROTTLE_PER_FRAME: f32 = 0.1;

/// How long a threaded flight waits for outstanding builds at the end.
const SETTLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Final state of a flight.
#[derive(Debug, Clone, PartialEq)]
pub struct FlySummary {
    pub frames: u64,
    pub final_position: Vec3,
    /// Number of section updates performed.
    pub mesh_updates: usize,
    /// Total sections replaced across all updates.
    pub sections_changed: usize,
    pub final_lods: Vec<u8>,
}

struct Flight {
    cam: PlayerCam,
    planet: ProceduralPlanet,
    sink: SectionStore,
    builder: Option<AsyncSectionBuilder>,
    since_update: f64,
    landed: bool,
    mesh_updates: usize,
    sections_changed: usize,
    failure: Option<AppError>,
}

impl Flight {
    fn new(config: &Config, threaded: bool) -> Result<Self, AppError> {
        let planet = ProceduralPlanet::new(config.planet.clone(), Vec3::ZERO)?;
        let mut cam = PlayerCam::from_config(&config.camera);
        if let Some(dir) = (planet.center() - cam.position).try_normalize() {
            cam.rotation = Quat::from_rotation_arc(Vec3::NEG_Z, dir);
        }
        let builder = if threaded {
            Some(AsyncSectionBuilder::with_defaults()?)
        } else {
            None
        };
        Ok(Self {
            cam,
            planet,
            sink: SectionStore::new(),
            builder,
            since_update: 0.0,
            landed: false,
            mesh_updates: 0,
            sections_changed: 0,
            failure: None,
        })
    }

    fn update_mesh(&mut self) -> Result<UpdateReport, AppError> {
        let viewer = self.cam.position;
        let report = match &self.builder {
            Some(builder) => self.planet.update_sections_async(viewer, &mut self.sink, builder)?,
            None => self.planet.update_sections(viewer, &mut self.sink)?,
        };
        self.mesh_updates += 1;
        self.sections_changed += report.updated.len();
        if !report.updated.is_empty() {
            info!(
                altitude = viewer.length() - self.planet.config().radius,
                changed = report.updated.len(),
                queued = report.queued.len(),
                lods = ?self.planet.previous_lods(),
                "Planet LODs changed"
            );
        }
        Ok(report)
    }

    fn step(&mut self, dt: f64) {
        if self.failure.is_some() {
            return;
        }

        if !self.landed {
            self.cam.handle_axis(InputAxis::Throttle, THROTTLE_PER_FRAME);
            self.cam.handle_axis(InputAxis::TranslateForward, 1.0);
        }
        self.cam.tick();

        let config = self.planet.config();
        let floor = config.radius + config.surface_offset;
        if !self.landed && (self.cam.position - self.planet.center()).length() < floor {
            let (position, _) = self.planet.surface_position(self.cam.position);
            debug!(x = position.x, y = position.y, z = position.z, "Camera landed");
            self.cam.position = position;
            self.landed = true;
        }

        self.since_update += dt;
        if self.since_update >= self.planet.config().mesh_update_rate {
            self.since_update = 0.0;
            if let Err(e) = self.update_mesh() {
                self.failure = Some(e);
            }
        }
    }

    /// Apply outstanding worker builds for the final camera position.
    fn settle(&mut self) -> Result<(), AppError> {
        if self.builder.is_none() {
            return Ok(());
        }
        let deadline = Instant::now() + SETTLE_TIMEOUT;
        loop {
            let report = self.update_mesh()?;
            if report.queued.is_empty() || Instant::now() >= deadline {
                return Ok(());
            }
            std::thread::sleep(Duration::from_millis(10));
        }
    }
}

/// Fly the camera for `frames` fixed steps. With `threaded` sections are
/// built on worker threads.
pub fn fly(config: &Config, frames: u32, threaded: bool) -> Result<FlySummary, AppError> {
    let mut flight = Flight::new(config, threaded)?;
    info!(
        planet = flight.planet.name(),
        seed = flight.planet.seed(),
        frames,
        threaded,
        "Starting flight"
    );
    flight.update_mesh()?;

    let mut sim_loop = SimulatedLoop::new();
    for _ in 0..frames {
        sim_loop.tick(FIXED_DT, |dt, _| flight.step(dt), |_| {});
        if flight.failure.is_some() {
            break;
        }
    }
    if let Some(e) = flight.failure.take() {
        return Err(e);
    }
    flight.settle()?;

    let summary = FlySummary {
        frames: sim_loop.update_count(),
        final_position: flight.cam.position,
        mesh_updates: flight.mesh_updates,
        sections_changed: flight.sections_changed,
        final_lods: flight.planet.previous_lods().to_vec(),
    };
    info!(
        frames = summary.frames,
        mesh_updates = summary.mesh_updates,
        sections_changed = summary.sections_changed,
        "Flight finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        let mut config = Config::default();
        config.planet.cube_resolution = 16;
        config.planet.max_lod = 3;
        config
    }

    #[test]
    fn test_flight_reaches_surface() {
        let config = test_config();
        let summary = fly(&config, 600, false).unwrap();

        assert_eq!(summary.frames, 600);
        let floor = config.planet.radius + config.planet.surface_offset;
        assert!(
            (summary.final_position.length() - floor).abs() < 1.0,
            "camera should rest on the surface, got {}",
            summary.final_position.length()
        );
        assert_eq!(summary.final_lods.len(), 20);
        assert_eq!(summary.final_lods.iter().max(), Some(&3));
        assert!(summary.mesh_updates > 1);
        assert!(summary.sections_changed > 20);
    }

    #[test]
    fn test_short_flight_stays_far() {
        let config = test_config();
        let summary = fly(&config, 10, false).unwrap();
        assert_eq!(summary.frames, 10);
        assert_eq!(summary.mesh_updates, 1);
        assert!(summary.final_position.length() > 300_000.0);
        assert!(summary.final_lods.iter().all(|&lod| lod == 0));
    }

    #[test]
    fn test_threaded_flight_matches_sync() {
        let config = test_config();
        let sync = fly(&config, 600, false).unwrap();
        let threaded = fly(&config, 600, true).unwrap();
        assert_eq!(threaded.final_position, sync.final_position);
        assert_eq!(threaded.final_lods, sync.final_lods);
    }
}
