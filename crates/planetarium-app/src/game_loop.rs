//! Fixed-timestep loop implementing the "Fix Your Timestep" pattern.
//!
//! Simulation runs at a fixed 60 Hz regardless of how long frames take, using
//! an accumulator. [`SimulatedLoop`] takes frame times explicitly, which keeps
//! headless runs deterministic. [`GameLoop`] feeds it wall-clock time.

use std::time::Instant;
use tracing::warn;

/// Fixed simulation timestep: 60 Hz.
pub const FIXED_DT: f64 = 1.0 / 60.0;

/// Frame times above this are clamped, accepting slowdown instead of running
/// dozens of catch-up steps.
pub const MAX_FRAME_TIME: f64 = 0.25;

/// Accumulator loop driven by explicit frame times.
#[derive(Debug, Clone, Default)]
pub struct SimulatedLoop {
    accumulator: f64,
    total_sim_time: f64,
    frame_count: u64,
    update_count: u64,
}

impl SimulatedLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs one frame of `frame_time` seconds.
    ///
    /// - `update_fn(fixed_dt, total_sim_time)` is called zero or more times at
    ///   the fixed rate.
    /// - `render_fn(alpha)` is called exactly once with the interpolation alpha
    ///   in `[0.0, 1.0)`.
    pub fn tick(
        &mut self,
        frame_time: f64,
        mut update_fn: impl FnMut(f64, f64),
        mut render_fn: impl FnMut(f64),
    ) {
        let frame_time = if frame_time > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_time * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            MAX_FRAME_TIME
        } else {
            frame_time.max(0.0)
        };

        self.accumulator += frame_time;

        while self.accumulator >= FIXED_DT {
            update_fn(FIXED_DT, self.total_sim_time);
            self.total_sim_time += FIXED_DT;
            self.accumulator -= FIXED_DT;
            self.update_count += 1;
        }

        render_fn(self.alpha());
        self.frame_count += 1;
    }

    /// Interpolation alpha between the last two simulation states.
    pub fn alpha(&self) -> f64 {
        if self.accumulator > 0.0 {
            self.accumulator / FIXED_DT
        } else {
            0.0
        }
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    pub fn total_sim_time(&self) -> f64 {
        self.total_sim_time
    }
}

/// Real-time loop measuring frame time from the wall clock.
pub struct GameLoop {
    previous_time: Instant,
    inner: SimulatedLoop,
}

impl GameLoop {
    pub fn new() -> Self {
        Self {
            previous_time: Instant::now(),
            inner: SimulatedLoop::new(),
        }
    }

    /// Runs one frame with the time elapsed since the previous call.
    pub fn tick(&mut self, update_fn: impl FnMut(f64, f64), render_fn: impl FnMut(f64)) {
        let now = Instant::now();
        let frame_time = now.duration_since(self.previous_time).as_secs_f64();
        self.previous_time = now;
        self.inner.tick(frame_time, update_fn, render_fn);
    }

    pub fn alpha(&self) -> f64 {
        self.inner.alpha()
    }

    pub fn frame_count(&self) -> u64 {
        self.inner.frame_count()
    }

    pub fn update_count(&self) -> u64 {
        self.inner.update_count()
    }

    pub fn total_sim_time(&self) -> f64 {
        self.inner.total_sim_time()
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}
