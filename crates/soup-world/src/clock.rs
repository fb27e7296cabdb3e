//! Wall-time gating of generations.

use serde::{Deserialize, Serialize};
use soup_core::ClockConfig;

/// Decides, per display tick, whether a generation is due.
///
/// Time is whatever monotonic unit the driver supplies (milliseconds in
/// practice); only differences matter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationClock {
    last_step_time: f64,
    update_interval: f64,
    paused: bool,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new(&ClockConfig::default())
    }
}

impl SimulationClock {
    pub fn new(config: &ClockConfig) -> Self {
        Self {
            last_step_time: 0.0,
            update_interval: config.update_interval_ms,
            paused: config.start_paused,
        }
    }

    /// Returns true when a generation should run now, and records `now` as
    /// the time of that step. Paused clocks never fire.
    pub fn poll(&mut self, now: f64) -> bool {
        if self.paused {
            return false;
        }
        if now - self.last_step_time > self.update_interval {
            self.last_step_time = now;
            return true;
        }
        false
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn last_step_time(&self) -> f64 {
        self.last_step_time
    }

    pub fn update_interval(&self) -> f64 {
        self.update_interval
    }

    pub fn set_update_interval(&mut self, interval: f64) {
        self.update_interval = interval;
    }
}
