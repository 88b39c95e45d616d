//! Time sources driving the run monitor loop

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::{
    thread,
    time::{Duration, Instant},
};

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// Measures time elapsed since the start of a run and waits between ticks.
pub trait Clock {
    /// Seconds elapsed since the run started.
    fn elapsed_s(&self) -> f64;

    /// Block for the given number of seconds. Non-positive durations return immediately.
    fn sleep_s(&mut self, duration_s: f64);
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Real time clock.
#[derive(Debug, Clone, Copy)]
pub struct WallClock {
    start: Instant,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl WallClock {
    /// Start a new clock at the current instant.
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for WallClock {
    fn elapsed_s(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    fn sleep_s(&mut self, duration_s: f64) {
        if duration_s > 0.0 && duration_s.is_finite() {
            thread::sleep(Duration::from_secs_f64(duration_s));
        }
    }
}
