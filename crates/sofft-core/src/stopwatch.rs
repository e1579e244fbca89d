//! Wall-clock stopwatch for benchmark drivers
//!
//! Thin tic/toc wrapper over [`std::time::Instant`]. Only the benchmark
//! executables use it; the transforms themselves never look at the clock.

use std::time::Instant;

/// Monotonic stopwatch started by [`Stopwatch::tic`].
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    start: Instant,
}

impl Stopwatch {
    /// Start a new measurement.
    pub fn tic() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Restart the measurement.
    pub fn reset(&mut self) {
        self.start = Instant::now();
    }

    /// Elapsed time in seconds.
    pub fn toc(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    /// Elapsed time in microseconds.
    pub fn toc_micros(&self) -> f64 {
        self.toc() * 1e6
    }

    /// Elapsed time in milliseconds.
    pub fn toc_millis(&self) -> f64 {
        self.toc() * 1e3
    }

    /// Elapsed time in seconds.
    pub fn toc_seconds(&self) -> f64 {
        self.toc()
    }

    /// Elapsed time in minutes.
    pub fn toc_minutes(&self) -> f64 {
        self.toc() / 60.0
    }

    /// Elapsed time in hours.
    pub fn toc_hours(&self) -> f64 {
        self.toc() / 3600.0
    }
}
