//! Wall-clock measurement for wrapping sort invocations
//!
//! Not part of sort correctness; benches and demos use it to report
//! elapsed time per phase.

use std::time::{Duration, Instant};

/// Lap timer: starts at construction, and each `lap()` returns the time
/// elapsed since construction or the previous lap, whichever was later.
#[derive(Debug)]
pub struct Timer {
    begin: Instant,
}

impl Timer {
    /// Start a new timer
    pub fn new() -> Self {
        Self {
            begin: Instant::now(),
        }
    }

    /// Elapsed time since the last lap (or construction), resetting the lap
    pub fn lap(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = now - self.begin;
        self.begin = now;
        elapsed
    }

    /// Lap and render the result in milliseconds; sub-100ms laps keep
    /// three decimals
    pub fn lap_formatted(&mut self) -> String {
        let elapsed = self.lap();
        let ms = elapsed.as_millis();
        if ms > 100 {
            format!("{} ms", ms)
        } else {
            format!("{:.3} ms", elapsed.as_secs_f64() * 1000.0)
        }
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
