//! Core-level rate validation for inbound actions.
//!
//! Input flooding is a simulation concern, not a transport concern: the gate
//! is re-validated against the current clock on every attempt.

use tracing::trace;
use voxelstrike_core::tuning::INPUT_MIN_INTERVAL;

/// Wall-clock gate accepting at most one input per interval.
#[derive(Debug, Clone, Copy)]
pub struct InputRateLimiter {
    min_interval: f64,
    last_accepted: Option<f64>,
}

impl InputRateLimiter {
    /// Gate with the standard ~16 ms floor.
    pub fn new() -> Self {
        Self::with_interval(INPUT_MIN_INTERVAL)
    }

    /// Gate with a custom interval (tests, alternative cadences).
    pub fn with_interval(min_interval: f64) -> Self {
        Self {
            min_interval,
            last_accepted: None,
        }
    }

    /// Attempt to accept an input at clock time `now`.
    pub fn try_accept(&mut self, now: f64) -> bool {
        match self.last_accepted {
            Some(last) if now - last < self.min_interval => {
                trace!(now, last, "input rate-limited");
                false
            }
            _ => {
                self.last_accepted = Some(now);
                true
            }
        }
    }
}

impl Default for InputRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
