//! Interval trigger
//!
//! Accumulates elapsed simulation time and fires once the threshold is
//! exceeded. Used for score ticks, spawners and sprite animation frames.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Accumulate-and-fire timer with optional randomized re-arming
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntervalTrigger {
    /// Time accumulated since the last fire/reset (seconds)
    pub elapsed: f32,
    /// Current threshold (seconds)
    pub interval: f32,
}

impl IntervalTrigger {
    pub fn new(interval: f32) -> Self {
        Self {
            elapsed: 0.0,
            interval,
        }
    }

    /// Create a trigger whose first threshold is drawn from `[min, max)`
    pub fn randomized<R: Rng>(rng: &mut R, min: f32, max: f32) -> Self {
        Self::new(rng.random_range(min..max))
    }

    /// Add time without checking the threshold
    pub fn accumulate(&mut self, dt: f32) {
        self.elapsed += dt;
    }

    /// Has the accumulated time reached the threshold?
    pub fn is_ready(&self) -> bool {
        self.elapsed >= self.interval
    }

    /// Strictly past the threshold (used where the trigger must overshoot)
    pub fn is_past(&self) -> bool {
        self.elapsed > self.interval
    }

    /// Accumulate `dt` and fire (resetting) when the threshold is reached
    pub fn tick(&mut self, dt: f32) -> bool {
        self.accumulate(dt);
        if self.is_ready() {
            self.reset();
            true
        } else {
            false
        }
    }

    /// Restart accumulation, keeping the threshold. Remainders are dropped.
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    /// Restart accumulation with a new fixed threshold
    pub fn rearm(&mut self, interval: f32) {
        self.elapsed = 0.0;
        self.interval = interval;
    }

    /// Restart accumulation with a threshold drawn from `[min, max)`
    pub fn rearm_random<R: Rng>(&mut self, rng: &mut R, min: f32, max: f32) {
        self.rearm(rng.random_range(min..max));
    }

    /// Fraction of the interval elapsed, clamped to [0, 1]
    pub fn progress(&self) -> f32 {
        if self.interval <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.interval).clamp(0.0, 1.0)
        }
    }
}
