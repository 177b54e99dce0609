// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Time sources for the stepper
//!
//! The stepper derives its step size from the difference between two clock
//! readings. [`MonotonicClock`] follows wall-clock time; [`FixedStepClock`]
//! advances a fixed amount per reading for reproducible runs.

use std::time::Instant;

/// Source of elapsed time in seconds
///
/// Readings must be non-decreasing for the stepper to integrate forward.
pub trait Clock: Send + 'static {
    /// Seconds elapsed since the clock was created
    fn elapsed(&mut self) -> f64;
}

/// Wall-clock time backed by [`Instant`]
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    /// Start a clock at the current instant
    pub fn new() -> Self {
        MonotonicClock {
            start: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn elapsed(&mut self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// Simulated clock that advances by `dt` on every reading
///
/// # Examples
///
/// ```
/// use pendulum_engine::clock::{Clock, FixedStepClock};
///
/// let mut clock = FixedStepClock::new(0.5);
/// assert_eq!(clock.elapsed(), 0.5);
/// assert_eq!(clock.elapsed(), 1.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FixedStepClock {
    dt: f64,
    ticks: u64,
}

impl FixedStepClock {
    /// Create a clock with the given tick length
    ///
    /// # Panics
    ///
    /// Panics if `dt` is non-positive, NaN, or infinite
    pub fn new(dt: f64) -> Self {
        assert!(
            dt > 0.0 && dt.is_finite(),
            "Timestep must be positive and finite"
        );
        FixedStepClock { dt, ticks: 0 }
    }

    /// Tick length in seconds
    pub fn dt(&self) -> f64 {
        self.dt
    }
}

impl Clock for FixedStepClock {
    fn elapsed(&mut self) -> f64 {
        self.ticks += 1;
        // Multiply rather than accumulate so readings stay exact multiples of dt
        self.ticks as f64 * self.dt
    }
}
