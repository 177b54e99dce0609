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
//! Integration context owned by the simulation thread
//!
//! A [`Stepper`] holds the current pendulum state together with the clock
//! marker used to derive the next step size. It is mutated by exactly one
//! thread; only the snapshots it returns cross thread boundaries.

use crate::clock::{Clock, MonotonicClock};
use crate::dynamics::DoublePendulum;
use crate::error::{Result, SimulationError};
use crate::integration::{validate_step_size, Integrator, RK4Integrator};
use crate::params::SimulationParameters;
use crate::state::PendulumState;

/// How the step size is derived from clock readings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepSizePolicy {
    /// Step by the interval that ends at the current reading
    #[default]
    CurrentInterval,
    /// Step by the interval measured on the previous call
    ///
    /// The step size lags one call behind the clock, so the very first step
    /// has `h = 0` and repeats the initial state.
    PreviousInterval,
}

/// Current state plus the timing needed to advance it
///
/// # Examples
///
/// ```
/// use pendulum_engine::params::SimulationParameters;
/// use pendulum_engine::state::PendulumState;
/// use pendulum_engine::stepper::Stepper;
///
/// let mut stepper = Stepper::new(
///     PendulumState::at_rest(1.0, 0.5),
///     SimulationParameters::default(),
/// ).unwrap();
/// let next = stepper.advance_by(0.001).unwrap();
/// assert!(next.omega1 < 0.0);
/// assert_eq!(stepper.steps(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Stepper<C: Clock = MonotonicClock> {
    state: PendulumState,
    system: DoublePendulum,
    integrator: RK4Integrator,
    clock: C,
    policy: StepSizePolicy,
    max_step: Option<f64>,
    last_time: f64,
    last_interval: f64,
    steps: u64,
    clamped_steps: u64,
    flagged_steps: u64,
}

impl Stepper<MonotonicClock> {
    /// Create a stepper driven by wall-clock time
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Configuration`] if the parameters are invalid
    /// or the initial state is not finite.
    pub fn new(initial: PendulumState, params: SimulationParameters) -> Result<Self> {
        Self::with_clock(initial, params, MonotonicClock::new())
    }
}

impl<C: Clock> Stepper<C> {
    /// Create a stepper driven by a custom clock
    ///
    /// The clock is read once here to set the previous-time marker.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Configuration`] if the parameters are invalid
    /// or the initial state is not finite.
    pub fn with_clock(initial: PendulumState, params: SimulationParameters, mut clock: C) -> Result<Self> {
        params.validate()?;
        if !initial.is_finite() {
            return Err(SimulationError::Configuration(format!(
                "initial state must be finite, got {:?}",
                initial
            )));
        }

        let last_time = clock.elapsed();
        Ok(Stepper {
            state: initial,
            system: DoublePendulum::new(params),
            integrator: RK4Integrator::new(),
            clock,
            policy: StepSizePolicy::default(),
            max_step: None,
            last_time,
            last_interval: 0.0,
            steps: 0,
            clamped_steps: 0,
            flagged_steps: 0,
        })
    }

    /// Select how clock readings become step sizes
    pub fn with_policy(mut self, policy: StepSizePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Cap every step at `max_step` seconds
    ///
    /// `None` (the default) integrates whatever interval the clock reports.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Configuration`] if the cap is not positive and finite.
    pub fn with_max_step(mut self, max_step: Option<f64>) -> Result<Self> {
        if let Some(cap) = max_step {
            if !(cap > 0.0 && cap.is_finite()) {
                return Err(SimulationError::Configuration(format!(
                    "max_step must be positive and finite, got {}",
                    cap
                )));
            }
        }
        self.max_step = max_step;
        Ok(self)
    }

    /// Current state
    pub fn state(&self) -> PendulumState {
        self.state
    }

    /// The equations being integrated
    pub fn system(&self) -> &DoublePendulum {
        &self.system
    }

    /// Step size policy in effect
    pub fn policy(&self) -> StepSizePolicy {
        self.policy
    }

    /// Number of calls to [`advance`](Self::advance) or [`advance_by`](Self::advance_by)
    /// that completed, including repeated states
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Number of steps shortened by the `max_step` cap
    pub fn clamped_steps(&self) -> u64 {
        self.clamped_steps
    }

    /// Number of integrated steps whose size fell outside the recommended range
    ///
    /// See [`validate_step_size`]. Such steps are still integrated.
    pub fn flagged_steps(&self) -> u64 {
        self.flagged_steps
    }

    /// Advance using the clock to choose the step size
    ///
    /// Reads the clock, updates the previous-time marker, and integrates by
    /// the interval selected by the [`StepSizePolicy`].
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::NumericDegeneracy`] if the step would leave
    /// the state non-finite. The previous state is kept in that case.
    pub fn advance(&mut self) -> Result<PendulumState> {
        let now = self.clock.elapsed();
        let interval = now - self.last_time;
        self.last_time = now;

        let h = match self.policy {
            StepSizePolicy::CurrentInterval => interval,
            StepSizePolicy::PreviousInterval => std::mem::replace(&mut self.last_interval, interval),
        };
        self.advance_by(h)
    }

    /// Advance by an explicit step size
    ///
    /// A non-positive or NaN `h` repeats the current state without integrating.
    /// A step outside the recommended range is still integrated, but it is
    /// logged and counted in [`flagged_steps`](Self::flagged_steps).
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::NumericDegeneracy`] if the step would leave
    /// the state non-finite. The previous state is kept in that case.
    pub fn advance_by(&mut self, h: f64) -> Result<PendulumState> {
        if h.is_nan() || h <= 0.0 {
            log::trace!("non-positive step size {}, repeating state", h);
            self.steps += 1;
            return Ok(self.state);
        }

        let h = match self.max_step {
            Some(cap) if h > cap => {
                // Warn once; a stalled clock clamps every step after that
                if self.clamped_steps == 0 {
                    log::warn!("step size {:.3e}s exceeds cap {:.3e}s, clamping", h, cap);
                } else {
                    log::debug!("step size {:.3e}s clamped to {:.3e}s", h, cap);
                }
                self.clamped_steps += 1;
                cap
            }
            _ => h,
        };

        if let Err(msg) = validate_step_size(h) {
            if self.flagged_steps == 0 {
                log::warn!("step {}: {}", self.steps, msg);
            } else {
                log::debug!("step {}: {}", self.steps, msg);
            }
            self.flagged_steps += 1;
        }

        let next = self.integrator.step(&self.system, &self.state, h);
        if !next.is_finite() {
            return Err(SimulationError::NumericDegeneracy { step: self.steps, h });
        }

        self.state = next;
        self.steps += 1;
        Ok(next)
    }
}
