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
//! Numerical integration methods for the pendulum equations
//!
//! Integrators advance a [`PendulumState`] by a step `h` given a
//! [`Dynamics`] implementation. They are stateless with respect to the
//! simulation: the current state and step size are passed on every call,
//! which makes each step a pure function that can be tested in isolation.
//!
//! # Step Size Guidelines
//!
//! - Too small: Numerical precision issues and wasted computation
//! - Too large: Instability and inaccuracy, especially near chaotic regions
//! - The background driver runs far faster than a display refresh, so typical
//!   wall-clock steps are in the microsecond-to-millisecond range

use crate::dynamics::Dynamics;
use crate::state::PendulumState;

mod rk4;

pub use rk4::RK4Integrator;

/// Step sizes below this are reported as a precision hazard (s)
pub const MIN_RECOMMENDED_STEP: f64 = 1e-9;

/// Step sizes above this are reported as a stability hazard (s)
pub const MAX_RECOMMENDED_STEP: f64 = 1.0;

/// Trait for numerical integration methods
pub trait Integrator: Send + Sync {
    /// Get the name of this integrator
    fn name(&self) -> &str;

    /// Advance `state` by a step of size `h` under `dynamics`
    ///
    /// The input state is not modified; the new state is returned.
    fn step<D: Dynamics>(&self, dynamics: &D, state: &PendulumState, h: f64) -> PendulumState;
}

/// Validate a step size for stability
///
/// Returns a description of the problem if the step might cause numerical
/// issues. Extremely small steps may lead to precision loss, while large
/// steps may cause instability.
pub fn validate_step_size(h: f64) -> Result<(), String> {
    if h <= 0.0 || !h.is_finite() {
        return Err(format!("Invalid step size: {}. Must be positive and finite.", h));
    }

    if h < MIN_RECOMMENDED_STEP {
        return Err(format!(
            "Warning: Step size {} is extremely small and may cause precision loss with f64.",
            h
        ));
    }

    if h > MAX_RECOMMENDED_STEP {
        return Err(format!(
            "Warning: Step size {} is large and may cause instability. \
            Consider capping the step with a maximum step size.",
            h
        ));
    }

    Ok(())
}
