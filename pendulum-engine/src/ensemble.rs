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
//! Offline trajectories and ensembles
//!
//! These helpers integrate with a fixed step size on the calling thread
//! (or on the Rayon pool for ensembles) and are independent of the
//! real-time driver. They are useful for reproducible analysis, such as
//! measuring how quickly nearby initial conditions diverge.
//!
//! With the `parallel` feature enabled, ensemble members are integrated
//! concurrently. Each member is independent, so the results are identical
//! to the sequential path.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{Result, SimulationError};
use crate::params::SimulationParameters;
use crate::state::PendulumState;
use crate::stepper::Stepper;

/// Longer trajectories grow their buffer on demand
const MAX_PREALLOCATED_STATES: usize = 1 << 20;

fn check_step(h: f64) -> Result<()> {
    if h > 0.0 && h.is_finite() {
        Ok(())
    } else {
        Err(SimulationError::Configuration(format!(
            "fixed step must be positive and finite, got {}",
            h
        )))
    }
}

/// Integrate `steps` fixed steps of size `h`
///
/// Returns every state including the initial one, so the result has
/// `steps + 1` entries.
///
/// # Errors
///
/// Returns [`SimulationError::Configuration`] for invalid input and
/// [`SimulationError::NumericDegeneracy`] if the trajectory stops being finite.
///
/// # Examples
///
/// ```
/// use pendulum_engine::ensemble::trajectory;
/// use pendulum_engine::params::SimulationParameters;
/// use pendulum_engine::state::PendulumState;
///
/// let path = trajectory(SimulationParameters::default(), PendulumState::at_rest(0.3, 0.0), 1e-3, 10).unwrap();
/// assert_eq!(path.len(), 11);
/// ```
pub fn trajectory(
    params: SimulationParameters,
    initial: PendulumState,
    h: f64,
    steps: usize,
) -> Result<Vec<PendulumState>> {
    check_step(h)?;
    let mut stepper = Stepper::new(initial, params)?;

    let mut states = Vec::with_capacity(steps.saturating_add(1).min(MAX_PREALLOCATED_STATES));
    states.push(initial);
    for _ in 0..steps {
        states.push(stepper.advance_by(h)?);
    }
    Ok(states)
}

/// Final state of `steps` fixed steps from `initial`
fn final_state(
    params: SimulationParameters,
    initial: PendulumState,
    h: f64,
    steps: usize,
) -> Result<PendulumState> {
    let mut stepper = Stepper::new(initial, params)?;
    for _ in 0..steps {
        stepper.advance_by(h)?;
    }
    Ok(stepper.state())
}

/// Advance every member of an ensemble by `steps` fixed steps
///
/// Results are returned in the same order as `initials`.
///
/// # Errors
///
/// Fails if any member fails; see [`trajectory`].
pub fn integrate_ensemble(
    params: SimulationParameters,
    initials: &[PendulumState],
    h: f64,
    steps: usize,
) -> Result<Vec<PendulumState>> {
    check_step(h)?;
    params.validate()?;

    #[cfg(feature = "parallel")]
    {
        initials
            .par_iter()
            .map(|initial| final_state(params, *initial, h, steps))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        initials
            .iter()
            .map(|initial| final_state(params, *initial, h, steps))
            .collect()
    }
}

/// Largest angular distance between corresponding states of two trajectories
///
/// Only the overlapping prefix is compared.
pub fn max_separation(a: &[PendulumState], b: &[PendulumState]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| x.angular_distance(y))
        .fold(0.0, f64::max)
}

/// Initial states spread evenly around `center` in the first angle
///
/// Produces `count` states with θ1 offsets in `[-spread/2, spread/2]`.
pub fn perturbed_initials(center: PendulumState, spread: f64, count: usize) -> Vec<PendulumState> {
    if count <= 1 {
        return vec![center; count];
    }
    let step = spread / (count - 1) as f64;
    (0..count)
        .map(|i| PendulumState {
            theta1: center.theta1 - spread * 0.5 + step * i as f64,
            ..center
        })
        .collect()
}
