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
//! Real-time simulation handle
//!
//! A [`Simulation`] ties a [`Stepper`] running on a [`Driver`] thread to a
//! [`HandoffCell`] that consumers poll at their own cadence, typically once
//! per rendered frame:
//!
//! ```text
//! driver thread:   advance -> publish -> check stop -> advance -> ...
//! consumer thread:         fetch_latest         fetch_latest
//! ```
//!
//! The two cadences are independent. A consumer sees the most recent state
//! at the time of the read and may skip any number of intermediate states.
//!
//! # Example
//!
//! ```
//! use pendulum_engine::params::SimulationParameters;
//! use pendulum_engine::simulation::{fetch_latest, start_simulation, stop_simulation};
//!
//! let mut sim = start_simulation(3.1415, 3.1415, SimulationParameters::default()).unwrap();
//! // ... once per frame:
//! if let Some(state) = fetch_latest(&sim).unwrap() {
//!     assert!(state.is_finite());
//! }
//! stop_simulation(&mut sim).unwrap();
//! ```

use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use crate::clock::{Clock, MonotonicClock};
use crate::driver::Driver;
use crate::error::{Result, SimulationError};
use crate::handoff::HandoffCell;
use crate::params::SimulationParameters;
use crate::state::PendulumState;
use crate::stepper::{StepSizePolicy, Stepper};

/// Value published by the simulation thread: a state, or the fault that ended the run
pub type Snapshot = std::result::Result<PendulumState, SimulationError>;

/// Default name of the simulation thread
pub const DEFAULT_THREAD_NAME: &str = "pendulum-sim";

/// Configuration for a real-time simulation
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Physical parameters
    pub params: SimulationParameters,
    /// How wall-clock intervals become step sizes
    pub policy: StepSizePolicy,
    /// Optional cap on a single step (s)
    pub max_step: Option<f64>,
    /// Optional pause after every iteration of the simulation thread
    pub pace: Option<Duration>,
    /// Name given to the simulation thread
    pub thread_name: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig::new(SimulationParameters::default())
    }
}

impl SimulationConfig {
    /// Create a configuration with default timing for the given parameters
    pub fn new(params: SimulationParameters) -> Self {
        SimulationConfig {
            params,
            policy: StepSizePolicy::default(),
            max_step: None,
            pace: None,
            thread_name: DEFAULT_THREAD_NAME.to_string(),
        }
    }

    /// Set the step size policy
    pub fn with_policy(mut self, policy: StepSizePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Cap each step at `max_step` seconds
    pub fn with_max_step(mut self, max_step: f64) -> Self {
        self.max_step = Some(max_step);
        self
    }

    /// Sleep for `pace` after every step
    pub fn with_pace(mut self, pace: Duration) -> Self {
        self.pace = Some(pace);
        self
    }

    /// Name the simulation thread
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }
}

/// Read-only view of a simulation's published state
///
/// Cheap to clone; hand one to every consumer thread.
#[derive(Debug, Clone)]
pub struct StateReader {
    cell: Arc<HandoffCell<Snapshot>>,
}

impl StateReader {
    /// Latest published state
    ///
    /// Returns `Ok(None)` until the first step has been published.
    ///
    /// # Errors
    ///
    /// Returns the fault that stopped the simulation thread, if any.
    pub fn fetch_latest(&self) -> Result<Option<PendulumState>> {
        match self.cell.fetch() {
            None => Ok(None),
            Some(snapshot) => match snapshot.as_ref() {
                Ok(state) => Ok(Some(*state)),
                Err(err) => Err(err.clone()),
            },
        }
    }

    /// Number of snapshots published so far
    pub fn steps_published(&self) -> u64 {
        self.cell.generation()
    }
}

/// Handle to a double pendulum integrated on a background thread
#[derive(Debug)]
pub struct Simulation {
    params: SimulationParameters,
    reader: StateReader,
    driver: Driver,
}

impl Simulation {
    /// Release the pendulum from rest at the given angles
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Configuration`] for invalid parameters or
    /// non-finite angles, before any thread is spawned.
    pub fn start(theta1: f64, theta2: f64, params: SimulationParameters) -> Result<Self> {
        Self::start_with_config(PendulumState::at_rest(theta1, theta2), SimulationConfig::new(params))
    }

    /// Start from an arbitrary state with full configuration
    ///
    /// # Errors
    ///
    /// See [`Simulation::start`]; spawn failures are reported as
    /// [`SimulationError::ThreadLifecycle`].
    pub fn start_with_config(initial: PendulumState, config: SimulationConfig) -> Result<Self> {
        Self::start_with_clock(initial, config, MonotonicClock::new())
    }

    /// Start with a custom time source
    ///
    /// A [`FixedStepClock`](crate::clock::FixedStepClock) gives a
    /// reproducible sequence of states independent of scheduling.
    ///
    /// # Errors
    ///
    /// See [`Simulation::start_with_config`].
    pub fn start_with_clock<C: Clock>(
        initial: PendulumState,
        config: SimulationConfig,
        clock: C,
    ) -> Result<Self> {
        let mut stepper = Stepper::with_clock(initial, config.params, clock)?
            .with_policy(config.policy)
            .with_max_step(config.max_step)?;

        let cell = Arc::new(HandoffCell::new());
        let producer = Arc::clone(&cell);

        log::debug!(
            "starting simulation: theta1={}, theta2={}, policy={:?}",
            initial.theta1,
            initial.theta2,
            config.policy
        );

        let driver = Driver::spawn(config.thread_name, config.pace, move || {
            match stepper.advance() {
                Ok(state) => {
                    producer.publish(Ok(state));
                    ControlFlow::Continue(())
                }
                Err(err) => {
                    log::error!("simulation halted: {}", err);
                    producer.publish(Err(err));
                    ControlFlow::Break(())
                }
            }
        })?;

        Ok(Simulation {
            params: config.params,
            reader: StateReader { cell },
            driver,
        })
    }

    /// Latest published state; see [`StateReader::fetch_latest`]
    ///
    /// # Errors
    ///
    /// Returns the fault that stopped the simulation thread, if any.
    pub fn fetch_latest(&self) -> Result<Option<PendulumState>> {
        self.reader.fetch_latest()
    }

    /// A reader that can be moved to other consumer threads
    pub fn reader(&self) -> StateReader {
        self.reader.clone()
    }

    /// Number of snapshots published so far
    pub fn steps_published(&self) -> u64 {
        self.reader.steps_published()
    }

    /// Physical parameters of this run
    pub fn params(&self) -> &SimulationParameters {
        &self.params
    }

    /// Whether the simulation thread is still running
    pub fn is_running(&self) -> bool {
        self.driver.is_running()
    }

    /// Stop the simulation thread and wait for it to exit
    ///
    /// The last published state stays readable afterwards. Stopping twice is
    /// a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::ThreadLifecycle`] if the thread panicked.
    pub fn stop(&mut self) -> Result<()> {
        self.driver.stop()?;
        log::debug!("simulation stopped after {} steps", self.steps_published());
        Ok(())
    }
}

/// Begin integrating a pendulum released from rest at the given angles
///
/// # Errors
///
/// See [`Simulation::start`].
pub fn start_simulation(
    initial_theta1: f64,
    initial_theta2: f64,
    parameters: SimulationParameters,
) -> Result<Simulation> {
    Simulation::start(initial_theta1, initial_theta2, parameters)
}

/// Non-blocking read of the most recent state
///
/// # Errors
///
/// See [`Simulation::fetch_latest`].
pub fn fetch_latest(handle: &Simulation) -> Result<Option<PendulumState>> {
    handle.fetch_latest()
}

/// Request shutdown and block until the simulation thread has exited
///
/// # Errors
///
/// See [`Simulation::stop`].
pub fn stop_simulation(handle: &mut Simulation) -> Result<()> {
    handle.stop()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedStepClock;
    use std::thread;

    #[test]
    fn test_config_builder() {
        let config = SimulationConfig::default()
            .with_policy(StepSizePolicy::PreviousInterval)
            .with_max_step(0.01)
            .with_pace(Duration::from_micros(10))
            .with_thread_name("sim-under-test");
        assert_eq!(config.params, SimulationParameters::default());
        assert_eq!(config.policy, StepSizePolicy::PreviousInterval);
        assert_eq!(config.max_step, Some(0.01));
        assert_eq!(config.pace, Some(Duration::from_micros(10)));
        assert_eq!(config.thread_name, "sim-under-test");
    }

    #[test]
    fn test_invalid_parameters_fail_before_spawn() {
        let params = SimulationParameters::default().with_lengths(-1.0, 1.0);
        assert!(matches!(
            start_simulation(0.1, 0.2, params),
            Err(SimulationError::Configuration(_))
        ));
        assert!(matches!(
            start_simulation(f64::INFINITY, 0.2, SimulationParameters::default()),
            Err(SimulationError::Configuration(_))
        ));

        let config = SimulationConfig::default().with_max_step(-1.0);
        assert!(matches!(
            Simulation::start_with_config(PendulumState::default(), config),
            Err(SimulationError::Configuration(_))
        ));
    }

    #[test]
    fn test_publishes_states() {
        let mut sim = start_simulation(1.0, 0.5, SimulationParameters::default()).unwrap();
        while sim.steps_published() < 100 {
            thread::yield_now();
        }
        let state = fetch_latest(&sim).unwrap().expect("state published");
        assert!(state.is_finite());
        stop_simulation(&mut sim).unwrap();
        assert!(!sim.is_running());
    }

    #[test]
    fn test_fixed_clock_matches_manual_stepping() {
        let initial = PendulumState::at_rest(1.0, 0.5);
        let config = SimulationConfig::default();
        // A power-of-two tick keeps every clock interval exactly equal to dt
        let dt = 1.0 / 1024.0;
        let mut sim = Simulation::start_with_clock(initial, config, FixedStepClock::new(dt)).unwrap();
        while sim.steps_published() < 50 {
            thread::yield_now();
        }
        sim.stop().unwrap();

        let published = sim.steps_published();
        let last = sim.fetch_latest().unwrap().unwrap();

        let mut reference = Stepper::new(initial, SimulationParameters::default()).unwrap();
        let mut expected = initial;
        for _ in 0..published {
            expected = reference.advance_by(dt).unwrap();
        }
        assert_eq!(last, expected);
    }

    #[test]
    fn test_fault_is_reported_through_fetch() {
        let mut sim = Simulation::start_with_clock(
            PendulumState::at_rest(2.0, 1.0),
            SimulationConfig::default(),
            FixedStepClock::new(1e6),
        )
        .unwrap();

        while sim.is_running() {
            thread::yield_now();
        }
        assert!(matches!(
            sim.fetch_latest(),
            Err(SimulationError::NumericDegeneracy { .. })
        ));
        assert!(sim.reader().fetch_latest().is_err());
        sim.stop().unwrap();
    }
}
