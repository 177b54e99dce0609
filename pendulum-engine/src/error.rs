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
//! Error types for the simulation
//!
//! Errors are `Clone` so that a fault raised on the simulation thread can be
//! published through the handoff cell and observed by any number of readers.

use thiserror::Error;

/// Errors produced while configuring, stepping, or shutting down a simulation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// Invalid physical parameters or initial conditions
    ///
    /// Raised before any thread is spawned.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The integrator produced a NaN or infinite state
    ///
    /// The offending state is never committed; `step` is the index of the step
    /// that failed and `h` the step size it was attempted with.
    #[error("numeric degeneracy at step {step} (h = {h:e}): state is no longer finite")]
    NumericDegeneracy {
        /// Index of the failed step (zero-based)
        step: u64,
        /// Step size used for the failed step
        h: f64,
    },

    /// The background thread could not be spawned or did not exit cleanly
    #[error("simulation thread failure: {0}")]
    ThreadLifecycle(String),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, SimulationError>;
