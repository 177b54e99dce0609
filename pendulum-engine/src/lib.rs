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
//! # Pendulum Engine
//!
//! A real-time double pendulum simulation. The equations of motion are
//! integrated with RK4 on a dedicated background thread, and the latest
//! state is handed to consumers (for example a renderer) through a
//! latest-value cell that never blocks the simulation on slow readers.
//!
//! ## Features
//!
//! - **Double Pendulum Dynamics**: Lossless two-link model with configurable
//!   gravity, link lengths, and bob masses
//! - **RK4 Integration**: Fourth-order Runge-Kutta with wall-clock or fixed step sizes
//! - **Background Driver**: Free-running simulation thread with cooperative shutdown
//! - **Handoff Cell**: Latest-wins state exchange between producer and consumers
//! - **Ensembles**: Optional Rayon-parallel batch integration for chaos analysis
//!
//! ## Example
//!
//! ```rust
//! use pendulum_engine::{start_simulation, fetch_latest, stop_simulation};
//! use pendulum_engine::params::SimulationParameters;
//!
//! let params = SimulationParameters::default();
//! let mut sim = start_simulation(3.1415, 3.1415, params).unwrap();
//!
//! // Once per frame
//! if let Some(state) = fetch_latest(&sim).unwrap() {
//!     let positions = state.bob_positions(&params);
//!     let _ = positions.bob;
//! }
//!
//! stop_simulation(&mut sim).unwrap();
//! ```

#![warn(missing_docs)]

/// Error types
pub mod error;

/// Physical parameters
pub mod params;

/// State snapshots
pub mod state;

/// Equations of motion and energy
pub mod dynamics;

/// Numerical integration methods
pub mod integration;

/// Time sources
pub mod clock;

/// Integration context driven by a clock
pub mod stepper;

/// Latest-value handoff between threads
pub mod handoff;

/// Background work loop
pub mod driver;

/// Real-time simulation handle
pub mod simulation;

/// Fixed-step trajectories and ensembles
pub mod ensemble;

pub use error::{Result, SimulationError};
pub use params::SimulationParameters;
pub use simulation::{fetch_latest, start_simulation, stop_simulation, Simulation};
pub use state::PendulumState;
