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
//! Equations of motion for the ideal double pendulum
//!
//! The model is lossless: no damping, no friction, point masses on massless
//! rigid links. With Δ = θ1 − θ2 and M = m1 + m2:
//!
//! ```text
//! dθ1/dt = ω1
//! dω1/dt = (−sinΔ (m2 l1 ω1² cosΔ + m2 l2 ω2²) − g (M sinθ1 − m2 sinθ2 cosΔ))
//!          / (l1 (m1 + m2 sin²Δ))
//! dθ2/dt = ω2
//! dω2/dt = ( sinΔ (M l1 ω1² + m2 l2 ω2² cosΔ) + g (M sinθ1 cosΔ − M sinθ2))
//!          / (l2 (m1 + m2 sin²Δ))
//! ```
//!
//! The denominators are strictly positive for validated parameters.

use crate::params::SimulationParameters;
use crate::state::{PendulumState, StateDerivative};

/// A system of first-order ODEs over [`PendulumState`]
///
/// Implementations are pure: the derivative depends only on the state passed
/// in and on immutable configuration held by the implementor.
pub trait Dynamics: Send + Sync {
    /// Evaluate all four time derivatives at `state`
    fn derivative(&self, state: &PendulumState) -> StateDerivative;
}

/// Coupled two-link pendulum driven by gravity
///
/// # Examples
///
/// ```
/// use pendulum_engine::dynamics::{DoublePendulum, Dynamics};
/// use pendulum_engine::params::SimulationParameters;
/// use pendulum_engine::state::PendulumState;
///
/// let system = DoublePendulum::new(SimulationParameters::default());
/// let rate = system.derivative(&PendulumState::default());
/// assert_eq!(rate.domega1, 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoublePendulum {
    params: SimulationParameters,
}

impl DoublePendulum {
    /// Create the system for the given parameters
    ///
    /// Parameters are expected to be validated; see
    /// [`SimulationParameters::validate`].
    pub fn new(params: SimulationParameters) -> Self {
        DoublePendulum { params }
    }

    /// Parameters of this system
    pub fn params(&self) -> &SimulationParameters {
        &self.params
    }

    /// dθ1/dt
    pub fn theta1_rate(&self, state: &PendulumState) -> f64 {
        state.omega1
    }

    /// dω1/dt
    pub fn omega1_rate(&self, state: &PendulumState) -> f64 {
        let p = &self.params;
        let delta = state.theta1 - state.theta2;
        let (sin_d, cos_d) = delta.sin_cos();
        let total = p.total_mass();

        let coupling = -sin_d
            * (p.mass2 * p.len1 * state.omega1 * state.omega1 * cos_d
                + p.mass2 * p.len2 * state.omega2 * state.omega2);
        let gravity = -p.gravity * (total * state.theta1.sin() - p.mass2 * state.theta2.sin() * cos_d);

        (coupling + gravity) / (p.len1 * (p.mass1 + p.mass2 * sin_d * sin_d))
    }

    /// dθ2/dt
    pub fn theta2_rate(&self, state: &PendulumState) -> f64 {
        state.omega2
    }

    /// dω2/dt
    pub fn omega2_rate(&self, state: &PendulumState) -> f64 {
        let p = &self.params;
        let delta = state.theta1 - state.theta2;
        let (sin_d, cos_d) = delta.sin_cos();
        let total = p.total_mass();

        let coupling = sin_d
            * (total * p.len1 * state.omega1 * state.omega1
                + p.mass2 * p.len2 * state.omega2 * state.omega2 * cos_d);
        let gravity = p.gravity * (total * state.theta1.sin() * cos_d - total * state.theta2.sin());

        (coupling + gravity) / (p.len2 * (p.mass1 + p.mass2 * sin_d * sin_d))
    }

    /// Kinetic energy of both bobs (J)
    pub fn kinetic_energy(&self, state: &PendulumState) -> f64 {
        let p = &self.params;
        let v1_sq = p.len1 * p.len1 * state.omega1 * state.omega1;
        let v2_sq = v1_sq
            + p.len2 * p.len2 * state.omega2 * state.omega2
            + 2.0 * p.len1 * p.len2 * state.omega1 * state.omega2 * (state.theta1 - state.theta2).cos();
        0.5 * p.mass1 * v1_sq + 0.5 * p.mass2 * v2_sq
    }

    /// Gravitational potential energy relative to the pivot height (J)
    pub fn potential_energy(&self, state: &PendulumState) -> f64 {
        let p = &self.params;
        -p.total_mass() * p.gravity * p.len1 * state.theta1.cos()
            - p.mass2 * p.gravity * p.len2 * state.theta2.cos()
    }

    /// Total mechanical energy (J)
    pub fn total_energy(&self, state: &PendulumState) -> f64 {
        self.kinetic_energy(state) + self.potential_energy(state)
    }
}

impl Dynamics for DoublePendulum {
    fn derivative(&self, state: &PendulumState) -> StateDerivative {
        StateDerivative {
            dtheta1: self.theta1_rate(state),
            domega1: self.omega1_rate(state),
            dtheta2: self.theta2_rate(state),
            domega2: self.omega2_rate(state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn system() -> DoublePendulum {
        DoublePendulum::new(SimulationParameters::default())
    }

    #[test]
    fn test_equilibrium_is_fixed_point() {
        let rate = system().derivative(&PendulumState::default());
        assert_eq!(rate, StateDerivative::default());
    }

    #[test]
    fn test_inverted_equilibrium_is_fixed_point() {
        let pi = std::f64::consts::PI;
        let rate = system().derivative(&PendulumState::at_rest(pi, pi));
        assert!(rate.domega1.abs() < 1e-12);
        assert!(rate.domega2.abs() < 1e-12);
    }

    #[test]
    fn test_horizontal_first_link_falls() {
        // First link horizontal, second hanging straight down from it.
        // Δ = π/2 so the coupling terms vanish at rest: dω1 = -g M / (l1 (m1 + m2)) = -g
        let rate = system().derivative(&PendulumState::at_rest(FRAC_PI_2, 0.0));
        assert!((rate.domega1 + 9.8).abs() < 1e-12);
        assert!(rate.domega2.abs() < 1e-12);
    }

    #[test]
    fn test_angle_rates_are_velocities() {
        let state = PendulumState::new(0.3, 1.5, -0.2, -0.7);
        let rate = system().derivative(&state);
        assert_eq!(rate.dtheta1, 1.5);
        assert_eq!(rate.dtheta2, -0.7);
    }

    #[test]
    fn test_symmetric_release_restores_toward_equilibrium() {
        let rate = system().derivative(&PendulumState::at_rest(0.1, 0.1));
        assert!(rate.domega1 < 0.0);
        assert!(rate.domega2.abs() < 1e-12);
    }

    #[test]
    fn test_energy_at_rest() {
        let sys = system();
        let state = PendulumState::default();
        assert_eq!(sys.kinetic_energy(&state), 0.0);
        // -(m1 + m2) g l1 - m2 g l2 = -2*9.8 - 9.8
        assert!((sys.potential_energy(&state) + 29.4).abs() < 1e-12);
    }

    #[test]
    fn test_kinetic_energy_rigid_rotation() {
        // Both links aligned and rotating together: v1 = ω l1, v2 = ω (l1 + l2)
        let sys = system();
        let state = PendulumState::new(0.4, 2.0, 0.4, 2.0);
        let expected = 0.5 * 1.0 * 4.0 + 0.5 * 1.0 * 16.0;
        assert!((sys.kinetic_energy(&state) - expected).abs() < 1e-12);
    }
}
