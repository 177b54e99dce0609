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
//! Runge-Kutta 4th order (RK4) integrator implementation
//!
//! The RK4 method computes four intermediate derivatives per step:
//!
//! ```text
//! k1 = f(y)
//! k2 = f(y + k1*h/2)
//! k3 = f(y + k2*h/2)
//! k4 = f(y + k3*h)
//! y(t + h) = y(t) + (k1 + 2*k2 + 2*k3 + k4)*h/6
//! ```
//!
//! Each stage perturbs all four coordinates by their own slope and evaluates
//! every derivative at that one shared stage state, which keeps the coupled
//! system consistent within a stage.
//!
//! # Properties
//!
//! - **Fourth-order accurate**: Local error O(h⁵), global error O(h⁴)
//! - **Explicit method**: No implicit solve needed
//! - **Not symplectic**: Energy may drift over long simulations
//!
//! # References
//!
//! - Butcher, J. C. (2016). Numerical Methods for Ordinary Differential Equations
//!   (3rd ed.). Wiley. Chapter 3.
//! - Press, W. H., Teukolsky, S. A., Vetterling, W. T., & Flannery, B. P. (2007).
//!   Numerical Recipes: The Art of Scientific Computing (3rd ed.). Cambridge
//!   University Press. Section 17.1.

use super::Integrator;
use crate::dynamics::Dynamics;
use crate::state::{PendulumState, StateDerivative};

/// Classical Runge-Kutta 4th order integrator
///
/// Stateless: the step size is supplied per call, so one instance can be
/// shared between steppers and threads.
///
/// # Example
///
/// ```
/// use pendulum_engine::dynamics::DoublePendulum;
/// use pendulum_engine::integration::{Integrator, RK4Integrator};
/// use pendulum_engine::params::SimulationParameters;
/// use pendulum_engine::state::PendulumState;
///
/// let system = DoublePendulum::new(SimulationParameters::default());
/// let next = RK4Integrator.step(&system, &PendulumState::at_rest(0.5, 0.5), 0.001);
/// assert!(next.theta1 < 0.5);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RK4Integrator;

impl RK4Integrator {
    /// Create a new RK4 integrator
    pub fn new() -> Self {
        RK4Integrator
    }

    /// Compute the four stage slopes for a step of size `h`
    pub fn stages<D: Dynamics>(
        dynamics: &D,
        state: &PendulumState,
        h: f64,
    ) -> [StateDerivative; 4] {
        let h_2 = h * 0.5;

        let k1 = dynamics.derivative(state);
        let k2 = dynamics.derivative(&state.offset(&k1, h_2));
        let k3 = dynamics.derivative(&state.offset(&k2, h_2));
        let k4 = dynamics.derivative(&state.offset(&k3, h));

        [k1, k2, k3, k4]
    }
}

impl Integrator for RK4Integrator {
    fn name(&self) -> &str {
        "Runge-Kutta 4"
    }

    fn step<D: Dynamics>(&self, dynamics: &D, state: &PendulumState, h: f64) -> PendulumState {
        let [k1, k2, k3, k4] = Self::stages(dynamics, state, h);
        let slope = StateDerivative::rk4_sum(&k1, &k2, &k3, &k4);
        state.offset(&slope, h / 6.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Uncoupled linear test system: θ' = ω, ω' = -θ for both links
    struct Oscillator;

    impl Dynamics for Oscillator {
        fn derivative(&self, s: &PendulumState) -> StateDerivative {
            StateDerivative {
                dtheta1: s.omega1,
                domega1: -s.theta1,
                dtheta2: s.omega2,
                domega2: -s.theta2,
            }
        }
    }

    /// Constant acceleration: θ'' = 2 for the first link only
    struct ConstantAcceleration;

    impl Dynamics for ConstantAcceleration {
        fn derivative(&self, s: &PendulumState) -> StateDerivative {
            StateDerivative {
                dtheta1: s.omega1,
                domega1: 2.0,
                dtheta2: s.omega2,
                domega2: 0.0,
            }
        }
    }

    #[test]
    fn test_rk4_name() {
        assert_eq!(RK4Integrator::new().name(), "Runge-Kutta 4");
    }

    #[test]
    fn test_rk4_constant_acceleration_exact() {
        // Quadratic motion is integrated exactly by RK4
        let mut state = PendulumState::new(0.0, 1.0, 0.0, 0.0);
        let h = 0.1;
        for _ in 0..10 {
            state = RK4Integrator.step(&ConstantAcceleration, &state, h);
        }
        // θ(1) = 1*1 + 0.5*2*1² = 2, ω(1) = 1 + 2 = 3
        assert!((state.theta1 - 2.0).abs() < 1e-12);
        assert!((state.omega1 - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_rk4_single_step_matches_taylor_series() {
        // For y' = -y style oscillator the RK4 amplification is the
        // 4th-order Taylor polynomial of cos/sin
        let h: f64 = 0.1;
        let next = RK4Integrator.step(&Oscillator, &PendulumState::new(1.0, 0.0, 0.0, 1.0), h);
        let cos_taylor = 1.0 - h.powi(2) / 2.0 + h.powi(4) / 24.0;
        let sin_taylor = h - h.powi(3) / 6.0;
        assert!((next.theta1 - cos_taylor).abs() < 1e-14);
        assert!((next.omega1 + sin_taylor).abs() < 1e-14);
        assert!((next.theta2 - sin_taylor).abs() < 1e-14);
        assert!((next.omega2 - cos_taylor).abs() < 1e-14);
    }

    #[test]
    fn test_rk4_zero_step_is_identity() {
        let state = PendulumState::new(0.3, -0.1, 0.2, 0.4);
        assert_eq!(RK4Integrator.step(&Oscillator, &state, 0.0), state);
    }

    #[test]
    fn test_rk4_stages_share_state() {
        let state = PendulumState::new(1.0, 0.0, 0.0, 0.0);
        let [k1, k2, _, _] = RK4Integrator::stages(&Oscillator, &state, 0.2);
        assert_eq!(k1.domega1, -1.0);
        // Stage 2 evaluates at θ1 = 1 + 0.1*0, ω1 = 0 + 0.1*(-1)
        assert!((k2.dtheta1 + 0.1).abs() < 1e-14);
        assert!((k2.domega1 + 1.0).abs() < 1e-14);
    }
}
