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
//! Pendulum state snapshots
//!
//! A [`PendulumState`] is the value exchanged between the simulation thread
//! and its consumers. Angles are measured from the downward vertical and are
//! never wrapped, so long runs may accumulate angles of large magnitude.

use crate::params::SimulationParameters;

/// Snapshot of the double pendulum configuration
///
/// # Examples
///
/// ```
/// use pendulum_engine::state::PendulumState;
///
/// let state = PendulumState::at_rest(0.5, -0.25);
/// assert_eq!(state.omega1, 0.0);
/// assert!(state.is_finite());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PendulumState {
    /// Angle of the first link (rad)
    pub theta1: f64,
    /// Angular velocity of the first link (rad/s)
    pub omega1: f64,
    /// Angle of the second link (rad)
    pub theta2: f64,
    /// Angular velocity of the second link (rad/s)
    pub omega2: f64,
}

impl PendulumState {
    /// Create a state from all four coordinates
    pub fn new(theta1: f64, omega1: f64, theta2: f64, omega2: f64) -> Self {
        PendulumState {
            theta1,
            omega1,
            theta2,
            omega2,
        }
    }

    /// Create a state released from rest at the given angles
    pub fn at_rest(theta1: f64, theta2: f64) -> Self {
        PendulumState::new(theta1, 0.0, theta2, 0.0)
    }

    /// Check that no coordinate is NaN or infinite
    pub fn is_finite(&self) -> bool {
        self.theta1.is_finite()
            && self.omega1.is_finite()
            && self.theta2.is_finite()
            && self.omega2.is_finite()
    }

    /// Perturb this state along `rate` for a time `h`
    ///
    /// Returns `self + h * rate`, the evaluation point of an RK stage.
    pub fn offset(&self, rate: &StateDerivative, h: f64) -> PendulumState {
        PendulumState {
            theta1: self.theta1 + h * rate.dtheta1,
            omega1: self.omega1 + h * rate.domega1,
            theta2: self.theta2 + h * rate.dtheta2,
            omega2: self.omega2 + h * rate.domega2,
        }
    }

    /// Largest absolute difference between the angles of two states
    pub fn angular_distance(&self, other: &PendulumState) -> f64 {
        (self.theta1 - other.theta1)
            .abs()
            .max((self.theta2 - other.theta2).abs())
    }

    /// Cartesian positions of both bobs
    ///
    /// The pivot sits at the origin and the pendulum swings in the y/z plane
    /// with z pointing up, so both bobs hang along -z at rest.
    pub fn bob_positions(&self, params: &SimulationParameters) -> BobPositions {
        let joint = [
            0.0,
            params.len1 * self.theta1.sin(),
            -params.len1 * self.theta1.cos(),
        ];
        let bob = [
            0.0,
            joint[1] + params.len2 * self.theta2.sin(),
            joint[2] - params.len2 * self.theta2.cos(),
        ];
        BobPositions { joint, bob }
    }
}

/// Time derivatives of the four state coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StateDerivative {
    /// dθ1/dt
    pub dtheta1: f64,
    /// dω1/dt
    pub domega1: f64,
    /// dθ2/dt
    pub dtheta2: f64,
    /// dω2/dt
    pub domega2: f64,
}

impl StateDerivative {
    /// Weighted RK4 combination `k1 + 2*k2 + 2*k3 + k4`
    pub fn rk4_sum(
        k1: &StateDerivative,
        k2: &StateDerivative,
        k3: &StateDerivative,
        k4: &StateDerivative,
    ) -> StateDerivative {
        StateDerivative {
            dtheta1: k1.dtheta1 + 2.0 * k2.dtheta1 + 2.0 * k3.dtheta1 + k4.dtheta1,
            domega1: k1.domega1 + 2.0 * k2.domega1 + 2.0 * k3.domega1 + k4.domega1,
            dtheta2: k1.dtheta2 + 2.0 * k2.dtheta2 + 2.0 * k3.dtheta2 + k4.dtheta2,
            domega2: k1.domega2 + 2.0 * k2.domega2 + 2.0 * k3.domega2 + k4.domega2,
        }
    }
}

/// Positions of the joint (first bob) and the tip (second bob) in meters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BobPositions {
    /// End of the first link, where the second link is attached
    pub joint: [f64; 3],
    /// End of the second link
    pub bob: [f64; 3],
}
