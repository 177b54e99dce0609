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
//! Physical parameters of the double pendulum
//!
//! Parameters are fixed at construction and shared by value with the
//! simulation thread. They are never mutated during a run.

use crate::error::{Result, SimulationError};

/// Standard gravitational acceleration used by [`SimulationParameters::default`] (m/s²)
pub const DEFAULT_GRAVITY: f64 = 9.8;

/// Immutable physical configuration of a two-link pendulum
///
/// # Examples
///
/// ```
/// use pendulum_engine::params::SimulationParameters;
///
/// let params = SimulationParameters::default()
///     .with_lengths(1.0, 0.5)
///     .with_masses(2.0, 1.0);
/// assert!(params.validate().is_ok());
/// assert_eq!(params.total_mass(), 3.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParameters {
    /// Gravitational acceleration (m/s²)
    pub gravity: f64,
    /// Length of the first link (m)
    pub len1: f64,
    /// Length of the second link (m)
    pub len2: f64,
    /// Mass of the first bob (kg)
    pub mass1: f64,
    /// Mass of the second bob (kg)
    pub mass2: f64,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        SimulationParameters {
            gravity: DEFAULT_GRAVITY,
            len1: 1.0,
            len2: 1.0,
            mass1: 1.0,
            mass2: 1.0,
        }
    }
}

impl SimulationParameters {
    /// Create parameters from explicit values
    pub fn new(gravity: f64, len1: f64, len2: f64, mass1: f64, mass2: f64) -> Self {
        SimulationParameters {
            gravity,
            len1,
            len2,
            mass1,
            mass2,
        }
    }

    /// Set the gravitational acceleration
    pub fn with_gravity(mut self, gravity: f64) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set both link lengths
    pub fn with_lengths(mut self, len1: f64, len2: f64) -> Self {
        self.len1 = len1;
        self.len2 = len2;
        self
    }

    /// Set both bob masses
    pub fn with_masses(mut self, mass1: f64, mass2: f64) -> Self {
        self.mass1 = mass1;
        self.mass2 = mass2;
        self
    }

    /// Combined mass of both bobs
    pub fn total_mass(&self) -> f64 {
        self.mass1 + self.mass2
    }

    /// Check that the configuration describes a physical pendulum
    ///
    /// Masses and lengths must be strictly positive and finite. Gravity must
    /// be finite; zero or negative gravity is allowed.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Configuration`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("len1", self.len1),
            ("len2", self.len2),
            ("mass1", self.mass1),
            ("mass2", self.mass2),
        ];
        for (name, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(SimulationError::Configuration(format!(
                    "{} must be positive and finite, got {}",
                    name, value
                )));
            }
        }

        if !self.gravity.is_finite() {
            return Err(SimulationError::Configuration(format!(
                "gravity must be finite, got {}",
                self.gravity
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_parameters() {
        let params = SimulationParameters::default();
        assert_eq!(params.gravity, 9.8);
        assert_eq!(params.len1, 1.0);
        assert_eq!(params.len2, 1.0);
        assert_eq!(params.mass1, 1.0);
        assert_eq!(params.mass2, 1.0);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_builder_setters() {
        let params = SimulationParameters::default()
            .with_gravity(1.62)
            .with_lengths(2.0, 3.0)
            .with_masses(4.0, 5.0);
        assert_eq!(params, SimulationParameters::new(1.62, 2.0, 3.0, 4.0, 5.0));
        assert_eq!(params.total_mass(), 9.0);
    }

    #[test]
    fn test_rejects_non_positive_values() {
        let cases = [
            SimulationParameters::default().with_lengths(0.0, 1.0),
            SimulationParameters::default().with_lengths(1.0, -1.0),
            SimulationParameters::default().with_masses(-2.0, 1.0),
            SimulationParameters::default().with_masses(1.0, 0.0),
            SimulationParameters::default().with_masses(f64::NAN, 1.0),
            SimulationParameters::default().with_lengths(f64::INFINITY, 1.0),
        ];
        for params in cases {
            match params.validate() {
                Err(SimulationError::Configuration(msg)) => {
                    assert!(msg.contains("must be positive"), "unexpected message: {}", msg)
                }
                other => panic!("expected configuration error for {:?}, got {:?}", params, other),
            }
        }
    }

    #[test]
    fn test_gravity_rules() {
        assert!(SimulationParameters::default().with_gravity(0.0).validate().is_ok());
        assert!(SimulationParameters::default().with_gravity(-9.8).validate().is_ok());
        assert!(SimulationParameters::default()
            .with_gravity(f64::NAN)
            .validate()
            .is_err());
    }
}
