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
//! Tests verifying RK4 accuracy and proper staging implementation
//!
//! These tests compare the double pendulum integrator against independent
//! references: a separately written single pendulum integrator, the
//! small-angle analytical solution, and its own fine-step solution.

use pendulum_engine::ensemble::trajectory;
use pendulum_engine::params::SimulationParameters;
use pendulum_engine::state::PendulumState;
use pendulum_engine::stepper::Stepper;

/// Mass small enough that the second bob barely acts on the first link
const NEGLIGIBLE_MASS: f64 = 1e-9;

/// Independent RK4 for a simple pendulum: θ'' = -(g/l) sin θ
fn reference_single_pendulum(g: f64, l: f64, theta0: f64, h: f64, steps: usize) -> Vec<f64> {
    let accel = |theta: f64| -(g / l) * theta.sin();
    let (mut theta, mut omega) = (theta0, 0.0_f64);
    let mut out = vec![theta];

    for _ in 0..steps {
        let k1_t = omega;
        let k1_w = accel(theta);
        let k2_t = omega + 0.5 * h * k1_w;
        let k2_w = accel(theta + 0.5 * h * k1_t);
        let k3_t = omega + 0.5 * h * k2_w;
        let k3_w = accel(theta + 0.5 * h * k2_t);
        let k4_t = omega + h * k3_w;
        let k4_w = accel(theta + h * k3_t);

        theta += h / 6.0 * (k1_t + 2.0 * k2_t + 2.0 * k3_t + k4_t);
        omega += h / 6.0 * (k1_w + 2.0 * k2_w + 2.0 * k3_w + k4_w);
        out.push(theta);
    }
    out
}

#[test]
fn test_light_second_bob_matches_single_pendulum() {
    let params = SimulationParameters::default().with_masses(1.0, NEGLIGIBLE_MASS);
    let (h, steps) = (1e-3, 2000);

    let path = trajectory(params, PendulumState::at_rest(0.5, 0.5), h, steps).unwrap();
    let reference = reference_single_pendulum(params.gravity, params.len1, 0.5, h, steps);

    let max_error = path
        .iter()
        .zip(&reference)
        .map(|(s, r)| (s.theta1 - r).abs())
        .fold(0.0, f64::max);
    assert!(
        max_error < 1e-5,
        "First link deviates from single pendulum reference: {:.3e}",
        max_error
    );
}

#[test]
fn test_small_angle_matches_analytical_solution() {
    // θ(t) = θ0 cos(√(g/l) t) for small θ0
    let params = SimulationParameters::default().with_masses(1.0, NEGLIGIBLE_MASS);
    let theta0 = 1e-3;
    let (h, steps) = (1e-3, 3000);
    let omega_n = (params.gravity / params.len1).sqrt();

    let path = trajectory(params, PendulumState::at_rest(theta0, theta0), h, steps).unwrap();
    for (i, state) in path.iter().enumerate() {
        let t = i as f64 * h;
        let analytical = theta0 * (omega_n * t).cos();
        assert!(
            (state.theta1 - analytical).abs() < 1e-7,
            "t = {:.3}: RK4 {:.9e}, analytical {:.9e}",
            t,
            state.theta1,
            analytical
        );
    }
}

#[test]
fn test_fourth_order_convergence() {
    // Halving h should cut the global error by about 2⁴ = 16
    let params = SimulationParameters::default();
    let initial = PendulumState::at_rest(1.0, 0.5);
    let t_final = 1.0;

    let run = |h: f64| {
        let steps = (t_final / h).round() as usize;
        *trajectory(params, initial, h, steps).unwrap().last().unwrap()
    };
    let reference = run(0.01 / 64.0);
    let coarse = run(0.01);
    let fine = run(0.005);

    let error = |s: &PendulumState| {
        (s.theta1 - reference.theta1)
            .abs()
            .max((s.theta2 - reference.theta2).abs())
    };
    let ratio = error(&coarse) / error(&fine);
    assert!(
        ratio > 8.0 && ratio < 32.0,
        "Error ratio {:.2} is not consistent with fourth-order convergence",
        ratio
    );
}

#[test]
fn test_determinism_with_fixed_step_sequence() {
    let params = SimulationParameters::default();
    let initial = PendulumState::new(2.0, 0.1, 2.5, -0.3);
    let steps = [1e-3, 2e-3, 5e-4, 1e-3, 3e-3, 1e-4];

    let run = || {
        let mut stepper = Stepper::new(initial, params).unwrap();
        let mut states = Vec::new();
        for _ in 0..200 {
            for &h in &steps {
                states.push(stepper.advance_by(h).unwrap());
            }
        }
        states
    };

    let first = run();
    let second = run();
    assert_eq!(first, second, "Identical inputs must give bit-identical states");
}

#[test]
fn test_free_rotation_without_gravity() {
    // With g = 0 and both links spinning together, the pair rotates rigidly
    let params = SimulationParameters::default().with_gravity(0.0);
    let omega = 2.0;
    let (h, steps) = (1e-3, 1000);

    let path = trajectory(params, PendulumState::new(0.0, omega, 0.0, omega), h, steps).unwrap();
    let last = path.last().unwrap();
    let t = h * steps as f64;

    assert!((last.theta1 - omega * t).abs() < 1e-9);
    assert!((last.theta2 - omega * t).abs() < 1e-9);
    assert!((last.omega1 - omega).abs() < 1e-9);
}
