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
//! Sensitivity to initial conditions
//!
//! Integrates an ensemble of pendulums whose first angle differs by a few
//! nanoradians and reports how far apart they drift. Runs in parallel when
//! the `parallel` feature is enabled.

use pendulum_engine::dynamics::DoublePendulum;
use pendulum_engine::ensemble::{integrate_ensemble, max_separation, perturbed_initials, trajectory};
use pendulum_engine::params::SimulationParameters;
use pendulum_engine::state::PendulumState;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("Double Pendulum - Chaos Demonstration");
    println!("=====================================\n");

    let params = SimulationParameters::default();
    let system = DoublePendulum::new(params);
    let h = 1e-3;
    let center = PendulumState::at_rest(2.0, 2.5);

    // Two neighbours, tracked step by step
    let a = trajectory(params, center, h, 20_000)?;
    let b = trajectory(
        params,
        PendulumState {
            theta1: center.theta1 + 1e-9,
            ..center
        },
        h,
        20_000,
    )?;

    println!("Time (s)  Separation (rad)  Energy drift");
    println!("------------------------------------------");
    let e0 = system.total_energy(&center);
    for second in 0..=20 {
        let i = second * 1000;
        let drift = (system.total_energy(&a[i]) - e0).abs() / e0.abs();
        println!(
            "{:8}  {:16.3e}  {:12.3e}",
            second,
            max_separation(&a[i..=i], &b[i..=i]),
            drift
        );
    }

    // Spread of a larger ensemble after ten seconds
    let initials = perturbed_initials(center, 1e-6, 64);
    let finals = integrate_ensemble(params, &initials, h, 10_000)?;
    let (lo, hi) = finals
        .iter()
        .map(|s| s.theta1)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), t| (lo.min(t), hi.max(t)));

    println!(
        "\n{} pendulums starting within 1e-6 rad end up spanning {:.3} rad in θ1 after 10 s",
        finals.len(),
        hi - lo
    );

    Ok(())
}
