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
//! Headless stand-in for a render loop
//!
//! Starts the simulation from nearly inverted links, then polls the latest
//! state once per "frame" at 60 Hz and prints where a renderer would place
//! the joint and the tip. Run with `RUST_LOG=debug` to see thread lifecycle
//! messages.
//!
//! ```bash
//! cargo run --example headless_viewer -- 300
//! ```

use std::thread;
use std::time::{Duration, Instant};

use pendulum_engine::params::SimulationParameters;
use pendulum_engine::simulation::{fetch_latest, start_simulation, stop_simulation};

const FRAME: Duration = Duration::from_micros(16_667);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let frames: u32 = std::env::args()
        .nth(1)
        .map(|arg| arg.parse())
        .transpose()?
        .unwrap_or(240);

    println!("Double Pendulum - Headless Viewer");
    println!("=================================\n");

    let params = SimulationParameters::default();
    println!("Parameters:");
    println!("  Gravity: {:.2} m/s²", params.gravity);
    println!("  Lengths: {:.2} m, {:.2} m", params.len1, params.len2);
    println!("  Masses:  {:.2} kg, {:.2} kg\n", params.mass1, params.mass2);

    let mut sim = start_simulation(3.1415, 3.1415, params)?;
    let start = Instant::now();

    println!("Frame   Steps      θ1 (rad)   θ2 (rad)   Tip (y, z)");
    println!("------------------------------------------------------------");

    for frame in 0..frames {
        let frame_start = Instant::now();

        if let Some(state) = fetch_latest(&sim)? {
            if frame % 30 == 0 {
                let tip = state.bob_positions(&params).bob;
                println!(
                    "{:5}  {:9}  {:9.4}  {:9.4}   ({:6.3}, {:6.3})",
                    frame,
                    sim.steps_published(),
                    state.theta1,
                    state.theta2,
                    tip[1],
                    tip[2]
                );
            }
        }

        if let Some(rest) = FRAME.checked_sub(frame_start.elapsed()) {
            thread::sleep(rest);
        }
    }

    stop_simulation(&mut sim)?;
    let duration = start.elapsed().as_secs_f64();

    if frames > 0 {
        println!("\nAverage frame rate = {:.1}", frames as f64 / duration);
        println!(
            "Average physics rate = {:.0} steps/s",
            sim.steps_published() as f64 / duration
        );
    }

    Ok(())
}
