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
//! Background thread that runs a unit of work in a loop
//!
//! The driver owns one named thread. Each iteration runs the work closure to
//! completion and then checks the stop flag, so a stop request is observed
//! only between iterations and an in-flight step always finishes. Stopping
//! joins the thread; dropping a running driver stops and joins it too.

use std::any::Any;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::error::{Result, SimulationError};

/// Handle to a running work loop
#[derive(Debug)]
pub struct Driver {
    name: String,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<u64>>,
}

impl Driver {
    /// Spawn a thread named `name` that calls `work` until stopped
    ///
    /// `work` returns [`ControlFlow::Break`] to end the loop on its own.
    /// With `pace` set, the thread sleeps that long after every iteration;
    /// otherwise it runs unthrottled.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::ThreadLifecycle`] if the OS refuses to
    /// create the thread.
    pub fn spawn<F>(name: impl Into<String>, pace: Option<Duration>, mut work: F) -> Result<Self>
    where
        F: FnMut() -> ControlFlow<()> + Send + 'static,
    {
        let name = name.into();
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                let mut iterations = 0u64;
                loop {
                    let flow = work();
                    iterations += 1;
                    if flow.is_break() || thread_stop.load(Ordering::Acquire) {
                        break;
                    }
                    if let Some(pause) = pace {
                        thread::sleep(pause);
                    }
                }
                iterations
            })
            .map_err(|err| {
                SimulationError::ThreadLifecycle(format!("failed to spawn thread '{}': {}", name, err))
            })?;

        log::debug!("spawned driver thread '{}'", name);
        Ok(Driver {
            name,
            stop,
            handle: Some(handle),
        })
    }

    /// Name of the driver thread
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the thread is still executing its loop
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Request the loop to end without waiting for it
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Release);
    }

    /// Stop the loop and wait for the thread to exit
    ///
    /// Calling this again after a successful stop is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::ThreadLifecycle`] if the thread panicked.
    pub fn stop(&mut self) -> Result<()> {
        self.request_stop();
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };

        match handle.join() {
            Ok(iterations) => {
                log::debug!("driver thread '{}' exited after {} iterations", self.name, iterations);
                Ok(())
            }
            Err(payload) => Err(SimulationError::ThreadLifecycle(format!(
                "thread '{}' panicked: {}",
                self.name,
                panic_message(payload.as_ref())
            ))),
        }
    }
}

impl Drop for Driver {
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            log::error!("{}", err);
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
