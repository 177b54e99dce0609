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
//! Single-slot, latest-value handoff between threads
//!
//! A [`HandoffCell`] holds at most one value. Writers overwrite it, readers
//! get a shared reference to whatever was published most recently. There is
//! no queue and no delivery guarantee: intermediate values may be skipped,
//! but a value is never torn and a reader never sees an older value after a
//! newer one.
//!
//! Values are boxed in an [`Arc`] before the lock is taken, so the critical
//! section is only the pointer swap (for writers) or the reference-count
//! increment (for readers). The previous value is dropped after the lock is
//! released.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Slot contents guarded by the lock
struct Slot<T> {
    value: Option<Arc<T>>,
    generation: u64,
}

/// Latest-wins container for one producer and any number of consumers
///
/// # Examples
///
/// ```
/// use pendulum_engine::handoff::HandoffCell;
///
/// let cell = HandoffCell::new();
/// assert!(cell.fetch().is_none());
///
/// cell.publish(1);
/// cell.publish(2);
/// assert_eq!(cell.fetch().as_deref(), Some(&2));
/// assert_eq!(cell.generation(), 2);
/// ```
pub struct HandoffCell<T> {
    slot: Mutex<Slot<T>>,
    // Mirror of `Slot::generation` readable without the lock
    generation: AtomicU64,
}

impl<T> HandoffCell<T> {
    /// Create an empty cell
    pub fn new() -> Self {
        HandoffCell {
            slot: Mutex::new(Slot {
                value: None,
                generation: 0,
            }),
            generation: AtomicU64::new(0),
        }
    }

    // A panic while holding the lock cannot leave a half-written value: the
    // slot only ever holds a whole `Arc`, so poisoning is safe to ignore.
    fn lock(&self) -> MutexGuard<'_, Slot<T>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the stored value
    ///
    /// Never waits on readers beyond the pointer swap. Returns the generation
    /// number assigned to this value (the first publication is generation 1).
    pub fn publish(&self, value: T) -> u64 {
        let value = Arc::new(value);
        let (previous, generation) = {
            let mut slot = self.lock();
            slot.generation += 1;
            self.generation.store(slot.generation, Ordering::Release);
            (slot.value.replace(value), slot.generation)
        }; // lock released here

        drop(previous);
        generation
    }

    /// Most recently published value, or `None` if nothing was published yet
    pub fn fetch(&self) -> Option<Arc<T>> {
        self.lock().value.clone()
    }

    /// Most recently published value together with its generation
    pub fn fetch_with_generation(&self) -> Option<(u64, Arc<T>)> {
        let slot = self.lock();
        slot.value.clone().map(|value| (slot.generation, value))
    }

    /// Number of values published so far
    ///
    /// Does not take the lock.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Whether anything has been published
    pub fn is_empty(&self) -> bool {
        self.generation() == 0
    }
}

impl<T: Clone> HandoffCell<T> {
    /// Copy of the most recently published value
    pub fn fetch_cloned(&self) -> Option<T> {
        self.fetch().map(|value| T::clone(&value))
    }
}

impl<T> Default for HandoffCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for HandoffCell<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandoffCell")
            .field("generation", &self.generation())
            .finish_non_exhaustive()
    }
}
