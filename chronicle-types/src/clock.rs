use crate::HybridTimestamp;
use std::sync::Mutex;

/// A monotonic Hybrid Logical Clock.
///
/// Wraps the last issued [`HybridTimestamp`] in a mutex; every call issues a
/// value strictly greater than all previously issued values. Wall-clock
/// regression never moves the clock backward. No operation blocks beyond the
/// internal mutex.
///
/// The dispatcher owns one clock per partition, so clock contention is
/// confined to a single worker plus whoever folds in received timestamps.
#[derive(Debug)]
pub struct HybridClock {
    last: Mutex<HybridTimestamp>,
}

impl HybridClock {
    /// Creates a clock starting at the current wall time.
    #[must_use]
    pub fn new() -> Self {
        Self {
            last: Mutex::new(HybridTimestamp::now()),
        }
    }

    /// Creates a clock that will issue values strictly after `start`.
    #[must_use]
    pub fn starting_at(start: HybridTimestamp) -> Self {
        Self {
            last: Mutex::new(start),
        }
    }

    /// Advances the clock using only the local physical clock and returns
    /// the new value.
    pub fn update(&self) -> HybridTimestamp {
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        let next = last.tick();
        *last = next;
        next
    }

    /// Advances the clock past both its own state and `received`, returning
    /// a value strictly greater than either.
    pub fn update_with(&self, received: &HybridTimestamp) -> HybridTimestamp {
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        let next = last.receive(received);
        *last = next;
        next
    }

    /// Returns the most recently issued value without advancing.
    #[must_use]
    pub fn peek(&self) -> HybridTimestamp {
        *self.last.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for HybridClock {
    fn default() -> Self {
        Self::new()
    }
}
