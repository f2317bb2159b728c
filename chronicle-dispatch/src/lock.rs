//! Named mutual exclusion for command evaluation.
//!
//! Locks are named resources acquired on behalf of a logical owner, the
//! command's UUID. Acquisition is re-entrant per owner and refcounted, since
//! a command and its terminal retry acquire the same names. [`TrackingLocks`]
//! records every acquisition so the dispatcher can release them all at
//! end-of-command.

use chronicle_types::EntityId;
use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex};
use tracing::warn;

/// Named, owner-scoped mutual exclusion.
pub trait LockProvider: Send + Sync {
    /// Acquires `name` for `owner`, blocking while another owner holds it.
    /// Re-entrant: the same owner may acquire a held name again.
    fn acquire(&self, name: &str, owner: EntityId);

    /// Releases one acquisition of `name` by `owner`. The name frees once
    /// every acquisition is released.
    fn release(&self, name: &str, owner: EntityId);
}

#[derive(Debug)]
struct Held {
    owner: EntityId,
    count: u32,
}

/// In-process lock table: a mutex-guarded map plus a condvar that wakes
/// waiters whenever any name frees.
#[derive(Default)]
pub struct LocalLockProvider {
    table: Mutex<HashMap<String, Held>>,
    freed: Condvar,
}

impl LocalLockProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True if any owner currently holds `name`.
    #[must_use]
    pub fn is_held(&self, name: &str) -> bool {
        self.table
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(name)
    }
}

impl LockProvider for LocalLockProvider {
    fn acquire(&self, name: &str, owner: EntityId) {
        let mut table = self.table.lock().unwrap_or_else(|e| e.into_inner());
        loop {
            match table.get_mut(name) {
                None => {
                    table.insert(name.to_string(), Held { owner, count: 1 });
                    return;
                }
                Some(held) if held.owner == owner => {
                    held.count += 1;
                    return;
                }
                Some(_) => {
                    table = self.freed.wait(table).unwrap_or_else(|e| e.into_inner());
                }
            }
        }
    }

    fn release(&self, name: &str, owner: EntityId) {
        let mut table = self.table.lock().unwrap_or_else(|e| e.into_inner());
        match table.get_mut(name) {
            Some(held) if held.owner == owner => {
                held.count -= 1;
                if held.count == 0 {
                    table.remove(name);
                    self.freed.notify_all();
                }
            }
            _ => warn!(name, owner = %owner, "release of a lock this owner does not hold"),
        }
    }
}

/// Decorator that records every lock one command acquires.
///
/// Dropped or drained at end-of-command, releasing each recorded acquisition
/// exactly once.
pub struct TrackingLocks {
    provider: Arc<dyn LockProvider>,
    owner: EntityId,
    held: Mutex<Vec<String>>,
}

impl TrackingLocks {
    #[must_use]
    pub fn new(provider: Arc<dyn LockProvider>, owner: EntityId) -> Self {
        Self {
            provider,
            owner,
            held: Mutex::new(Vec::new()),
        }
    }

    /// The logical owner the acquisitions are attributed to.
    #[must_use]
    pub fn owner(&self) -> EntityId {
        self.owner
    }

    /// Acquires `name` for the owner and records the acquisition.
    pub fn acquire(&self, name: &str) {
        self.provider.acquire(name, self.owner);
        self.held
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(name.to_string());
    }

    /// The recorded acquisitions, in order.
    #[must_use]
    pub fn held(&self) -> Vec<String> {
        self.held.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Releases every recorded acquisition.
    pub fn release_all(&self) {
        let names: Vec<String> = self
            .held
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .drain(..)
            .collect();
        for name in names {
            self.provider.release(&name, self.owner);
        }
    }
}

impl Drop for TrackingLocks {
    fn drop(&mut self) {
        self.release_all();
    }
}
