use crate::TrackingLocks;
use chronicle_journal::Journal;
use chronicle_types::{EntityId, HybridTimestamp};
use std::sync::Arc;

/// What a command sees while it evaluates: its own identity and timestamp,
/// tracked lock acquisition, and read access to the journal.
pub struct CommandContext<'a> {
    uuid: EntityId,
    timestamp: HybridTimestamp,
    locks: &'a TrackingLocks,
    journal: Arc<dyn Journal>,
}

impl<'a> CommandContext<'a> {
    #[must_use]
    pub fn new(
        uuid: EntityId,
        timestamp: HybridTimestamp,
        locks: &'a TrackingLocks,
        journal: Arc<dyn Journal>,
    ) -> Self {
        Self {
            uuid,
            timestamp,
            locks,
            journal,
        }
    }

    /// The dispatcher-assigned command identity.
    #[must_use]
    pub fn uuid(&self) -> EntityId {
        self.uuid
    }

    /// The command's starting timestamp; every produced event is stamped
    /// strictly after it.
    #[must_use]
    pub fn timestamp(&self) -> HybridTimestamp {
        self.timestamp
    }

    /// Acquires a named lock, tracked for release at end-of-command.
    pub fn lock(&self, name: &str) {
        self.locks.acquire(name);
    }

    /// Read access to the committed journal.
    #[must_use]
    pub fn journal(&self) -> &Arc<dyn Journal> {
        &self.journal
    }
}
