use crate::{EntityDraft, EntityHandle, JournalListener, JournalResult, StoredEntity};
use chronicle_layout::{Fingerprint, SchemaRegistry};
use chronicle_types::EntityId;
use std::any::Any;
use std::sync::Arc;

/// Handle for one in-flight journal transaction.
///
/// State machine: Idle → Writing → Committed | Aborted. Obtained from
/// [`Journal::begin_transaction`]; consumed by [`Journal::commit`] or
/// [`Journal::rollback`], so a finished transaction cannot be reused.
#[derive(Debug)]
pub struct Transaction {
    id: u64,
}

impl Transaction {
    /// Wraps a backend-assigned transaction id.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self { id }
    }

    /// The backend-assigned id.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }
}

/// The transactional durable log of commands, events, and causality links.
///
/// Implementations key entries by `schema_fingerprint || uuid`, making "all
/// entities of type T" a contiguous range scan. A command and its events are
/// never partially visible: [`Journal::get`] returns `None` for both until
/// the enclosing transaction has committed.
pub trait Journal: Send + Sync {
    /// The schema registry this journal encodes and decodes through.
    fn registry(&self) -> &Arc<SchemaRegistry>;

    /// Opens a transaction.
    fn begin_transaction(&self) -> JournalResult<Transaction>;

    /// Serializes and stages a draft, then immediately deserializes what was
    /// written and returns the round-tripped entity, surfacing any schema
    /// mismatch at write time.
    fn record(&self, tx: &Transaction, draft: EntityDraft) -> JournalResult<Arc<StoredEntity>>;

    /// Stages a causality link between a command and one of its events,
    /// atomically with the event write.
    fn link(&self, tx: &Transaction, command: EntityId, event: EntityId) -> JournalResult<()>;

    /// Commits a transaction, making its records visible. Fires
    /// `on_commit` on every listener.
    fn commit(&self, tx: Transaction) -> JournalResult<()>;

    /// Discards a transaction's staged records. Fires `on_abort` on every
    /// listener with the triggering error.
    fn rollback(&self, tx: Transaction, cause: &crate::JournalError) -> JournalResult<()>;

    /// Looks up a committed entity by UUID.
    fn get(&self, uuid: EntityId) -> JournalResult<Option<Arc<StoredEntity>>>;

    /// Handles for all committed commands of the given schema, in the
    /// backend's natural key order.
    fn command_iterator(
        self: Arc<Self>,
        fingerprint: &Fingerprint,
    ) -> JournalResult<Vec<EntityHandle>>;

    /// Handles for all committed events of the given schema, in the
    /// backend's natural key order.
    fn event_iterator(
        self: Arc<Self>,
        fingerprint: &Fingerprint,
    ) -> JournalResult<Vec<EntityHandle>>;

    /// UUIDs of the events produced by a command, in production order.
    fn events_of_command(&self, command: EntityId) -> JournalResult<Vec<EntityId>>;

    /// UUID of the command that produced an event.
    fn command_of_event(&self, event: EntityId) -> JournalResult<Option<EntityId>>;

    /// Drops every committed record and link.
    fn clear(&self) -> JournalResult<()>;

    /// Number of committed entities of the given schema.
    fn size_of(&self, fingerprint: &Fingerprint) -> JournalResult<u64>;

    /// True if no committed entity carries the given schema.
    fn is_empty_of(&self, fingerprint: &Fingerprint) -> JournalResult<bool> {
        Ok(self.size_of(fingerprint)? == 0)
    }

    /// Registers a listener for the write protocol's callbacks.
    fn add_listener(&self, listener: Arc<dyn JournalListener>);

    /// Forwards a command's intermediate result state to listeners.
    fn notify_command_state(&self, state: &(dyn Any + Send));
}
