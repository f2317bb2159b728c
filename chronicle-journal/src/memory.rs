//! In-memory reference journal.
//!
//! Keeps committed records in a `BTreeMap` keyed by
//! `schema_fingerprint || uuid`, so "all entities of type T" is a contiguous
//! range scan — the same key discipline a durable backend would use.
//! Transactions stage into side buffers and merge atomically on commit, so
//! uncommitted records are never visible to readers.

use crate::{
    EntityDraft, EntityHandle, Journal, JournalError, JournalListener, JournalResult, StoredEntity,
    Transaction,
};
use chronicle_layout::{Fingerprint, SchemaRegistry};
use chronicle_types::{EntityId, EntityKind};
use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, warn};

fn entry_key(fingerprint: &Fingerprint, uuid: EntityId) -> Vec<u8> {
    let mut key = Vec::with_capacity(48);
    key.extend_from_slice(fingerprint.as_bytes());
    key.extend_from_slice(&uuid.to_bytes());
    key
}

#[derive(Default)]
struct Committed {
    entries: BTreeMap<Vec<u8>, Arc<StoredEntity>>,
    by_uuid: HashMap<EntityId, Vec<u8>>,
    events_by_command: HashMap<EntityId, Vec<EntityId>>,
    command_by_event: HashMap<EntityId, EntityId>,
}

#[derive(Default)]
struct TxBuffer {
    entries: Vec<(Vec<u8>, Arc<StoredEntity>)>,
    links: Vec<(EntityId, EntityId)>,
}

/// The in-memory [`Journal`] implementation.
pub struct MemoryJournal {
    registry: Arc<SchemaRegistry>,
    committed: RwLock<Committed>,
    staging: Mutex<HashMap<u64, TxBuffer>>,
    next_tx: AtomicU64,
    listeners: RwLock<Vec<Arc<dyn JournalListener>>>,
}

impl MemoryJournal {
    /// A journal encoding and decoding through `registry`.
    #[must_use]
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self {
            registry,
            committed: RwLock::new(Committed::default()),
            staging: Mutex::new(HashMap::new()),
            next_tx: AtomicU64::new(1),
            listeners: RwLock::new(Vec::new()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Committed> {
        self.committed.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Committed> {
        self.committed.write().unwrap_or_else(|e| e.into_inner())
    }

    fn staged(&self) -> MutexGuard<'_, HashMap<u64, TxBuffer>> {
        self.staging.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn listeners(&self) -> Vec<Arc<dyn JournalListener>> {
        self.listeners
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn scan(
        self: Arc<Self>,
        fingerprint: &Fingerprint,
        kind: EntityKind,
    ) -> Vec<EntityHandle> {
        let committed = self.read();
        let prefix: &[u8] = fingerprint.as_bytes();
        let handles: Vec<EntityHandle> = committed
            .entries
            .range(prefix.to_vec()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .filter(|(_, entity)| entity.kind() == kind)
            .map(|(_, entity)| entity.uuid())
            .collect::<Vec<_>>()
            .into_iter()
            .map(|uuid| EntityHandle::deferred(uuid, self.clone() as Arc<dyn Journal>))
            .collect();
        handles
    }
}

impl Journal for MemoryJournal {
    fn registry(&self) -> &Arc<SchemaRegistry> {
        &self.registry
    }

    fn begin_transaction(&self) -> JournalResult<Transaction> {
        let id = self.next_tx.fetch_add(1, Ordering::Relaxed);
        self.staged().insert(id, TxBuffer::default());
        debug!(tx = id, "journal transaction opened");
        Ok(Transaction::new(id))
    }

    fn record(&self, tx: &Transaction, draft: EntityDraft) -> JournalResult<Arc<StoredEntity>> {
        // Serialize, then immediately deserialize what was written: any
        // schema mismatch surfaces here, not on a later read.
        let (fingerprint, bytes) =
            self.registry
                .encode_erased(draft.type_id(), draft.type_name(), draft.body())?;
        let body = self.registry.decode(&fingerprint, &bytes)?;
        let entity = Arc::new(StoredEntity::new(
            draft.uuid(),
            draft.timestamp(),
            draft.kind(),
            fingerprint,
            draft.type_name(),
            Arc::from(body),
        ));

        {
            let mut staged = self.staged();
            let buffer = staged
                .get_mut(&tx.id())
                .ok_or(JournalError::UnknownTransaction(tx.id()))?;
            buffer
                .entries
                .push((entry_key(&fingerprint, entity.uuid()), entity.clone()));
        }

        if entity.kind() == EntityKind::Event {
            for listener in self.listeners() {
                listener.on_event(&entity);
            }
        }
        Ok(entity)
    }

    fn link(&self, tx: &Transaction, command: EntityId, event: EntityId) -> JournalResult<()> {
        let mut staged = self.staged();
        let buffer = staged
            .get_mut(&tx.id())
            .ok_or(JournalError::UnknownTransaction(tx.id()))?;
        buffer.links.push((command, event));
        Ok(())
    }

    fn commit(&self, tx: Transaction) -> JournalResult<()> {
        let buffer = self
            .staged()
            .remove(&tx.id())
            .ok_or(JournalError::UnknownTransaction(tx.id()))?;

        let mut duplicate = None;
        {
            let mut committed = self.write();
            for (_, entity) in &buffer.entries {
                if committed.by_uuid.contains_key(&entity.uuid()) {
                    duplicate = Some(entity.uuid());
                    break;
                }
            }
            if duplicate.is_none() {
                for (key, entity) in buffer.entries {
                    committed.by_uuid.insert(entity.uuid(), key.clone());
                    committed.entries.insert(key, entity);
                }
                for (command, event) in buffer.links {
                    committed
                        .events_by_command
                        .entry(command)
                        .or_default()
                        .push(event);
                    committed.command_by_event.insert(event, command);
                }
            }
        }

        // A constraint failure at commit is a rollback: the staged buffer is
        // gone and listeners hear about the abort.
        if let Some(uuid) = duplicate {
            let cause = JournalError::DuplicateEntity(uuid);
            warn!(tx = tx.id(), %cause, "journal transaction rolled back");
            for listener in self.listeners() {
                listener.on_abort(&cause);
            }
            return Err(cause);
        }

        debug!(tx = tx.id(), "journal transaction committed");
        for listener in self.listeners() {
            listener.on_commit();
        }
        Ok(())
    }

    fn rollback(&self, tx: Transaction, cause: &JournalError) -> JournalResult<()> {
        let removed = self.staged().remove(&tx.id());
        if removed.is_none() {
            return Err(JournalError::UnknownTransaction(tx.id()));
        }
        warn!(tx = tx.id(), %cause, "journal transaction rolled back");
        for listener in self.listeners() {
            listener.on_abort(cause);
        }
        Ok(())
    }

    fn get(&self, uuid: EntityId) -> JournalResult<Option<Arc<StoredEntity>>> {
        let committed = self.read();
        Ok(committed
            .by_uuid
            .get(&uuid)
            .and_then(|key| committed.entries.get(key))
            .cloned())
    }

    fn command_iterator(
        self: Arc<Self>,
        fingerprint: &Fingerprint,
    ) -> JournalResult<Vec<EntityHandle>> {
        Ok(self.scan(fingerprint, EntityKind::Command))
    }

    fn event_iterator(
        self: Arc<Self>,
        fingerprint: &Fingerprint,
    ) -> JournalResult<Vec<EntityHandle>> {
        Ok(self.scan(fingerprint, EntityKind::Event))
    }

    fn events_of_command(&self, command: EntityId) -> JournalResult<Vec<EntityId>> {
        Ok(self
            .read()
            .events_by_command
            .get(&command)
            .cloned()
            .unwrap_or_default())
    }

    fn command_of_event(&self, event: EntityId) -> JournalResult<Option<EntityId>> {
        Ok(self.read().command_by_event.get(&event).copied())
    }

    fn clear(&self) -> JournalResult<()> {
        let mut committed = self.write();
        committed.entries.clear();
        committed.by_uuid.clear();
        committed.events_by_command.clear();
        committed.command_by_event.clear();
        Ok(())
    }

    fn size_of(&self, fingerprint: &Fingerprint) -> JournalResult<u64> {
        let committed = self.read();
        let prefix: &[u8] = fingerprint.as_bytes();
        Ok(committed
            .entries
            .range(prefix.to_vec()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .count() as u64)
    }

    fn add_listener(&self, listener: Arc<dyn JournalListener>) {
        self.listeners
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(listener);
    }

    fn notify_command_state(&self, state: &(dyn Any + Send)) {
        for listener in self.listeners() {
            listener.on_command_state_received(state);
        }
    }
}

impl std::fmt::Debug for MemoryJournal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryJournal")
            .field("committed", &self.read().entries.len())
            .finish()
    }
}
