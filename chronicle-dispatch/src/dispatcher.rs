//! Partitioned command execution.
//!
//! Commands route to one of N partitions by a stable hash of their
//! dispatcher-assigned UUID. Each partition is a dedicated worker thread
//! draining a bounded queue and owning its own [`HybridClock`], so ordering
//! is guaranteed within a partition and across partitions only up to the
//! causal relationships the clocks capture.
//!
//! Per command, the worker runs the write protocol: advance the clock and
//! snapshot the command's timestamp, evaluate under tracked locks, journal
//! events and the command in one transaction (stamping each event with the
//! next clock value), mirror the written entities into the index engine,
//! notify subscribers, release the tracked locks, and resolve the caller's
//! completion. A failure while producing or journalling events triggers
//! exactly one retry of the whole write with a synthetic [`CommandTerminated`]
//! event substituted for the failed stream; a failure during that retry
//! propagates raw.

use crate::{
    Command, CommandContext, CommandError, Completion, DispatchError, DispatchResult, Evaluation,
    LockProvider, Subscription, TrackingLocks,
};
use chronicle_index::IndexEngine;
use chronicle_journal::{
    CommandTerminated, EntityDraft, EntityHandle, Journal, JournalError, StoredEntity,
};
use chronicle_types::{EntityId, EntityKind, HybridClock, HybridTimestamp};
use std::num::NonZeroUsize;
use std::sync::mpsc::{sync_channel, SyncSender};
use std::sync::{Arc, RwLock};
use std::thread::{self, JoinHandle};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

/// Dispatcher sizing.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Worker partitions. Zero means available parallelism.
    pub partitions: usize,
    /// Commands each partition queue buffers before submit blocks.
    pub queue_depth: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            partitions: 0,
            queue_depth: 256,
        }
    }
}

impl DispatcherConfig {
    fn effective_partitions(&self) -> usize {
        if self.partitions > 0 {
            self.partitions
        } else {
            thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1)
        }
    }
}

struct Shared {
    journal: Arc<dyn Journal>,
    index: Arc<dyn IndexEngine>,
    locks: Arc<dyn LockProvider>,
    subscriptions: RwLock<Vec<Subscription>>,
}

type Job = Box<dyn FnOnce(&Shared, &HybridClock) + Send>;

/// Partitioned, ordered command executor.
pub struct Dispatcher {
    shared: Arc<Shared>,
    senders: Vec<SyncSender<Job>>,
    workers: Vec<JoinHandle<()>>,
}

impl Dispatcher {
    /// Spawns the partition workers.
    pub fn new(
        config: DispatcherConfig,
        journal: Arc<dyn Journal>,
        index: Arc<dyn IndexEngine>,
        locks: Arc<dyn LockProvider>,
    ) -> DispatchResult<Self> {
        let shared = Arc::new(Shared {
            journal,
            index,
            locks,
            subscriptions: RwLock::new(Vec::new()),
        });
        let partitions = config.effective_partitions();
        let mut senders = Vec::with_capacity(partitions);
        let mut workers = Vec::with_capacity(partitions);
        for partition in 0..partitions {
            let (sender, receiver) = sync_channel::<Job>(config.queue_depth.max(1));
            let worker_shared = shared.clone();
            let handle = thread::Builder::new()
                .name(format!("chronicle-dispatch-{partition}"))
                .spawn(move || {
                    let clock = HybridClock::new();
                    while let Ok(job) = receiver.recv() {
                        job(&worker_shared, &clock);
                    }
                    debug!(partition, "partition worker drained");
                })?;
            senders.push(sender);
            workers.push(handle);
        }
        info!(partitions, "dispatcher started");
        Ok(Self {
            shared,
            senders,
            workers,
        })
    }

    /// Number of partitions.
    #[must_use]
    pub fn partitions(&self) -> usize {
        self.senders.len()
    }

    /// Registers a post-commit subscriber.
    pub fn subscribe(&self, subscription: Subscription) {
        self.shared
            .subscriptions
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(subscription);
    }

    /// Assigns the command a UUID, routes it to its partition, and returns
    /// the caller's completion.
    ///
    /// If the dispatcher has stopped, the completion resolves with
    /// [`DispatchError::Stopped`].
    pub fn submit<C: Command>(&self, command: C) -> Completion<C::Output> {
        let (responder, receiver) = oneshot::channel();
        let uuid = EntityId::new();
        if self.senders.is_empty() {
            let _ = responder.send(Err(DispatchError::Stopped));
            return Completion::new(receiver);
        }
        let partition = partition_of(uuid, self.senders.len());
        debug!(command = %uuid, partition, "command submitted");
        let job: Job = Box::new(move |shared, clock| {
            run_command(shared, clock, uuid, command, responder);
        });
        // A closed queue drops the job and with it the responder; the
        // completion then resolves as Stopped.
        let _ = self.senders[partition].send(job);
        Completion::new(receiver)
    }

    /// Closes the queues and joins every worker. Queued commands finish
    /// first.
    pub fn shutdown(&mut self) {
        if self.senders.is_empty() && self.workers.is_empty() {
            return;
        }
        self.senders.clear();
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                warn!("partition worker panicked");
            }
        }
        info!("dispatcher stopped");
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Folds the first eight UUID bytes into the partition index.
fn partition_of(uuid: EntityId, partitions: usize) -> usize {
    let bytes = uuid.to_bytes();
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&bytes[..8]);
    (u64::from_be_bytes(raw) % partitions as u64) as usize
}

/// What sank the first write attempt.
enum WriteFailure {
    Command(CommandError),
    Journal(JournalError),
}

impl WriteFailure {
    fn kind(&self) -> String {
        match self {
            Self::Command(err) => err.kind().to_string(),
            Self::Journal(err) => err.kind_name().to_string(),
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Command(err) => err.message().to_string(),
            Self::Journal(err) => err.to_string(),
        }
    }

    fn into_dispatch(self) -> DispatchError {
        match self {
            Self::Command(err) => DispatchError::Command(err),
            Self::Journal(err) => DispatchError::Journal(err),
        }
    }
}

fn run_command<C: Command>(
    shared: &Shared,
    clock: &HybridClock,
    uuid: EntityId,
    command: C,
    responder: oneshot::Sender<DispatchResult<C::Output>>,
) {
    let command_ts = clock.update();
    let locks = TrackingLocks::new(shared.locks.clone(), uuid);
    let evaluated = {
        let mut ctx = CommandContext::new(uuid, command_ts, &locks, shared.journal.clone());
        command.evaluate(&mut ctx)
    };

    let outcome = match evaluated {
        Ok(Evaluation { state, events }) => {
            // Intermediate state is known before the stream is drained.
            shared.journal.notify_command_state(&state);
            match write_all(shared, clock, &command, uuid, command_ts, events) {
                Ok(written) => {
                    publish(shared, &written);
                    Ok(command.output(state))
                }
                Err(failure) => Err(terminate(shared, clock, &command, uuid, command_ts, failure)),
            }
        }
        Err(err) => Err(terminate(
            shared,
            clock,
            &command,
            uuid,
            command_ts,
            WriteFailure::Command(err),
        )),
    };

    locks.release_all();
    if responder.send(outcome).is_err() {
        debug!(command = %uuid, "completion receiver dropped");
    }
}

/// First write attempt: events in stream order, then the command, one
/// transaction.
fn write_all<C: Command>(
    shared: &Shared,
    clock: &HybridClock,
    command: &C,
    uuid: EntityId,
    command_ts: HybridTimestamp,
    events: crate::EventStream,
) -> Result<Vec<Arc<StoredEntity>>, WriteFailure> {
    let journal = &shared.journal;
    let tx = journal.begin_transaction().map_err(WriteFailure::Journal)?;
    let mut written = Vec::new();
    for item in events {
        let draft = match item {
            Ok(draft) => draft.at(clock.update()),
            Err(err) => {
                let cause = JournalError::Evaluation {
                    kind: err.kind().to_string(),
                    message: err.message().to_string(),
                };
                roll_back(journal, tx, &cause);
                return Err(WriteFailure::Command(err));
            }
        };
        let event_id = draft.uuid();
        let staged = journal.record(&tx, draft).and_then(|stored| {
            journal.link(&tx, uuid, event_id)?;
            Ok(stored)
        });
        match staged {
            Ok(stored) => written.push(stored),
            Err(err) => {
                roll_back(journal, tx, &err);
                return Err(WriteFailure::Journal(err));
            }
        }
    }
    let command_draft = EntityDraft::with_uuid(uuid, command_ts, EntityKind::Command, command.clone());
    match journal.record(&tx, command_draft) {
        Ok(stored) => written.push(stored),
        Err(err) => {
            roll_back(journal, tx, &err);
            return Err(WriteFailure::Journal(err));
        }
    }
    journal.commit(tx).map_err(WriteFailure::Journal)?;
    Ok(written)
}

/// The single retry: re-runs the write with a terminal event substituted
/// for the failed stream, then reports the original failure. A failure here
/// propagates raw.
fn terminate<C: Command>(
    shared: &Shared,
    clock: &HybridClock,
    command: &C,
    uuid: EntityId,
    command_ts: HybridTimestamp,
    failure: WriteFailure,
) -> DispatchError {
    warn!(command = %uuid, kind = %failure.kind(), "substituting terminal event");
    match write_terminal(shared, clock, command, uuid, command_ts, &failure) {
        Ok(written) => {
            publish(shared, &written);
            failure.into_dispatch()
        }
        Err(retry_err) => {
            warn!(command = %uuid, error = %retry_err, "terminal retry failed");
            DispatchError::Journal(retry_err)
        }
    }
}

fn write_terminal<C: Command>(
    shared: &Shared,
    clock: &HybridClock,
    command: &C,
    uuid: EntityId,
    command_ts: HybridTimestamp,
    failure: &WriteFailure,
) -> Result<Vec<Arc<StoredEntity>>, JournalError> {
    let journal = &shared.journal;
    let tx = journal.begin_transaction()?;
    let terminal = EntityDraft::new(
        clock.update(),
        EntityKind::Event,
        CommandTerminated::new(uuid, failure.kind(), failure.message()),
    );
    let terminal_id = terminal.uuid();
    let staged = journal.record(&tx, terminal).and_then(|stored| {
        journal.link(&tx, uuid, terminal_id)?;
        let command_draft =
            EntityDraft::with_uuid(uuid, command_ts, EntityKind::Command, command.clone());
        let stored_command = journal.record(&tx, command_draft)?;
        Ok(vec![stored, stored_command])
    });
    match staged {
        Ok(written) => {
            journal.commit(tx)?;
            Ok(written)
        }
        Err(err) => {
            roll_back(journal, tx, &err);
            Err(err)
        }
    }
}

fn roll_back(journal: &Arc<dyn Journal>, tx: chronicle_journal::Transaction, cause: &JournalError) {
    if let Err(rollback_err) = journal.rollback(tx, cause) {
        warn!(error = %rollback_err, "rollback failed");
    }
}

/// Mirrors committed entities into the index engine and delivers them to
/// subscribers. Runs after the transaction is durable, so completion
/// resolution implies read-your-writes.
fn publish(shared: &Shared, written: &[Arc<StoredEntity>]) {
    for entity in written {
        shared
            .index
            .collection(entity.type_name())
            .append(EntityHandle::resolved(entity.clone()));
    }
    let subscriptions = shared
        .subscriptions
        .read()
        .unwrap_or_else(|e| e.into_inner());
    for entity in written {
        for subscription in subscriptions.iter() {
            subscription.deliver(entity);
        }
    }
}
