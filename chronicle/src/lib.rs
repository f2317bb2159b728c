//! Embeddable event-sourcing storage engine.
//!
//! Chronicle journals typed commands and the events they produce under a
//! hybrid-logical-clock total order, with transactional atomicity, causality
//! links, and capability-matched query indices. The [`Repository`] facade
//! assembles the pieces:
//!
//! - [`SchemaRegistry`] derives binary layouts from [`Schematic`] type
//!   descriptors and fingerprints them for schema matching.
//! - [`Journal`] persists commands and events, never partially visible.
//! - [`IndexEngine`] builds per-attribute indices by requested feature set.
//! - [`Dispatcher`] partitions are single-writer loops executing commands
//!   under tracked locks.
//!
//! ```no_run
//! use chronicle::RepositoryBuilder;
//! # use chronicle::RepositoryResult;
//! # fn demo() -> RepositoryResult<()> {
//! let repository = RepositoryBuilder::new().build()?;
//! repository.start()?;
//! // repository.submit(SomeCommand { .. })?.wait()?;
//! repository.stop();
//! # Ok(())
//! # }
//! ```

mod error;
mod repository;

pub use error::{RepositoryError, RepositoryResult};
pub use repository::{Repository, RepositoryBuilder};

pub use chronicle_dispatch::{
    event_draft, Command, CommandContext, CommandError, Completion, DispatchError, Dispatcher,
    DispatcherConfig, Evaluation, EventStream, LocalLockProvider, LockProvider, Subscription,
};
pub use chronicle_index::{
    Attribute, Capability, CompositeIndexEngine, FeatureSet, Index, IndexEngine, IndexError,
    IndexFeature, IndexedCollection, MemoryIndexEngine,
};
pub use chronicle_journal::{
    CommandTerminated, EntityDraft, EntityHandle, Journal, JournalError, JournalListener,
    MemoryJournal, StoredEntity, Transaction,
};
pub use chronicle_layout::{
    Construction, ErasedLayout, FieldValue, Fingerprint, Layout, LayoutError, LayoutOptions,
    Property, SchemaRegistry, Schematic, TypeHandler,
};
pub use chronicle_types::{EntityId, EntityKind, HybridClock, HybridTimestamp};
