//! Transactional durable log of commands, events, and causality links.
//!
//! The journal is the system of record: every submitted command, every event
//! it produced, and the links between them are persisted atomically.
//! Records round-trip through their layout at write time, entries are keyed
//! by `schema_fingerprint || uuid` for contiguous per-type scans, and a
//! command and its events are never partially visible.
//!
//! - [`Journal`] — the backend contract (transactions, lookup, typed
//!   iteration, listeners)
//! - [`MemoryJournal`] — the in-memory reference backend
//! - [`EntityHandle`] — UUID plus a deferred or already-resolved lookup
//! - [`CommandTerminated`] — the synthetic terminal event substituted for a
//!   failed event stream

mod entity;
mod error;
mod handle;
mod journal;
mod listener;
mod memory;
mod terminal;

pub use entity::{EntityDraft, StoredEntity};
pub use error::{JournalError, JournalResult};
pub use handle::EntityHandle;
pub use journal::{Journal, Transaction};
pub use listener::JournalListener;
pub use memory::MemoryJournal;
pub use terminal::CommandTerminated;
