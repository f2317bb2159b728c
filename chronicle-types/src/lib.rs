//! Core type definitions for Chronicle.
//!
//! Defines the universal types every Chronicle subsystem depends on:
//! - [`EntityId`] — stable identity for commands and events
//! - [`HybridTimestamp`] — physical time + logical counter, totally ordered
//! - [`HybridClock`] — the monotonic clock that stamps journalled entities
//! - [`EntityKind`] — discriminates commands from events in stored records
//!
//! These types are consumed by the layout engine, the journal, the index
//! engine, and the dispatcher. They carry no behavior beyond identity and
//! ordering so that every other crate can agree on them without cycles.

mod clock;
mod entity;
mod ids;
mod timestamp;

pub use clock::HybridClock;
pub use entity::EntityKind;
pub use ids::EntityId;
pub use timestamp::HybridTimestamp;
