//! Partitioned, ordered command execution.
//!
//! A [`Command`] is a typed intent that expands into events when evaluated.
//! The [`Dispatcher`] routes each submitted command to one of N single-writer
//! partitions, evaluates it under a tracked [`LockProvider`], journals the
//! command and its events in one transaction stamped by the partition's
//! hybrid clock, mirrors the written entities into the index engine, and
//! resolves the caller's [`Completion`] with the command's declared output
//! or the causing error.

mod command;
mod completion;
mod context;
mod dispatcher;
mod error;
mod lock;
mod subscriber;

pub use command::{event_draft, Command, Evaluation, EventStream};
pub use completion::Completion;
pub use context::CommandContext;
pub use dispatcher::{Dispatcher, DispatcherConfig};
pub use error::{CommandError, DispatchError, DispatchResult};
pub use lock::{LocalLockProvider, LockProvider, TrackingLocks};
pub use subscriber::Subscription;
