//! Error types for the journal.

use chronicle_layout::LayoutError;
use chronicle_types::EntityId;
use thiserror::Error;

/// Result type for journal operations.
pub type JournalResult<T> = Result<T, JournalError>;

/// Errors that can occur in journal operations.
#[derive(Debug, Error)]
pub enum JournalError {
    /// Schema failure while encoding or round-tripping a record.
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    /// A transaction handle the journal does not know (already committed,
    /// rolled back, or from another journal).
    #[error("unknown transaction {0}")]
    UnknownTransaction(u64),

    /// An entity with this UUID is already journalled.
    #[error("entity {0} already journalled")]
    DuplicateEntity(EntityId),

    /// Storage-layer fault (I/O, constraint) reported by a backend.
    #[error("storage fault: {0}")]
    Storage(String),

    /// A command's event-producing computation failed. Carried as the abort
    /// cause so listeners and terminal events can reference it.
    #[error("command evaluation failed ({kind}): {message}")]
    Evaluation { kind: String, message: String },
}

impl JournalError {
    /// The short error-kind name recorded in terminal events.
    #[must_use]
    pub fn kind_name(&self) -> &str {
        match self {
            Self::Layout(_) => "LayoutError",
            Self::UnknownTransaction(_) => "UnknownTransaction",
            Self::DuplicateEntity(_) => "DuplicateEntity",
            Self::Storage(_) => "StorageFault",
            Self::Evaluation { kind, .. } => kind,
        }
    }
}
