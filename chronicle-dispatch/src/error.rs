use chronicle_journal::JournalError;
use thiserror::Error;

/// A failure raised by a command's own evaluation logic.
///
/// The kind is a short stable name recorded in the terminal event, so it
/// survives the submitting process; the message is free-form diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct CommandError {
    kind: String,
    message: String,
}

impl CommandError {
    #[must_use]
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// The short error-kind name.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The diagnostic message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors surfaced through a command's completion.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The command's evaluation failed; a terminal event was journalled.
    #[error("command failed: {0}")]
    Command(#[from] CommandError),

    /// The journal rejected the write, including a failed terminal retry.
    #[error(transparent)]
    Journal(#[from] JournalError),

    /// A worker thread could not be spawned.
    #[error("worker thread spawn failed: {0}")]
    Worker(#[from] std::io::Error),

    /// The dispatcher was stopped before the command completed.
    #[error("dispatcher is stopped")]
    Stopped,
}

/// Alias for dispatch results.
pub type DispatchResult<T> = Result<T, DispatchError>;
