use crate::{JournalError, StoredEntity};
use std::any::Any;

/// Callback surface for observing the journal's write protocol.
///
/// Invoked with one [`on_event`](Self::on_event) call per persisted event,
/// [`on_commit`](Self::on_commit) once after the transaction commits, and
/// [`on_abort`](Self::on_abort) once if it rolled back.
/// [`on_command_state_received`](Self::on_command_state_received) fires as
/// soon as a command's intermediate result state is known, before its event
/// stream is fully drained — event streams may be lazy or infinite until an
/// error.
///
/// All methods default to no-ops, so implementors pick what they observe.
pub trait JournalListener: Send + Sync {
    /// An event was persisted inside the current transaction.
    fn on_event(&self, event: &StoredEntity) {
        let _ = event;
    }

    /// The enclosing transaction committed.
    fn on_commit(&self) {}

    /// The enclosing transaction rolled back.
    fn on_abort(&self, error: &JournalError) {
        let _ = error;
    }

    /// A command's intermediate result state became known.
    fn on_command_state_received(&self, state: &(dyn Any + Send)) {
        let _ = state;
    }
}
