use crate::{CommandContext, CommandError};
use chronicle_journal::EntityDraft;
use chronicle_layout::Schematic;
use chronicle_types::{EntityKind, HybridTimestamp};

/// A lazy, possibly empty, possibly failing sequence of event drafts.
///
/// The dispatcher drains it inside the write transaction, stamping each
/// draft with the next partition clock value as it goes, so a stream may be
/// infinite up to the element that yields an error.
pub type EventStream = Box<dyn Iterator<Item = Result<EntityDraft, CommandError>> + Send>;

/// Builds an event draft for a stream. The timestamp is a placeholder; the
/// dispatcher re-stamps every event when it is journalled.
#[must_use]
pub fn event_draft<T: Schematic>(body: T) -> EntityDraft {
    EntityDraft::new(HybridTimestamp::ZERO, EntityKind::Event, body)
}

/// What one evaluation produced: the command's result state and the events
/// to journal.
pub struct Evaluation<S> {
    pub state: S,
    pub events: EventStream,
}

impl<S> Evaluation<S> {
    /// An evaluation with a lazy event stream.
    #[must_use]
    pub fn new(state: S, events: EventStream) -> Self {
        Self { state, events }
    }

    /// An evaluation with an eager list of events.
    #[must_use]
    pub fn with_events(state: S, events: Vec<EntityDraft>) -> Self {
        Self {
            state,
            events: Box::new(events.into_iter().map(Ok)),
        }
    }

    /// An evaluation that produced no events.
    #[must_use]
    pub fn done(state: S) -> Self {
        Self {
            state,
            events: Box::new(std::iter::empty()),
        }
    }
}

/// A typed intent: its fields are its arguments, journalled alongside the
/// events it produces.
///
/// A command is constructed by a caller, assigned a UUID and timestamp by
/// the dispatcher, evaluated once, persisted exactly once, and immutable
/// afterward. `Clone` lets the dispatcher journal the same command again in
/// the terminal-event retry.
pub trait Command: Schematic + Clone {
    /// Intermediate result state the evaluation produces.
    type State: Send + 'static;

    /// Completion value handed to the submitting caller.
    type Output: Send + 'static;

    /// Produces the command's result state and event stream against the
    /// current repository and lock state.
    fn evaluate(&self, ctx: &mut CommandContext<'_>) -> Result<Evaluation<Self::State>, CommandError>;

    /// Derives the completion value from the produced state.
    fn output(&self, state: Self::State) -> Self::Output;
}
