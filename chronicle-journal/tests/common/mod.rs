//! Shared fixtures for journal tests.

use chronicle_journal::{JournalError, JournalListener, StoredEntity};
use chronicle_layout::{
    Construction, FieldValue, Property, SchemaRegistry, Schematic, TypeHandler,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Command fixture: a transfer request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransferRequested {
    pub amount: i64,
    pub memo: String,
}

impl Schematic for TransferRequested {
    const TYPE_NAME: &'static str = "TransferRequested";

    fn properties() -> Vec<Property<Self>> {
        vec![
            Property::new("amount", TypeHandler::Long, |t: &Self| {
                FieldValue::Long(t.amount)
            })
            .with_set(|t, v| {
                t.amount = v.take_long()?;
                Ok(())
            }),
            Property::new("memo", TypeHandler::Str, |t: &Self| {
                FieldValue::Str(t.memo.clone())
            })
            .with_set(|t, v| {
                t.memo = v.take_str()?;
                Ok(())
            }),
        ]
    }

    fn construction() -> Construction<Self> {
        Construction::Mutable(Self::default)
    }
}

/// Event fixture: funds moved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FundsMoved {
    pub amount: i64,
}

impl Schematic for FundsMoved {
    const TYPE_NAME: &'static str = "FundsMoved";

    fn properties() -> Vec<Property<Self>> {
        vec![Property::new("amount", TypeHandler::Long, |e: &Self| {
            FieldValue::Long(e.amount)
        })
        .with_set(|e, v| {
            e.amount = v.take_long()?;
            Ok(())
        })]
    }

    fn construction() -> Construction<Self> {
        Construction::Mutable(Self::default)
    }
}

/// Registry with both fixture types plus the built-in terminal event.
pub fn registry() -> Arc<SchemaRegistry> {
    let mut registry = SchemaRegistry::new();
    registry
        .register_command::<TransferRequested>()
        .expect("register command");
    registry
        .register_event::<FundsMoved>()
        .expect("register event");
    registry
        .register_event::<chronicle_journal::CommandTerminated>()
        .expect("register terminal event");
    Arc::new(registry)
}

/// Listener that records every callback for assertions.
#[derive(Default)]
pub struct RecordingListener {
    pub events: Mutex<Vec<String>>,
    pub commits: AtomicUsize,
    pub aborts: AtomicUsize,
    pub states: AtomicUsize,
}

impl JournalListener for RecordingListener {
    fn on_event(&self, event: &StoredEntity) {
        self.events
            .lock()
            .expect("listener lock")
            .push(event.type_name().to_string());
    }

    fn on_commit(&self) {
        self.commits.fetch_add(1, Ordering::SeqCst);
    }

    fn on_abort(&self, _error: &JournalError) {
        self.aborts.fetch_add(1, Ordering::SeqCst);
    }

    fn on_command_state_received(&self, _state: &(dyn std::any::Any + Send)) {
        self.states.fetch_add(1, Ordering::SeqCst);
    }
}
