//! Shared fixtures for dispatcher tests.

use chronicle_dispatch::{
    event_draft, Command, CommandContext, CommandError, Dispatcher, DispatcherConfig, Evaluation,
    LocalLockProvider,
};
use chronicle_index::MemoryIndexEngine;
use chronicle_journal::{CommandTerminated, MemoryJournal};
use chronicle_layout::{Construction, FieldValue, Property, SchemaRegistry, Schematic, TypeHandler};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Event fixture shared by every command below.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FundsDeposited {
    pub amount: i64,
}

impl Schematic for FundsDeposited {
    const TYPE_NAME: &'static str = "FundsDeposited";

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

/// Happy-path command: one event, locks its account.
#[derive(Debug, Clone, Default)]
pub struct Deposit {
    pub account: String,
    pub amount: i64,
}

impl Schematic for Deposit {
    const TYPE_NAME: &'static str = "Deposit";

    fn properties() -> Vec<Property<Self>> {
        vec![
            Property::new("account", TypeHandler::Str, |c: &Self| {
                FieldValue::Str(c.account.clone())
            })
            .with_set(|c, v| {
                c.account = v.take_str()?;
                Ok(())
            }),
            Property::new("amount", TypeHandler::Long, |c: &Self| {
                FieldValue::Long(c.amount)
            })
            .with_set(|c, v| {
                c.amount = v.take_long()?;
                Ok(())
            }),
        ]
    }

    fn construction() -> Construction<Self> {
        Construction::Mutable(Self::default)
    }
}

impl Command for Deposit {
    type State = i64;
    type Output = i64;

    fn evaluate(&self, ctx: &mut CommandContext<'_>) -> Result<Evaluation<i64>, CommandError> {
        ctx.lock(&self.account);
        Ok(Evaluation::with_events(
            self.amount,
            vec![event_draft(FundsDeposited {
                amount: self.amount,
            })],
        ))
    }

    fn output(&self, state: i64) -> i64 {
        state
    }
}

/// Produces `parts` events lazily.
#[derive(Debug, Clone, Default)]
pub struct SplitDeposit {
    pub parts: i64,
}

impl Schematic for SplitDeposit {
    const TYPE_NAME: &'static str = "SplitDeposit";

    fn properties() -> Vec<Property<Self>> {
        vec![Property::new("parts", TypeHandler::Long, |c: &Self| {
            FieldValue::Long(c.parts)
        })
        .with_set(|c, v| {
            c.parts = v.take_long()?;
            Ok(())
        })]
    }

    fn construction() -> Construction<Self> {
        Construction::Mutable(Self::default)
    }
}

impl Command for SplitDeposit {
    type State = i64;
    type Output = i64;

    fn evaluate(&self, _ctx: &mut CommandContext<'_>) -> Result<Evaluation<i64>, CommandError> {
        let parts = self.parts;
        Ok(Evaluation::new(
            parts,
            Box::new((0..parts).map(|amount| Ok(event_draft(FundsDeposited { amount })))),
        ))
    }

    fn output(&self, state: i64) -> i64 {
        state
    }
}

/// Yields one event, then fails mid-stream.
#[derive(Debug, Clone, Default)]
pub struct Overdraw {
    pub amount: i64,
}

impl Schematic for Overdraw {
    const TYPE_NAME: &'static str = "Overdraw";

    fn properties() -> Vec<Property<Self>> {
        vec![Property::new("amount", TypeHandler::Long, |c: &Self| {
            FieldValue::Long(c.amount)
        })
        .with_set(|c, v| {
            c.amount = v.take_long()?;
            Ok(())
        })]
    }

    fn construction() -> Construction<Self> {
        Construction::Mutable(Self::default)
    }
}

impl Command for Overdraw {
    type State = ();
    type Output = ();

    fn evaluate(&self, _ctx: &mut CommandContext<'_>) -> Result<Evaluation<()>, CommandError> {
        let amount = self.amount;
        let mut yielded = false;
        Ok(Evaluation::new(
            (),
            Box::new(std::iter::from_fn(move || {
                if yielded {
                    Some(Err(CommandError::new("Overdrawn", "insufficient funds")))
                } else {
                    yielded = true;
                    Some(Ok(event_draft(FundsDeposited { amount })))
                }
            })),
        ))
    }

    fn output(&self, (): ()) {}
}

/// Fails before producing any stream.
#[derive(Debug, Clone, Default)]
pub struct Rejected;

impl Schematic for Rejected {
    const TYPE_NAME: &'static str = "Rejected";

    fn properties() -> Vec<Property<Self>> {
        Vec::new()
    }

    fn construction() -> Construction<Self> {
        Construction::Mutable(Self::default)
    }
}

impl Command for Rejected {
    type State = ();
    type Output = ();

    fn evaluate(&self, _ctx: &mut CommandContext<'_>) -> Result<Evaluation<()>, CommandError> {
        Err(CommandError::new("Invalid", "no such account"))
    }

    fn output(&self, (): ()) {}
}

/// Appends its sequence number to a shared log. The log is process-local
/// state, invisible to the layout.
#[derive(Debug, Clone, Default)]
pub struct OrderProbe {
    pub seq: i64,
    pub log: Arc<Mutex<Vec<i64>>>,
}

impl Schematic for OrderProbe {
    const TYPE_NAME: &'static str = "OrderProbe";

    fn properties() -> Vec<Property<Self>> {
        vec![Property::new("seq", TypeHandler::Long, |c: &Self| {
            FieldValue::Long(c.seq)
        })
        .with_set(|c, v| {
            c.seq = v.take_long()?;
            Ok(())
        })]
    }

    fn construction() -> Construction<Self> {
        Construction::Mutable(Self::default)
    }
}

impl Command for OrderProbe {
    type State = ();
    type Output = ();

    fn evaluate(&self, _ctx: &mut CommandContext<'_>) -> Result<Evaluation<()>, CommandError> {
        self.log.lock().expect("probe log").push(self.seq);
        Ok(Evaluation::done(()))
    }

    fn output(&self, (): ()) {}
}

/// Read-modify-write on a shared counter under a named lock. Without mutual
/// exclusion the deliberate pause between read and write loses updates.
#[derive(Debug, Clone, Default)]
pub struct LockProbe {
    pub name: String,
    pub counter: Arc<AtomicI64>,
}

impl Schematic for LockProbe {
    const TYPE_NAME: &'static str = "LockProbe";

    fn properties() -> Vec<Property<Self>> {
        vec![Property::new("name", TypeHandler::Str, |c: &Self| {
            FieldValue::Str(c.name.clone())
        })
        .with_set(|c, v| {
            c.name = v.take_str()?;
            Ok(())
        })]
    }

    fn construction() -> Construction<Self> {
        Construction::Mutable(Self::default)
    }
}

impl Command for LockProbe {
    type State = i64;
    type Output = i64;

    fn evaluate(&self, ctx: &mut CommandContext<'_>) -> Result<Evaluation<i64>, CommandError> {
        ctx.lock(&self.name);
        let seen = self.counter.load(Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(5));
        self.counter.store(seen + 1, Ordering::SeqCst);
        Ok(Evaluation::done(seen + 1))
    }

    fn output(&self, state: i64) -> i64 {
        state
    }
}

pub struct Harness {
    pub journal: Arc<MemoryJournal>,
    pub index: Arc<MemoryIndexEngine>,
    pub locks: Arc<LocalLockProvider>,
    pub dispatcher: Dispatcher,
}

pub fn harness(partitions: usize) -> Harness {
    let mut registry = SchemaRegistry::new();
    registry.register_command::<Deposit>().expect("register");
    registry.register_command::<SplitDeposit>().expect("register");
    registry.register_command::<Overdraw>().expect("register");
    registry.register_command::<Rejected>().expect("register");
    registry.register_command::<OrderProbe>().expect("register");
    registry.register_command::<LockProbe>().expect("register");
    registry.register_event::<FundsDeposited>().expect("register");
    registry
        .register_event::<CommandTerminated>()
        .expect("register");

    let journal = Arc::new(MemoryJournal::new(Arc::new(registry)));
    let index = Arc::new(MemoryIndexEngine::new());
    let locks = Arc::new(LocalLockProvider::new());
    let dispatcher = Dispatcher::new(
        DispatcherConfig {
            partitions,
            queue_depth: 32,
        },
        journal.clone(),
        index.clone(),
        locks.clone(),
    )
    .expect("dispatcher");
    Harness {
        journal,
        index,
        locks,
        dispatcher,
    }
}
