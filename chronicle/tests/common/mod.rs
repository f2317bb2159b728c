//! Shared fixtures for facade tests.

use chronicle::{
    event_draft, Command, CommandContext, CommandError, Construction, Evaluation, FieldValue,
    Property, Repository, RepositoryBuilder, Schematic, TypeHandler,
};
use std::sync::{Arc, Condvar, Mutex};

/// Event fixture.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Credited {
    pub account: String,
    pub amount: i64,
}

impl Schematic for Credited {
    const TYPE_NAME: &'static str = "Credited";

    fn properties() -> Vec<Property<Self>> {
        vec![
            Property::new("account", TypeHandler::Str, |e: &Self| {
                FieldValue::Str(e.account.clone())
            })
            .with_set(|e, v| {
                e.account = v.take_str()?;
                Ok(())
            }),
            Property::new("amount", TypeHandler::Long, |e: &Self| {
                FieldValue::Long(e.amount)
            })
            .with_set(|e, v| {
                e.amount = v.take_long()?;
                Ok(())
            }),
        ]
    }

    fn construction() -> Construction<Self> {
        Construction::Mutable(Self::default)
    }
}

/// Command fixture: credits an account, producing one event, or fails when
/// the amount is not positive.
#[derive(Debug, Clone, Default)]
pub struct Credit {
    pub account: String,
    pub amount: i64,
}

impl Schematic for Credit {
    const TYPE_NAME: &'static str = "Credit";

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

impl Command for Credit {
    type State = i64;
    type Output = i64;

    fn evaluate(&self, ctx: &mut CommandContext<'_>) -> Result<Evaluation<i64>, CommandError> {
        if self.amount <= 0 {
            return Err(CommandError::new("InvalidAmount", "credit must be positive"));
        }
        ctx.lock(&self.account);
        Ok(Evaluation::with_events(
            self.amount,
            vec![event_draft(Credited {
                account: self.account.clone(),
                amount: self.amount,
            })],
        ))
    }

    fn output(&self, state: i64) -> i64 {
        state
    }
}

/// A latch commands can park on until a test releases them.
#[derive(Clone, Default)]
pub struct Gate(Arc<(Mutex<bool>, Condvar)>);

impl Gate {
    pub fn open(&self) {
        let (flag, signal) = &*self.0;
        *flag.lock().expect("gate") = true;
        signal.notify_all();
    }

    pub fn wait(&self) {
        let (flag, signal) = &*self.0;
        let mut open = flag.lock().expect("gate");
        while !*open {
            open = signal.wait(open).expect("gate");
        }
    }
}

impl std::fmt::Debug for Gate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Gate")
    }
}

/// Command fixture that parks its worker until the gate opens. The gate is
/// not a declared property; only the label is journalled.
#[derive(Debug, Clone, Default)]
pub struct Gated {
    pub label: String,
    pub gate: Gate,
}

impl Gated {
    pub fn held_by(gate: &Gate) -> Self {
        Self {
            label: "held".into(),
            gate: gate.clone(),
        }
    }
}

impl Schematic for Gated {
    const TYPE_NAME: &'static str = "Gated";

    fn properties() -> Vec<Property<Self>> {
        vec![Property::new("label", TypeHandler::Str, |c: &Self| {
            FieldValue::Str(c.label.clone())
        })
        .with_set(|c, v| {
            c.label = v.take_str()?;
            Ok(())
        })]
    }

    fn construction() -> Construction<Self> {
        Construction::Mutable(Self::default)
    }
}

impl Command for Gated {
    type State = ();
    type Output = ();

    fn evaluate(&self, _ctx: &mut CommandContext<'_>) -> Result<Evaluation<()>, CommandError> {
        self.gate.wait();
        Ok(Evaluation::done(()))
    }

    fn output(&self, state: ()) {
        state
    }
}

/// A repository with the fixtures registered, still idle.
pub fn repository() -> Repository {
    RepositoryBuilder::new()
        .command::<Credit>()
        .expect("register command")
        .event::<Credited>()
        .expect("register event")
        .build()
        .expect("build repository")
}
