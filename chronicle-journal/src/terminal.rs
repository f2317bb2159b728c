use chronicle_layout::{Construction, FieldValue, Property, Schematic, TypeHandler};
use chronicle_types::EntityId;
use uuid::Uuid;

/// The synthetic terminal event recorded when a command's event-producing
/// computation fails: a durable "command terminated exceptionally" fact
/// referencing the original command and the triggering error.
///
/// Substituted for the failed stream in the write protocol's single retry,
/// so post-hoc auditing never needs the submitting caller's process to still
/// be alive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandTerminated {
    pub command: Uuid,
    pub error_kind: String,
    pub message: String,
}

impl CommandTerminated {
    /// Builds the terminal fact for a failed command.
    #[must_use]
    pub fn new(
        command: EntityId,
        error_kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            command: command.as_uuid(),
            error_kind: error_kind.into(),
            message: message.into(),
        }
    }

    /// The failed command's identity.
    #[must_use]
    pub fn command_id(&self) -> EntityId {
        EntityId::from_uuid(self.command)
    }
}

impl Schematic for CommandTerminated {
    const TYPE_NAME: &'static str = "chronicle.CommandTerminated";

    fn properties() -> Vec<Property<Self>> {
        vec![
            Property::new("command", TypeHandler::Uuid, |t: &Self| {
                FieldValue::Uuid(t.command)
            })
            .with_set(|t, v| {
                t.command = v.take_uuid()?;
                Ok(())
            }),
            Property::new("error_kind", TypeHandler::Str, |t: &Self| {
                FieldValue::Str(t.error_kind.clone())
            })
            .with_set(|t, v| {
                t.error_kind = v.take_str()?;
                Ok(())
            }),
            Property::new("message", TypeHandler::Str, |t: &Self| {
                FieldValue::Str(t.message.clone())
            })
            .with_set(|t, v| {
                t.message = v.take_str()?;
                Ok(())
            }),
        ]
    }

    fn construction() -> Construction<Self> {
        Construction::Mutable(Self::default)
    }
}
