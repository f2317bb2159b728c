use serde::{Deserialize, Serialize};
use std::fmt;

/// Discriminates the two entity roles in stored records.
///
/// A command is a journalled intent; an event is an immutable fact produced
/// by evaluating exactly one command. Both share the same identity and
/// timestamp model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Command,
    Event,
}

impl EntityKind {
    /// Single-byte tag used by journal backends.
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        match self {
            Self::Command => 0,
            Self::Event => 1,
        }
    }

    /// Decodes a single-byte tag written by [`EntityKind::as_byte`].
    #[must_use]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::Command),
            1 => Some(Self::Event),
            _ => None,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command => write!(f, "command"),
            Self::Event => write!(f, "event"),
        }
    }
}
