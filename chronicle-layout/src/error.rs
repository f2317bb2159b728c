//! Error types for the layout engine.

use crate::Fingerprint;
use thiserror::Error;

/// Result type for layout operations.
pub type LayoutResult<T> = Result<T, LayoutError>;

/// Errors that can occur while deriving layouts or moving values through
/// them.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// A value's shape does not match the handler asked to encode it.
    #[error("type mismatch: handler expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// A type declared two properties with the same name.
    #[error("duplicate property `{0}` in schema")]
    DuplicateProperty(String),

    /// Deserialization requested for a read-only layout.
    #[error("layout for `{0}` is read-only and cannot deserialize")]
    ReadOnly(&'static str),

    /// The type offers no construction path and read-only layouts are not
    /// permitted.
    #[error("no viable construction for `{0}`")]
    NoConstruction(&'static str),

    /// Input ended before a value was fully decoded.
    #[error("truncated input: needed {needed} bytes, {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },

    /// Input contained bytes beyond the layout's final property.
    #[error("{0} trailing bytes after final property")]
    TrailingBytes(usize),

    /// A variable-length field exceeds the 4-byte length prefix.
    #[error("length {0} exceeds the wire format's 4-byte prefix")]
    LengthOverflow(usize),

    /// Encoded string bytes were not valid UTF-8.
    #[error("invalid UTF-8 in string field")]
    InvalidUtf8,

    /// An enum ordinal not present in the handler's shape.
    #[error("unknown enum ordinal {0}")]
    UnknownEnumOrdinal(i32),

    /// A payload was written under a schema this registry does not know.
    /// Decoding is refused rather than guessed at.
    #[error("unknown layout fingerprint {0}")]
    UnknownFingerprint(Fingerprint),

    /// The same type was registered twice.
    #[error("type `{0}` is already registered")]
    DuplicateRegistration(&'static str),

    /// A type was used through a registry that never registered it.
    #[error("type `{0}` is not registered")]
    Unregistered(&'static str),

    /// An erased operation was handed a value of the wrong concrete type.
    #[error("value is not a `{expected}`")]
    WrongType { expected: &'static str },

    /// A handler shape that cannot be realized (empty enums and the like).
    #[error("unsupported handler shape: {0}")]
    Unsupported(String),
}
