use crate::{LayoutError, LayoutResult};
use uuid::Uuid;

/// The dynamic value a property accessor produces or consumes.
///
/// Accessors translate between a type's concrete fields and this enum; the
/// [`TypeHandler`](crate::TypeHandler) codec translates between this enum and
/// bytes. Exactly one `FieldValue` variant is valid per handler shape.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Byte(u8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Bool(bool),
    Uuid(Uuid),
    Str(String),
    Bytes(Vec<u8>),
    /// An enum constant's ordinal.
    Enum(i32),
    List(Vec<FieldValue>),
    Optional(Option<Box<FieldValue>>),
    /// A nested object's property values, in its layout's property order.
    Record(Vec<FieldValue>),
}

impl FieldValue {
    /// Short variant name, used in mismatch diagnostics.
    #[must_use]
    pub const fn shape_name(&self) -> &'static str {
        match self {
            Self::Byte(_) => "byte",
            Self::Short(_) => "short",
            Self::Int(_) => "int",
            Self::Long(_) => "long",
            Self::Float(_) => "float",
            Self::Double(_) => "double",
            Self::Bool(_) => "bool",
            Self::Uuid(_) => "uuid",
            Self::Str(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::Enum(_) => "enum",
            Self::List(_) => "list",
            Self::Optional(_) => "optional",
            Self::Record(_) => "record",
        }
    }

    fn mismatch(&self, expected: &'static str) -> LayoutError {
        LayoutError::TypeMismatch {
            expected,
            found: self.shape_name(),
        }
    }

    /// Unwraps a byte, or reports a shape mismatch.
    pub fn take_byte(self) -> LayoutResult<u8> {
        match self {
            Self::Byte(v) => Ok(v),
            other => Err(other.mismatch("byte")),
        }
    }

    /// Unwraps a short, or reports a shape mismatch.
    pub fn take_short(self) -> LayoutResult<i16> {
        match self {
            Self::Short(v) => Ok(v),
            other => Err(other.mismatch("short")),
        }
    }

    /// Unwraps an int, or reports a shape mismatch.
    pub fn take_int(self) -> LayoutResult<i32> {
        match self {
            Self::Int(v) => Ok(v),
            other => Err(other.mismatch("int")),
        }
    }

    /// Unwraps a long, or reports a shape mismatch.
    pub fn take_long(self) -> LayoutResult<i64> {
        match self {
            Self::Long(v) => Ok(v),
            other => Err(other.mismatch("long")),
        }
    }

    /// Unwraps a float, or reports a shape mismatch.
    pub fn take_float(self) -> LayoutResult<f32> {
        match self {
            Self::Float(v) => Ok(v),
            other => Err(other.mismatch("float")),
        }
    }

    /// Unwraps a double, or reports a shape mismatch.
    pub fn take_double(self) -> LayoutResult<f64> {
        match self {
            Self::Double(v) => Ok(v),
            other => Err(other.mismatch("double")),
        }
    }

    /// Unwraps a bool, or reports a shape mismatch.
    pub fn take_bool(self) -> LayoutResult<bool> {
        match self {
            Self::Bool(v) => Ok(v),
            other => Err(other.mismatch("bool")),
        }
    }

    /// Unwraps a UUID, or reports a shape mismatch.
    pub fn take_uuid(self) -> LayoutResult<Uuid> {
        match self {
            Self::Uuid(v) => Ok(v),
            other => Err(other.mismatch("uuid")),
        }
    }

    /// Unwraps a string, or reports a shape mismatch.
    pub fn take_str(self) -> LayoutResult<String> {
        match self {
            Self::Str(v) => Ok(v),
            other => Err(other.mismatch("string")),
        }
    }

    /// Unwraps a byte array, or reports a shape mismatch.
    pub fn take_bytes(self) -> LayoutResult<Vec<u8>> {
        match self {
            Self::Bytes(v) => Ok(v),
            other => Err(other.mismatch("bytes")),
        }
    }

    /// Unwraps an enum ordinal, or reports a shape mismatch.
    pub fn take_enum(self) -> LayoutResult<i32> {
        match self {
            Self::Enum(v) => Ok(v),
            other => Err(other.mismatch("enum")),
        }
    }

    /// Unwraps a list, or reports a shape mismatch.
    pub fn take_list(self) -> LayoutResult<Vec<FieldValue>> {
        match self {
            Self::List(v) => Ok(v),
            other => Err(other.mismatch("list")),
        }
    }

    /// Unwraps an optional, or reports a shape mismatch.
    pub fn take_optional(self) -> LayoutResult<Option<FieldValue>> {
        match self {
            Self::Optional(v) => Ok(v.map(|b| *b)),
            other => Err(other.mismatch("optional")),
        }
    }

    /// Unwraps a nested record's values, or reports a shape mismatch.
    pub fn take_record(self) -> LayoutResult<Vec<FieldValue>> {
        match self {
            Self::Record(v) => Ok(v),
            other => Err(other.mismatch("record")),
        }
    }

    /// Wraps an optional payload.
    #[must_use]
    pub fn optional(value: Option<FieldValue>) -> Self {
        Self::Optional(value.map(Box::new))
    }
}

impl From<u8> for FieldValue {
    fn from(v: u8) -> Self {
        Self::Byte(v)
    }
}

impl From<i16> for FieldValue {
    fn from(v: i16) -> Self {
        Self::Short(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        Self::Long(v)
    }
}

impl From<f32> for FieldValue {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<Uuid> for FieldValue {
    fn from(v: Uuid) -> Self {
        Self::Uuid(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}
