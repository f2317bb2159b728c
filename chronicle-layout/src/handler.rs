//! Per-type codecs.
//!
//! A [`TypeHandler`] knows three things about one supported type: how many
//! bytes a value occupies, how to move a value through a buffer in both
//! directions, and the bytes it contributes to its layout's fingerprint.
//! Composite handlers (list, optional, nested record, enum) delegate
//! recursively.
//!
//! Wire format, per value:
//! - Fixed-width scalars, big-endian: byte(1), short(2), int(4), long(8),
//!   float(4), double(8), bool(1), UUID(16, most-significant bits first),
//!   enum ordinal(4).
//! - Variable-width: 4-byte length prefix + raw bytes for byte arrays and
//!   UTF-8 strings; 4-byte count prefix + concatenated elements for lists;
//!   1-byte present flag (+ payload if present) for optionals; nested records
//!   are their fields' concatenated encodings with no additional framing.

use crate::{FieldValue, LayoutError, LayoutResult};
use sha2::{Digest, Sha256};
use std::fmt;
use uuid::Uuid;

/// The shape of an enum: its constants' `(name, ordinal)` pairs, sorted by
/// name. The sorted shape feeds the fingerprint, so reordering constants
/// (which renumbers ordinals) changes the fingerprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumShape {
    variants: Vec<(String, i32)>,
}

impl EnumShape {
    /// Builds a shape from `(name, ordinal)` pairs.
    pub fn new<I, S>(variants: I) -> LayoutResult<Self>
    where
        I: IntoIterator<Item = (S, i32)>,
        S: Into<String>,
    {
        let mut variants: Vec<(String, i32)> = variants
            .into_iter()
            .map(|(name, ordinal)| (name.into(), ordinal))
            .collect();
        if variants.is_empty() {
            return Err(LayoutError::Unsupported("enum with no constants".into()));
        }
        variants.sort_by(|a, b| a.0.cmp(&b.0));
        for window in variants.windows(2) {
            if window[0].0 == window[1].0 {
                return Err(LayoutError::DuplicateProperty(window[0].0.clone()));
            }
        }
        Ok(Self { variants })
    }

    /// True if some constant carries this ordinal.
    #[must_use]
    pub fn contains_ordinal(&self, ordinal: i32) -> bool {
        self.variants.iter().any(|(_, o)| *o == ordinal)
    }

    /// The `(name, ordinal)` pairs, sorted by name.
    #[must_use]
    pub fn variants(&self) -> &[(String, i32)] {
        &self.variants
    }
}

/// An ordered nested-object shape: field `(name, handler)` pairs in the
/// nested layout's lexicographic property order.
#[derive(Debug, Clone)]
pub struct RecordShape {
    fields: Vec<(String, TypeHandler)>,
}

impl RecordShape {
    /// Builds a shape from `(name, handler)` pairs; sorts them by name.
    pub fn new<I, S>(fields: I) -> LayoutResult<Self>
    where
        I: IntoIterator<Item = (S, TypeHandler)>,
        S: Into<String>,
    {
        let mut fields: Vec<(String, TypeHandler)> = fields
            .into_iter()
            .map(|(name, handler)| (name.into(), handler))
            .collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));
        for window in fields.windows(2) {
            if window[0].0 == window[1].0 {
                return Err(LayoutError::DuplicateProperty(window[0].0.clone()));
            }
        }
        Ok(Self { fields })
    }

    /// The `(name, handler)` pairs in encoding order.
    #[must_use]
    pub fn fields(&self) -> &[(String, TypeHandler)] {
        &self.fields
    }
}

/// Codec for one supported property type.
#[derive(Debug, Clone)]
pub enum TypeHandler {
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Bool,
    Uuid,
    Str,
    Bytes,
    Enum(EnumShape),
    List(Box<TypeHandler>),
    Optional(Box<TypeHandler>),
    Record(RecordShape),
}

const LEN_PREFIX: usize = 4;

fn take<'a>(input: &mut &'a [u8], n: usize) -> LayoutResult<&'a [u8]> {
    if input.len() < n {
        return Err(LayoutError::Truncated {
            needed: n,
            remaining: input.len(),
        });
    }
    let (head, rest) = input.split_at(n);
    *input = rest;
    Ok(head)
}

fn write_len(len: usize, buf: &mut Vec<u8>) -> LayoutResult<()> {
    let len = u32::try_from(len).map_err(|_| LayoutError::LengthOverflow(len))?;
    buf.extend_from_slice(&len.to_be_bytes());
    Ok(())
}

fn read_len(input: &mut &[u8]) -> LayoutResult<usize> {
    let bytes = take(input, LEN_PREFIX)?;
    let mut raw = [0u8; 4];
    raw.copy_from_slice(bytes);
    Ok(u32::from_be_bytes(raw) as usize)
}

impl TypeHandler {
    /// Convenience constructor for a list of `element` values.
    #[must_use]
    pub fn list_of(element: TypeHandler) -> Self {
        Self::List(Box::new(element))
    }

    /// Convenience constructor for an optional `payload` value.
    #[must_use]
    pub fn optional_of(payload: TypeHandler) -> Self {
        Self::Optional(Box::new(payload))
    }

    /// Encoded size of `value` in bytes. Value-dependent for variable-width
    /// shapes, fixed otherwise.
    pub fn size(&self, value: &FieldValue) -> LayoutResult<usize> {
        match (self, value) {
            (Self::Byte, FieldValue::Byte(_)) | (Self::Bool, FieldValue::Bool(_)) => Ok(1),
            (Self::Short, FieldValue::Short(_)) => Ok(2),
            (Self::Int, FieldValue::Int(_))
            | (Self::Float, FieldValue::Float(_))
            | (Self::Enum(_), FieldValue::Enum(_)) => Ok(4),
            (Self::Long, FieldValue::Long(_)) | (Self::Double, FieldValue::Double(_)) => Ok(8),
            (Self::Uuid, FieldValue::Uuid(_)) => Ok(16),
            (Self::Str, FieldValue::Str(s)) => Ok(LEN_PREFIX + s.len()),
            (Self::Bytes, FieldValue::Bytes(b)) => Ok(LEN_PREFIX + b.len()),
            (Self::List(element), FieldValue::List(items)) => {
                let mut total = LEN_PREFIX;
                for item in items {
                    total += element.size(item)?;
                }
                Ok(total)
            }
            (Self::Optional(payload), FieldValue::Optional(value)) => match value {
                Some(inner) => Ok(1 + payload.size(inner)?),
                None => Ok(1),
            },
            (Self::Record(shape), FieldValue::Record(values)) => {
                record_check_arity(shape, values)?;
                let mut total = 0;
                for ((_, handler), value) in shape.fields.iter().zip(values) {
                    total += handler.size(value)?;
                }
                Ok(total)
            }
            (handler, value) => Err(LayoutError::TypeMismatch {
                expected: handler.shape_name(),
                found: value.shape_name(),
            }),
        }
    }

    /// Appends `value`'s encoding to `buf`. Callers pre-size the buffer to at
    /// least [`TypeHandler::size`].
    pub fn write(&self, value: &FieldValue, buf: &mut Vec<u8>) -> LayoutResult<()> {
        match (self, value) {
            (Self::Byte, FieldValue::Byte(v)) => buf.push(*v),
            (Self::Short, FieldValue::Short(v)) => buf.extend_from_slice(&v.to_be_bytes()),
            (Self::Int, FieldValue::Int(v)) => buf.extend_from_slice(&v.to_be_bytes()),
            (Self::Long, FieldValue::Long(v)) => buf.extend_from_slice(&v.to_be_bytes()),
            (Self::Float, FieldValue::Float(v)) => buf.extend_from_slice(&v.to_be_bytes()),
            (Self::Double, FieldValue::Double(v)) => buf.extend_from_slice(&v.to_be_bytes()),
            (Self::Bool, FieldValue::Bool(v)) => buf.push(u8::from(*v)),
            (Self::Uuid, FieldValue::Uuid(v)) => buf.extend_from_slice(v.as_bytes()),
            (Self::Enum(shape), FieldValue::Enum(ordinal)) => {
                if !shape.contains_ordinal(*ordinal) {
                    return Err(LayoutError::UnknownEnumOrdinal(*ordinal));
                }
                buf.extend_from_slice(&ordinal.to_be_bytes());
            }
            (Self::Str, FieldValue::Str(s)) => {
                write_len(s.len(), buf)?;
                buf.extend_from_slice(s.as_bytes());
            }
            (Self::Bytes, FieldValue::Bytes(b)) => {
                write_len(b.len(), buf)?;
                buf.extend_from_slice(b);
            }
            (Self::List(element), FieldValue::List(items)) => {
                write_len(items.len(), buf)?;
                for item in items {
                    element.write(item, buf)?;
                }
            }
            (Self::Optional(payload), FieldValue::Optional(value)) => match value {
                Some(inner) => {
                    buf.push(1);
                    payload.write(inner, buf)?;
                }
                None => buf.push(0),
            },
            (Self::Record(shape), FieldValue::Record(values)) => {
                record_check_arity(shape, values)?;
                for ((_, handler), value) in shape.fields.iter().zip(values) {
                    handler.write(value, buf)?;
                }
            }
            (handler, value) => {
                return Err(LayoutError::TypeMismatch {
                    expected: handler.shape_name(),
                    found: value.shape_name(),
                })
            }
        }
        Ok(())
    }

    /// Decodes one value from the front of `input`, advancing it.
    pub fn read(&self, input: &mut &[u8]) -> LayoutResult<FieldValue> {
        match self {
            Self::Byte => Ok(FieldValue::Byte(take(input, 1)?[0])),
            Self::Short => {
                let raw: [u8; 2] = take(input, 2)?.try_into().map_err(|_| unreachable_len())?;
                Ok(FieldValue::Short(i16::from_be_bytes(raw)))
            }
            Self::Int => {
                let raw: [u8; 4] = take(input, 4)?.try_into().map_err(|_| unreachable_len())?;
                Ok(FieldValue::Int(i32::from_be_bytes(raw)))
            }
            Self::Long => {
                let raw: [u8; 8] = take(input, 8)?.try_into().map_err(|_| unreachable_len())?;
                Ok(FieldValue::Long(i64::from_be_bytes(raw)))
            }
            Self::Float => {
                let raw: [u8; 4] = take(input, 4)?.try_into().map_err(|_| unreachable_len())?;
                Ok(FieldValue::Float(f32::from_be_bytes(raw)))
            }
            Self::Double => {
                let raw: [u8; 8] = take(input, 8)?.try_into().map_err(|_| unreachable_len())?;
                Ok(FieldValue::Double(f64::from_be_bytes(raw)))
            }
            Self::Bool => Ok(FieldValue::Bool(take(input, 1)?[0] != 0)),
            Self::Uuid => {
                let raw: [u8; 16] = take(input, 16)?.try_into().map_err(|_| unreachable_len())?;
                Ok(FieldValue::Uuid(Uuid::from_bytes(raw)))
            }
            Self::Enum(shape) => {
                let raw: [u8; 4] = take(input, 4)?.try_into().map_err(|_| unreachable_len())?;
                let ordinal = i32::from_be_bytes(raw);
                if !shape.contains_ordinal(ordinal) {
                    return Err(LayoutError::UnknownEnumOrdinal(ordinal));
                }
                Ok(FieldValue::Enum(ordinal))
            }
            Self::Str => {
                let len = read_len(input)?;
                let bytes = take(input, len)?;
                let s = std::str::from_utf8(bytes).map_err(|_| LayoutError::InvalidUtf8)?;
                Ok(FieldValue::Str(s.to_string()))
            }
            Self::Bytes => {
                let len = read_len(input)?;
                Ok(FieldValue::Bytes(take(input, len)?.to_vec()))
            }
            Self::List(element) => {
                let count = read_len(input)?;
                let mut items = Vec::with_capacity(count.min(1024));
                for _ in 0..count {
                    items.push(element.read(input)?);
                }
                Ok(FieldValue::List(items))
            }
            Self::Optional(payload) => {
                let flag = take(input, 1)?[0];
                if flag == 0 {
                    Ok(FieldValue::Optional(None))
                } else {
                    Ok(FieldValue::Optional(Some(Box::new(payload.read(input)?))))
                }
            }
            Self::Record(shape) => {
                let mut values = Vec::with_capacity(shape.fields.len());
                for (_, handler) in &shape.fields {
                    values.push(handler.read(input)?);
                }
                Ok(FieldValue::Record(values))
            }
        }
    }

    /// Feeds this handler's fingerprint contribution into `hasher`.
    pub fn fingerprint_into(&self, hasher: &mut Sha256) {
        match self {
            Self::Byte => hasher.update(b"byte"),
            Self::Short => hasher.update(b"short"),
            Self::Int => hasher.update(b"int"),
            Self::Long => hasher.update(b"long"),
            Self::Float => hasher.update(b"float"),
            Self::Double => hasher.update(b"double"),
            Self::Bool => hasher.update(b"bool"),
            Self::Uuid => hasher.update(b"uuid"),
            Self::Str => hasher.update(b"string"),
            Self::Bytes => hasher.update(b"bytes"),
            Self::Enum(shape) => {
                hasher.update(b"enum");
                for (name, ordinal) in &shape.variants {
                    hasher.update(name.as_bytes());
                    hasher.update(ordinal.to_be_bytes());
                }
            }
            Self::List(element) => {
                hasher.update(b"list");
                element.fingerprint_into(hasher);
            }
            Self::Optional(payload) => {
                hasher.update(b"optional");
                payload.fingerprint_into(hasher);
            }
            Self::Record(shape) => {
                hasher.update(b"record");
                for (name, handler) in &shape.fields {
                    hasher.update(name.as_bytes());
                    handler.fingerprint_into(hasher);
                }
            }
        }
    }

    /// Short shape name, used in mismatch diagnostics.
    #[must_use]
    pub const fn shape_name(&self) -> &'static str {
        match self {
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::Bool => "bool",
            Self::Uuid => "uuid",
            Self::Str => "string",
            Self::Bytes => "bytes",
            Self::Enum(_) => "enum",
            Self::List(_) => "list",
            Self::Optional(_) => "optional",
            Self::Record(_) => "record",
        }
    }
}

impl fmt::Display for TypeHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.shape_name())
    }
}

fn record_check_arity(shape: &RecordShape, values: &[FieldValue]) -> LayoutResult<()> {
    if shape.fields.len() == values.len() {
        Ok(())
    } else {
        Err(LayoutError::TypeMismatch {
            expected: "record",
            found: "record of different arity",
        })
    }
}

// take() hands back exactly n bytes, so the array conversion cannot fail.
fn unreachable_len() -> LayoutError {
    LayoutError::Truncated {
        needed: 0,
        remaining: 0,
    }
}
