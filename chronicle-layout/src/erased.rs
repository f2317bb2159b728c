use crate::{Fingerprint, Layout, LayoutError, LayoutResult, Schematic};
use std::any::{Any, TypeId};

/// Object-safe view of a [`Layout`], for code that handles entities of many
/// types behind one registry (the journal, the dispatcher).
pub trait ErasedLayout: Send + Sync {
    /// The described type's stable name.
    fn type_name(&self) -> &'static str;

    /// The described type's `TypeId`.
    fn described_type(&self) -> TypeId;

    /// The layout's fingerprint.
    fn fingerprint(&self) -> &Fingerprint;

    /// True if the layout cannot deserialize.
    fn is_read_only(&self) -> bool;

    /// Serializes a type-erased value. Fails with
    /// [`LayoutError::WrongType`] if the value is not the described type.
    fn serialize_any(&self, value: &(dyn Any + Send + Sync)) -> LayoutResult<Vec<u8>>;

    /// Deserializes into a type-erased value.
    fn deserialize_any(&self, bytes: &[u8]) -> LayoutResult<Box<dyn Any + Send + Sync>>;

    /// Downcast support for recovering the typed layout.
    fn as_any(&self) -> &dyn Any;
}

impl<T: Schematic> ErasedLayout for Layout<T> {
    fn type_name(&self) -> &'static str {
        T::TYPE_NAME
    }

    fn described_type(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn fingerprint(&self) -> &Fingerprint {
        Layout::fingerprint(self)
    }

    fn is_read_only(&self) -> bool {
        Layout::is_read_only(self)
    }

    fn serialize_any(&self, value: &(dyn Any + Send + Sync)) -> LayoutResult<Vec<u8>> {
        let value = value
            .downcast_ref::<T>()
            .ok_or(LayoutError::WrongType {
                expected: T::TYPE_NAME,
            })?;
        self.to_bytes(value)
    }

    fn deserialize_any(&self, bytes: &[u8]) -> LayoutResult<Box<dyn Any + Send + Sync>> {
        Ok(Box::new(self.deserialize(bytes)?))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
