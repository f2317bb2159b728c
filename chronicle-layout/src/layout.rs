//! Layout derivation and the serializer/deserializer it fixes in place.

use crate::{
    Construction, FieldValue, Fingerprint, LayoutError, LayoutResult, Property, RecordShape,
    Schematic,
};
use sha2::{Digest, Sha256};

/// Flags selected once per deployment that shape every derived layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutOptions {
    /// Include the type name in the fingerprint (strict matching). When
    /// false, two types with identical property name/handler sequences hash
    /// identically (content-only matching).
    pub hash_type_name: bool,
    /// Permit layouts that can serialize but not deserialize. When false,
    /// properties without a writable accessor are excluded instead, and
    /// types with no construction path fail derivation.
    pub allow_read_only: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            hash_type_name: true,
            allow_read_only: false,
        }
    }
}

/// A per-type schema snapshot: the qualifying properties in lexicographic
/// name order, the fingerprint over that shape, and the construction path
/// chosen at derivation time. Immutable once derived.
pub struct Layout<T: Schematic> {
    properties: Vec<Property<T>>,
    fingerprint: Fingerprint,
    construction: Construction<T>,
    read_only: bool,
}

impl<T: Schematic> Layout<T> {
    /// Derives the layout for `T`.
    ///
    /// Deterministic and side-effect-free: the same type and options always
    /// produce the same property order and fingerprint.
    pub fn derive(options: &LayoutOptions) -> LayoutResult<Self> {
        let mut properties = T::properties();
        properties.sort_by(|a, b| a.name().cmp(b.name()));
        for window in properties.windows(2) {
            if window[0].name() == window[1].name() {
                return Err(LayoutError::DuplicateProperty(window[0].name().to_string()));
            }
        }

        let construction = T::construction();
        let mut read_only = false;
        match &construction {
            Construction::Mutable(_) => {
                if properties.iter().any(|p| !p.is_writable()) {
                    if options.allow_read_only {
                        read_only = true;
                    } else {
                        properties.retain(|p| p.is_writable());
                    }
                }
            }
            Construction::Positional(_) => {}
            Construction::ReadOnly => {
                if options.allow_read_only {
                    read_only = true;
                } else {
                    return Err(LayoutError::NoConstruction(T::TYPE_NAME));
                }
            }
        }

        let mut hasher = Sha256::new();
        if options.hash_type_name {
            hasher.update(T::TYPE_NAME.as_bytes());
        }
        for property in &properties {
            hasher.update(property.name().as_bytes());
            property.handler().fingerprint_into(&mut hasher);
        }
        let fingerprint = Fingerprint::from_bytes(hasher.finalize().into());

        Ok(Self {
            properties,
            fingerprint,
            construction,
            read_only,
        })
    }

    /// The layout's content fingerprint.
    #[must_use]
    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    /// Qualifying properties, in encoding order.
    #[must_use]
    pub fn properties(&self) -> &[Property<T>] {
        &self.properties
    }

    /// True if the layout can serialize but never deserialize.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Encoded size of `value` in bytes.
    pub fn size_of(&self, value: &T) -> LayoutResult<usize> {
        let mut total = 0;
        for property in &self.properties {
            total += property.handler().size(&property.get(value))?;
        }
        Ok(total)
    }

    /// Appends `value`'s encoding to `buf`, property by property in layout
    /// order. The buffer should be pre-sized to at least [`Layout::size_of`].
    pub fn serialize_into(&self, value: &T, buf: &mut Vec<u8>) -> LayoutResult<()> {
        for property in &self.properties {
            property.handler().write(&property.get(value), buf)?;
        }
        Ok(())
    }

    /// Serializes `value` into a freshly sized buffer.
    pub fn to_bytes(&self, value: &T) -> LayoutResult<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.size_of(value)?);
        self.serialize_into(value, &mut buf)?;
        Ok(buf)
    }

    /// Reconstructs a value from its encoding.
    ///
    /// Uses the construction path fixed at derivation: no-arg construction
    /// plus setters, or the positional constructor. Read-only layouts fail
    /// fast here rather than silently not writing.
    pub fn deserialize(&self, bytes: &[u8]) -> LayoutResult<T> {
        if self.read_only {
            return Err(LayoutError::ReadOnly(T::TYPE_NAME));
        }
        let mut input = bytes;
        let value = match &self.construction {
            Construction::Mutable(ctor) => {
                let mut value = ctor();
                for property in &self.properties {
                    let field = property.handler().read(&mut input)?;
                    match property.set(&mut value, field) {
                        Some(result) => result?,
                        None => return Err(LayoutError::ReadOnly(T::TYPE_NAME)),
                    }
                }
                value
            }
            Construction::Positional(ctor) => {
                let mut values = Vec::with_capacity(self.properties.len());
                for property in &self.properties {
                    values.push(property.handler().read(&mut input)?);
                }
                ctor(values)?
            }
            Construction::ReadOnly => return Err(LayoutError::ReadOnly(T::TYPE_NAME)),
        };
        if !input.is_empty() {
            return Err(LayoutError::TrailingBytes(input.len()));
        }
        Ok(value)
    }
}

impl<T: Schematic> std::fmt::Debug for Layout<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Layout")
            .field("type", &T::TYPE_NAME)
            .field("fingerprint", &self.fingerprint.short())
            .field("properties", &self.properties.len())
            .field("read_only", &self.read_only)
            .finish()
    }
}

/// The nested-record shape of `T`: all declared properties, sorted by name.
///
/// Nested records always carry every declared property; exclusion rules
/// apply only to top-level layouts.
pub fn record_shape_of<T: Schematic>() -> LayoutResult<RecordShape> {
    RecordShape::new(
        T::properties()
            .into_iter()
            .map(|p| (p.name().to_string(), p.handler().clone())),
    )
}

/// Converts a schematic value into a nested-record field value.
#[must_use]
pub fn nested_value<T: Schematic>(value: &T) -> FieldValue {
    let mut properties = T::properties();
    properties.sort_by(|a, b| a.name().cmp(b.name()));
    FieldValue::Record(properties.iter().map(|p| p.get(value)).collect())
}

/// Reconstructs a schematic value from a nested-record field value.
pub fn nested_from<T: Schematic>(field: FieldValue) -> LayoutResult<T> {
    let values = field.take_record()?;
    let mut properties = T::properties();
    properties.sort_by(|a, b| a.name().cmp(b.name()));
    if values.len() != properties.len() {
        return Err(LayoutError::TypeMismatch {
            expected: "record",
            found: "record of different arity",
        });
    }
    match T::construction() {
        Construction::Mutable(ctor) => {
            let mut value = ctor();
            for (property, field) in properties.iter().zip(values) {
                match property.set(&mut value, field) {
                    Some(result) => result?,
                    None => return Err(LayoutError::ReadOnly(T::TYPE_NAME)),
                }
            }
            Ok(value)
        }
        Construction::Positional(ctor) => ctor(values),
        Construction::ReadOnly => Err(LayoutError::ReadOnly(T::TYPE_NAME)),
    }
}
