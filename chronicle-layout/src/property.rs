//! Compile-time schema descriptors.
//!
//! Entity types describe themselves by implementing [`Schematic`]: a list of
//! named properties with accessor functions and a codec, plus one
//! construction path. This replaces any runtime introspection — what a layout
//! can see is exactly what the type declares.

use crate::{FieldValue, LayoutResult, TypeHandler};

/// One property of a schematic type: a name, a codec, a readable accessor,
/// and optionally a writable accessor.
///
/// A property with no setter only qualifies for a layout when the type
/// constructs positionally or when read-only layouts are permitted.
pub struct Property<T> {
    name: &'static str,
    handler: TypeHandler,
    get: fn(&T) -> FieldValue,
    set: Option<fn(&mut T, FieldValue) -> LayoutResult<()>>,
}

impl<T> Property<T> {
    /// A readable property with no writable accessor.
    #[must_use]
    pub fn new(name: &'static str, handler: TypeHandler, get: fn(&T) -> FieldValue) -> Self {
        Self {
            name,
            handler,
            get,
            set: None,
        }
    }

    /// Attaches a writable accessor.
    #[must_use]
    pub fn with_set(mut self, set: fn(&mut T, FieldValue) -> LayoutResult<()>) -> Self {
        self.set = Some(set);
        self
    }

    /// The property name. Layout order is lexicographic over these.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The property's codec.
    #[must_use]
    pub fn handler(&self) -> &TypeHandler {
        &self.handler
    }

    /// Reads the property off a value.
    #[must_use]
    pub fn get(&self, value: &T) -> FieldValue {
        (self.get)(value)
    }

    /// Writes the property into a value, if a setter exists.
    pub fn set(&self, value: &mut T, field: FieldValue) -> Option<LayoutResult<()>> {
        self.set.map(|set| set(value, field))
    }

    /// True if the property has a writable accessor.
    #[must_use]
    pub fn is_writable(&self) -> bool {
        self.set.is_some()
    }
}

impl<T> std::fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("handler", &self.handler)
            .field("writable", &self.set.is_some())
            .finish()
    }
}

/// How a deserializer reconstructs a value. Resolved once when the layout is
/// derived and fixed thereafter.
pub enum Construction<T> {
    /// No-argument construction followed by each property's setter.
    Mutable(fn() -> T),
    /// A constructor whose parameters match the layout's qualifying
    /// properties by position (in lexicographic property order). This is the
    /// path for immutable value objects.
    Positional(fn(Vec<FieldValue>) -> LayoutResult<T>),
    /// No construction path: the type can be serialized but never
    /// deserialized. Only usable when read-only layouts are permitted.
    ReadOnly,
}

impl<T> std::fmt::Debug for Construction<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mutable(_) => f.write_str("Construction::Mutable"),
            Self::Positional(_) => f.write_str("Construction::Positional"),
            Self::ReadOnly => f.write_str("Construction::ReadOnly"),
        }
    }
}

/// The explicit schema descriptor every journalled type implements.
pub trait Schematic: Sized + Send + Sync + 'static {
    /// Stable type name. Feeds the fingerprint in strict matching mode.
    const TYPE_NAME: &'static str;

    /// The type's declared properties, in any order.
    fn properties() -> Vec<Property<Self>>;

    /// The type's single construction path.
    fn construction() -> Construction<Self>;
}
