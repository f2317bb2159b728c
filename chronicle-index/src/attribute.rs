use crate::{IndexError, IndexResult};
use chronicle_layout::{Schematic, TypeHandler};
use std::fmt;

/// An indexable attribute: one named property of one entity type, together
/// with the codec that turns its values into keys.
#[derive(Debug, Clone)]
pub struct Attribute {
    entity_type: &'static str,
    property: String,
    handler: TypeHandler,
}

impl Attribute {
    /// Looks the property up on a schematic type.
    pub fn of<T: Schematic>(property: &str) -> IndexResult<Self> {
        T::properties()
            .into_iter()
            .find(|p| p.name() == property)
            .map(|p| Self {
                entity_type: T::TYPE_NAME,
                property: property.to_string(),
                handler: p.handler().clone(),
            })
            .ok_or_else(|| IndexError::UnknownProperty {
                entity_type: T::TYPE_NAME,
                property: property.to_string(),
            })
    }

    /// Builds an attribute from its raw parts. Used by engines that read
    /// shapes from a registry instead of a concrete type.
    #[must_use]
    pub fn from_parts(
        entity_type: &'static str,
        property: impl Into<String>,
        handler: TypeHandler,
    ) -> Self {
        Self {
            entity_type,
            property: property.into(),
            handler,
        }
    }

    /// The owning entity type's stable name.
    #[must_use]
    pub fn entity_type(&self) -> &'static str {
        self.entity_type
    }

    /// The property name.
    #[must_use]
    pub fn property(&self) -> &str {
        &self.property
    }

    /// The property's codec.
    #[must_use]
    pub fn handler(&self) -> &TypeHandler {
        &self.handler
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.entity_type, self.property)
    }
}
