//! The explicit schema registry.
//!
//! One registry value is populated at startup from the set of known command
//! and event types and passed into the journal and dispatcher at
//! construction — there is no ambient global state. Layouts are keyed three
//! ways: by concrete type, by type name, and by fingerprint, the last of
//! which is what lets a reader decode payloads written by an older or
//! co-resident schema version.

use crate::{
    ErasedLayout, Fingerprint, Layout, LayoutError, LayoutOptions, LayoutResult, Schematic,
};
use chronicle_types::EntityKind;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

struct Registered {
    erased: Arc<dyn ErasedLayout>,
    typed: Arc<dyn Any + Send + Sync>,
    kind: EntityKind,
}

/// Maps entity types to their derived layouts.
pub struct SchemaRegistry {
    options: LayoutOptions,
    by_type: HashMap<TypeId, Arc<Registered>>,
    by_name: HashMap<&'static str, Arc<Registered>>,
    by_fingerprint: HashMap<Fingerprint, Arc<Registered>>,
}

impl SchemaRegistry {
    /// An empty registry with default options (strict fingerprints, no
    /// read-only layouts).
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(LayoutOptions::default())
    }

    /// An empty registry with explicit options.
    #[must_use]
    pub fn with_options(options: LayoutOptions) -> Self {
        Self {
            options,
            by_type: HashMap::new(),
            by_name: HashMap::new(),
            by_fingerprint: HashMap::new(),
        }
    }

    /// The options every registered layout was derived with.
    #[must_use]
    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Derives and registers the layout for `T`, recording its entity kind.
    ///
    /// Registering the same type twice is an error. Two different types
    /// hashing to the same fingerprint (content-only matching mode) is not:
    /// the first registration owns the fingerprint's decode path.
    pub fn register<T: Schematic>(&mut self, kind: EntityKind) -> LayoutResult<Fingerprint> {
        if self.by_type.contains_key(&TypeId::of::<T>()) || self.by_name.contains_key(T::TYPE_NAME)
        {
            return Err(LayoutError::DuplicateRegistration(T::TYPE_NAME));
        }
        let layout = Arc::new(Layout::<T>::derive(&self.options)?);
        let fingerprint = *layout.fingerprint();
        let registered = Arc::new(Registered {
            erased: layout.clone(),
            typed: layout,
            kind,
        });
        self.by_type.insert(TypeId::of::<T>(), registered.clone());
        self.by_name.insert(T::TYPE_NAME, registered.clone());
        self.by_fingerprint.entry(fingerprint).or_insert(registered);
        Ok(fingerprint)
    }

    /// Registers `T` as a command type.
    pub fn register_command<T: Schematic>(&mut self) -> LayoutResult<Fingerprint> {
        self.register::<T>(EntityKind::Command)
    }

    /// Registers `T` as an event type.
    pub fn register_event<T: Schematic>(&mut self) -> LayoutResult<Fingerprint> {
        self.register::<T>(EntityKind::Event)
    }

    /// The typed layout for `T`.
    pub fn layout_for<T: Schematic>(&self) -> LayoutResult<Arc<Layout<T>>> {
        let registered = self
            .by_type
            .get(&TypeId::of::<T>())
            .ok_or(LayoutError::Unregistered(T::TYPE_NAME))?;
        registered
            .typed
            .clone()
            .downcast::<Layout<T>>()
            .map_err(|_| LayoutError::WrongType {
                expected: T::TYPE_NAME,
            })
    }

    /// The erased layout for a concrete type, if registered.
    #[must_use]
    pub fn erased_for(&self, type_id: TypeId) -> Option<Arc<dyn ErasedLayout>> {
        self.by_type.get(&type_id).map(|r| r.erased.clone())
    }

    /// The erased layout owning `fingerprint`, if any.
    #[must_use]
    pub fn erased_by_fingerprint(&self, fingerprint: &Fingerprint) -> Option<Arc<dyn ErasedLayout>> {
        self.by_fingerprint
            .get(fingerprint)
            .map(|r| r.erased.clone())
    }

    /// The erased layout registered under `name`, if any.
    #[must_use]
    pub fn erased_by_name(&self, name: &str) -> Option<Arc<dyn ErasedLayout>> {
        self.by_name.get(name).map(|r| r.erased.clone())
    }

    /// The registered fingerprint for `T`.
    pub fn fingerprint_of<T: Schematic>(&self) -> LayoutResult<Fingerprint> {
        self.by_type
            .get(&TypeId::of::<T>())
            .map(|r| *r.erased.fingerprint())
            .ok_or(LayoutError::Unregistered(T::TYPE_NAME))
    }

    /// The entity kind recorded for a fingerprint.
    #[must_use]
    pub fn kind_of(&self, fingerprint: &Fingerprint) -> Option<EntityKind> {
        self.by_fingerprint.get(fingerprint).map(|r| r.kind)
    }

    /// The entity kind recorded for a concrete type.
    #[must_use]
    pub fn kind_of_type(&self, type_id: TypeId) -> Option<EntityKind> {
        self.by_type.get(&type_id).map(|r| r.kind)
    }

    /// Serializes a typed value, returning the fingerprint it was written
    /// under and its encoding.
    pub fn encode<T: Schematic>(&self, value: &T) -> LayoutResult<(Fingerprint, Vec<u8>)> {
        let layout = self.layout_for::<T>()?;
        Ok((*layout.fingerprint(), layout.to_bytes(value)?))
    }

    /// Serializes a type-erased value.
    pub fn encode_erased(
        &self,
        type_id: TypeId,
        type_name: &'static str,
        value: &(dyn Any + Send + Sync),
    ) -> LayoutResult<(Fingerprint, Vec<u8>)> {
        let layout = self
            .erased_for(type_id)
            .ok_or(LayoutError::Unregistered(type_name))?;
        Ok((*layout.fingerprint(), layout.serialize_any(value)?))
    }

    /// Decodes a payload written under `fingerprint`. A fingerprint this
    /// registry does not know refuses to decode rather than guess.
    pub fn decode(
        &self,
        fingerprint: &Fingerprint,
        bytes: &[u8],
    ) -> LayoutResult<Box<dyn Any + Send + Sync>> {
        let layout = self
            .erased_by_fingerprint(fingerprint)
            .ok_or(LayoutError::UnknownFingerprint(*fingerprint))?;
        layout.deserialize_any(bytes)
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    /// True if nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("types", &self.by_type.len())
            .field("options", &self.options)
            .finish()
    }
}
