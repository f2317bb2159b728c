use chronicle_layout::{Fingerprint, Schematic};
use chronicle_types::{EntityId, EntityKind, HybridTimestamp};
use std::any::{Any, TypeId};
use std::sync::Arc;

/// A not-yet-journalled entity: identity, timestamp, kind, and a type-erased
/// body awaiting serialization.
///
/// The UUID is assigned when the draft is built and immutable thereafter;
/// the timestamp is assigned by whoever drives the clock (the dispatcher's
/// partition, in practice).
pub struct EntityDraft {
    uuid: EntityId,
    timestamp: HybridTimestamp,
    kind: EntityKind,
    type_id: TypeId,
    type_name: &'static str,
    body: Box<dyn Any + Send + Sync>,
}

impl EntityDraft {
    /// Builds a draft with an explicit UUID.
    #[must_use]
    pub fn with_uuid<T: Schematic>(
        uuid: EntityId,
        timestamp: HybridTimestamp,
        kind: EntityKind,
        body: T,
    ) -> Self {
        Self {
            uuid,
            timestamp,
            kind,
            type_id: TypeId::of::<T>(),
            type_name: T::TYPE_NAME,
            body: Box::new(body),
        }
    }

    /// Builds a draft with a fresh UUID.
    #[must_use]
    pub fn new<T: Schematic>(timestamp: HybridTimestamp, kind: EntityKind, body: T) -> Self {
        Self::with_uuid(EntityId::new(), timestamp, kind, body)
    }

    /// The draft's identity.
    #[must_use]
    pub fn uuid(&self) -> EntityId {
        self.uuid
    }

    /// The timestamp the entity will be journalled under.
    #[must_use]
    pub fn timestamp(&self) -> HybridTimestamp {
        self.timestamp
    }

    /// Re-stamps the draft. Used when a terminal-event retry re-runs the
    /// write protocol under a fresh clock value.
    #[must_use]
    pub fn at(mut self, timestamp: HybridTimestamp) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Command or event.
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// The body's concrete type.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The body's registered type name.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The type-erased body.
    #[must_use]
    pub fn body(&self) -> &(dyn Any + Send + Sync) {
        self.body.as_ref()
    }
}

impl std::fmt::Debug for EntityDraft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityDraft")
            .field("uuid", &self.uuid)
            .field("kind", &self.kind)
            .field("type", &self.type_name)
            .field("timestamp", &self.timestamp)
            .finish()
    }
}

/// A journalled entity as read back from storage: identity, timestamp, kind,
/// the fingerprint it was written under, and the round-tripped body.
///
/// The body is the result of deserializing what was actually persisted, so a
/// schema mismatch surfaces at write time rather than on a later read.
pub struct StoredEntity {
    uuid: EntityId,
    timestamp: HybridTimestamp,
    kind: EntityKind,
    fingerprint: Fingerprint,
    type_name: &'static str,
    body: Arc<dyn Any + Send + Sync>,
}

impl StoredEntity {
    /// Assembles a stored entity. Backends call this after the
    /// serialize-then-deserialize round trip.
    #[must_use]
    pub fn new(
        uuid: EntityId,
        timestamp: HybridTimestamp,
        kind: EntityKind,
        fingerprint: Fingerprint,
        type_name: &'static str,
        body: Arc<dyn Any + Send + Sync>,
    ) -> Self {
        Self {
            uuid,
            timestamp,
            kind,
            fingerprint,
            type_name,
            body,
        }
    }

    /// The entity's identity.
    #[must_use]
    pub fn uuid(&self) -> EntityId {
        self.uuid
    }

    /// The timestamp it was journalled under.
    #[must_use]
    pub fn timestamp(&self) -> HybridTimestamp {
        self.timestamp
    }

    /// Command or event.
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// The schema fingerprint it was written under.
    #[must_use]
    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    /// The registered type name.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The type-erased body.
    #[must_use]
    pub fn body(&self) -> &(dyn Any + Send + Sync) {
        self.body.as_ref()
    }

    /// Views the body as a concrete type.
    #[must_use]
    pub fn downcast_ref<T: Schematic>(&self) -> Option<&T> {
        self.body.as_ref().downcast_ref::<T>()
    }

    /// True if the body is the given concrete type.
    #[must_use]
    pub fn is<T: Schematic>(&self) -> bool {
        self.downcast_ref::<T>().is_some()
    }
}

impl std::fmt::Debug for StoredEntity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredEntity")
            .field("uuid", &self.uuid)
            .field("kind", &self.kind)
            .field("type", &self.type_name)
            .field("timestamp", &self.timestamp)
            .field("fingerprint", &self.fingerprint.short())
            .finish()
    }
}
