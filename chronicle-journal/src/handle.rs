use crate::{Journal, JournalResult, StoredEntity};
use chronicle_types::EntityId;
use std::sync::Arc;

/// A weak back-reference to a journalled entity: a UUID plus a lookup
/// capability. Never owns the entity.
///
/// A deferred handle re-queries the journal on every resolve; a resolved
/// handle wraps a value materialized in the same transaction and short-
/// circuits the lookup.
#[derive(Clone)]
pub enum EntityHandle {
    /// Lookup goes back through the journal.
    Deferred {
        uuid: EntityId,
        journal: Arc<dyn Journal>,
    },
    /// Already materialized; resolve is free.
    Resolved { entity: Arc<StoredEntity> },
}

impl EntityHandle {
    /// A handle that re-queries `journal` on resolve.
    #[must_use]
    pub fn deferred(uuid: EntityId, journal: Arc<dyn Journal>) -> Self {
        Self::Deferred { uuid, journal }
    }

    /// A handle wrapping an already materialized entity.
    #[must_use]
    pub fn resolved(entity: Arc<StoredEntity>) -> Self {
        Self::Resolved { entity }
    }

    /// The referenced entity's UUID.
    #[must_use]
    pub fn uuid(&self) -> EntityId {
        match self {
            Self::Deferred { uuid, .. } => *uuid,
            Self::Resolved { entity } => entity.uuid(),
        }
    }

    /// Dereferences the handle. `None` if the entity is not (or no longer)
    /// visible in the journal.
    pub fn resolve(&self) -> JournalResult<Option<Arc<StoredEntity>>> {
        match self {
            Self::Deferred { uuid, journal } => journal.get(*uuid),
            Self::Resolved { entity } => Ok(Some(entity.clone())),
        }
    }

    /// True if resolve will not touch the journal.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }
}

impl std::fmt::Debug for EntityHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Deferred { uuid, .. } => f.debug_tuple("Deferred").field(uuid).finish(),
            Self::Resolved { entity } => f.debug_tuple("Resolved").field(&entity.uuid()).finish(),
        }
    }
}
