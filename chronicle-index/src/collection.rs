use chronicle_journal::EntityHandle;
use std::sync::RwLock;

/// An append-only collection of handles for one entity type.
///
/// Writers append while readers take point-in-time snapshots; neither blocks
/// the other beyond the duration of the copy.
pub struct IndexedCollection {
    type_name: String,
    entries: RwLock<Vec<EntityHandle>>,
}

impl IndexedCollection {
    #[must_use]
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            entries: RwLock::new(Vec::new()),
        }
    }

    /// The entity type this collection holds.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Appends one handle.
    pub fn append(&self, handle: EntityHandle) {
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(handle);
    }

    /// A point-in-time copy of the handles, in append order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<EntityHandle> {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Number of handles appended so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// True if nothing has been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
