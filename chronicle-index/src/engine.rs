use crate::{
    Attribute, BTreeIndex, Capability, FeatureSet, HashIndex, Index, IndexError, IndexFeature,
    IndexResult, IndexedCollection,
};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// A source of indices and per-type collections.
///
/// Engines advertise an ordered list of [`Capability`]s. A request for an
/// index names the features it needs; the default [`IndexEngine::index_on`]
/// walks the capabilities in order and builds with the first whose feature
/// set is a superset of the request. A capability that matches on features
/// but cannot serve the attribute's value shape is skipped.
pub trait IndexEngine: Send + Sync {
    /// The engine's name, used in logs.
    fn name(&self) -> &'static str;

    /// The engine's capabilities, in preference order.
    fn capabilities(&self) -> &[Capability];

    /// The collection for one entity type, created on first use.
    fn collection(&self, type_name: &str) -> Arc<IndexedCollection>;

    /// Builds an index over `attribute` serving at least `requested`.
    fn index_on(
        &self,
        attribute: &Attribute,
        requested: FeatureSet,
    ) -> IndexResult<Arc<dyn Index>> {
        for capability in self.capabilities() {
            if !capability.features().superset_of(requested) {
                continue;
            }
            match capability.build(attribute) {
                Ok(index) => {
                    debug!(
                        engine = self.name(),
                        capability = capability.name(),
                        attribute = %attribute,
                        "index built"
                    );
                    return Ok(index);
                }
                Err(IndexError::UnorderableKey(shape)) => {
                    debug!(
                        engine = self.name(),
                        capability = capability.name(),
                        attribute = %attribute,
                        shape,
                        "capability skipped, shape not orderable"
                    );
                }
                Err(other) => return Err(other),
            }
        }
        Err(IndexError::NotSupported {
            attribute: attribute.to_string(),
            requested,
        })
    }
}

fn build_hash(attribute: &Attribute) -> IndexResult<Arc<dyn Index>> {
    Ok(Arc::new(HashIndex::new(attribute.clone(), false)))
}

fn build_unique_hash(attribute: &Attribute) -> IndexResult<Arc<dyn Index>> {
    Ok(Arc::new(HashIndex::new(attribute.clone(), true)))
}

fn build_btree(attribute: &Attribute) -> IndexResult<Arc<dyn Index>> {
    Ok(Arc::new(BTreeIndex::new(attribute.clone())?))
}

/// The built-in engine: hash structures for point lookups, a btree for
/// range scans. Hash comes first so equality-only requests get the cheaper
/// structure.
pub struct MemoryIndexEngine {
    capabilities: Vec<Capability>,
    collections: RwLock<HashMap<String, Arc<IndexedCollection>>>,
}

impl MemoryIndexEngine {
    #[must_use]
    pub fn new() -> Self {
        Self {
            capabilities: vec![
                Capability::new(
                    "hash",
                    FeatureSet::of(&[
                        IndexFeature::Equality,
                        IndexFeature::Membership,
                        IndexFeature::Containment,
                    ]),
                    build_hash,
                ),
                Capability::new(
                    "unique-hash",
                    FeatureSet::of(&[
                        IndexFeature::Equality,
                        IndexFeature::Membership,
                        IndexFeature::Containment,
                        IndexFeature::Uniqueness,
                    ]),
                    build_unique_hash,
                ),
                Capability::new(
                    "btree",
                    FeatureSet::of(&[IndexFeature::Equality, IndexFeature::Range]),
                    build_btree,
                ),
            ],
            collections: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryIndexEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexEngine for MemoryIndexEngine {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    fn collection(&self, type_name: &str) -> Arc<IndexedCollection> {
        if let Some(existing) = self
            .collections
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(type_name)
        {
            return existing.clone();
        }
        self.collections
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .entry(type_name.to_string())
            .or_insert_with(|| Arc::new(IndexedCollection::new(type_name)))
            .clone()
    }
}
