use crate::{
    Attribute, Capability, FeatureSet, Index, IndexEngine, IndexError, IndexResult,
    IndexedCollection,
};
use std::sync::Arc;
use tracing::debug;

/// Cascades over an ordered list of engines.
///
/// Index requests go to each engine in turn; an engine that answers
/// [`IndexError::NotSupported`] passes the request on to the next. Only when
/// every engine declines does the composite decline. Collections come from
/// the first engine, which therefore owns entity storage.
pub struct CompositeIndexEngine {
    engines: Vec<Arc<dyn IndexEngine>>,
}

impl CompositeIndexEngine {
    /// Builds a composite. `engines` must not be empty.
    #[must_use]
    pub fn new(engines: Vec<Arc<dyn IndexEngine>>) -> Self {
        assert!(!engines.is_empty(), "composite needs at least one engine");
        Self { engines }
    }

    /// The engines, in consultation order.
    #[must_use]
    pub fn engines(&self) -> &[Arc<dyn IndexEngine>] {
        &self.engines
    }
}

impl IndexEngine for CompositeIndexEngine {
    fn name(&self) -> &'static str {
        "composite"
    }

    fn capabilities(&self) -> &[Capability] {
        // The composite has no capabilities of its own; index_on consults
        // the member engines directly.
        &[]
    }

    fn collection(&self, type_name: &str) -> Arc<IndexedCollection> {
        self.engines[0].collection(type_name)
    }

    fn index_on(
        &self,
        attribute: &Attribute,
        requested: FeatureSet,
    ) -> IndexResult<Arc<dyn Index>> {
        for engine in &self.engines {
            match engine.index_on(attribute, requested) {
                Ok(index) => return Ok(index),
                Err(IndexError::NotSupported { .. }) => {
                    debug!(
                        engine = engine.name(),
                        attribute = %attribute,
                        features = %requested,
                        "engine declined, trying next"
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
