use crate::{Attribute, FeatureSet, Index, IndexResult};
use std::fmt;
use std::sync::Arc;

/// One way an engine can build an index: a feature set it covers and a
/// factory that builds the backing structure for a concrete attribute.
pub struct Capability {
    name: &'static str,
    features: FeatureSet,
    build: fn(&Attribute) -> IndexResult<Arc<dyn Index>>,
}

impl Capability {
    #[must_use]
    pub fn new(
        name: &'static str,
        features: FeatureSet,
        build: fn(&Attribute) -> IndexResult<Arc<dyn Index>>,
    ) -> Self {
        Self {
            name,
            features,
            build,
        }
    }

    /// The capability's name, used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The features an index built by this capability serves.
    #[must_use]
    pub fn features(&self) -> FeatureSet {
        self.features
    }

    /// Builds an index over `attribute`.
    pub fn build(&self, attribute: &Attribute) -> IndexResult<Arc<dyn Index>> {
        (self.build)(attribute)
    }
}

impl fmt::Debug for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capability")
            .field("name", &self.name)
            .field("features", &self.features)
            .finish()
    }
}
