//! Capability-matched query indices.
//!
//! An [`IndexEngine`] advertises [`Capability`]s, each naming the
//! [`FeatureSet`] its indices serve. Callers request an index over an
//! [`Attribute`] with the features they need and get whichever backing
//! structure the engine matches first. [`CompositeIndexEngine`] chains
//! engines so a specialised backend can serve the requests it covers while a
//! general one catches the rest.

mod attribute;
mod capability;
mod collection;
mod composite;
mod engine;
mod error;
mod feature;
mod index;

pub use attribute::Attribute;
pub use capability::Capability;
pub use collection::IndexedCollection;
pub use composite::CompositeIndexEngine;
pub use engine::{IndexEngine, MemoryIndexEngine};
pub use error::{IndexError, IndexResult};
pub use feature::{FeatureSet, IndexFeature};
pub use index::{BTreeIndex, HashIndex, Index};
