use crate::FeatureSet;
use chronicle_layout::LayoutError;
use thiserror::Error;

/// Errors raised by index engines and the indices they build.
#[derive(Debug, Error)]
pub enum IndexError {
    /// No capability of any consulted engine covers the requested features.
    #[error("no index capability supports {requested} on `{attribute}`")]
    NotSupported {
        attribute: String,
        requested: FeatureSet,
    },

    /// The index exists but was not built for this operation.
    #[error("index `{index}` does not support {operation}")]
    FeatureUnsupported {
        index: &'static str,
        operation: &'static str,
    },

    /// A unique index already maps this key to a different entity.
    #[error("unique index violation on `{attribute}`")]
    UniqueViolation { attribute: String },

    /// The attribute's value shape cannot be ordered for range scans.
    #[error("values of shape `{0}` have no total order")]
    UnorderableKey(&'static str),

    /// The named property does not exist on the entity type.
    #[error("`{entity_type}` has no property `{property}`")]
    UnknownProperty {
        entity_type: &'static str,
        property: String,
    },

    /// Key encoding failed.
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Alias for index results.
pub type IndexResult<T> = Result<T, IndexError>;
