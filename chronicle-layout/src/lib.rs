//! Schema derivation, binary serialization, and fingerprinting.
//!
//! This crate derives a versioned binary schema — a [`Layout`] — from an
//! entity type's declared properties and computes a content-addressed
//! [`Fingerprint`] over it, used for forward/backward compatibility checks:
//!
//! - [`Schematic`] — the explicit descriptor each entity type implements
//!   (properties with accessor functions, one construction path)
//! - [`TypeHandler`] — per-supported-type codec; composites delegate
//!   recursively
//! - [`Layout`] — immutable schema snapshot with lexicographic property
//!   order and a fixed construction path
//! - [`SchemaRegistry`] — explicit startup-populated registry keyed by type,
//!   name, and fingerprint
//!
//! A payload is only decoded through the layout whose fingerprint it was
//! written under; unrecognized fingerprints are refused.

mod erased;
mod error;
mod fingerprint;
mod handler;
mod layout;
mod property;
mod registry;
mod value;

pub use erased::ErasedLayout;
pub use error::{LayoutError, LayoutResult};
pub use fingerprint::Fingerprint;
pub use handler::{EnumShape, RecordShape, TypeHandler};
pub use layout::{nested_from, nested_value, record_shape_of, Layout, LayoutOptions};
pub use property::{Construction, Property, Schematic};
pub use registry::SchemaRegistry;
pub use value::FieldValue;
