//! In-memory index structures.
//!
//! Both indices key on encoded bytes rather than on [`FieldValue`] directly.
//! The hash index uses the wire encoding as an opaque equality key; the btree
//! index uses an order-preserving encoding so that byte order agrees with
//! value order, which makes range scans a plain `BTreeMap` range.

use crate::{Attribute, FeatureSet, IndexError, IndexFeature, IndexResult};
use chronicle_layout::{FieldValue, TypeHandler};
use chronicle_types::EntityId;
use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use std::sync::RwLock;

/// One built index over an [`Attribute`].
pub trait Index: Send + Sync + std::fmt::Debug {
    /// The capability that built this index.
    fn name(&self) -> &'static str;

    /// The attribute this index covers.
    fn attribute(&self) -> &Attribute;

    /// The features this index serves.
    fn features(&self) -> FeatureSet;

    /// Maps `key` to `entity`.
    fn insert(&self, key: &FieldValue, entity: EntityId) -> IndexResult<()>;

    /// Unmaps `key` from `entity`. Unknown pairs are ignored.
    fn remove(&self, key: &FieldValue, entity: EntityId) -> IndexResult<()>;

    /// All entities mapped to `key`.
    fn lookup(&self, key: &FieldValue) -> IndexResult<Vec<EntityId>>;

    /// True if any entity is mapped to `key`.
    fn contains(&self, key: &FieldValue) -> IndexResult<bool> {
        Ok(!self.lookup(key)?.is_empty())
    }

    /// Entities whose key falls in the bounds, in key order.
    fn range(
        &self,
        lower: Bound<&FieldValue>,
        upper: Bound<&FieldValue>,
    ) -> IndexResult<Vec<EntityId>>;

    /// Number of distinct keys.
    fn len(&self) -> usize;

    /// True if no key is mapped.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Encodes `value` with the wire codec, yielding an opaque equality key.
fn exact_key(handler: &TypeHandler, value: &FieldValue) -> IndexResult<Vec<u8>> {
    let mut buf = Vec::with_capacity(handler.size(value)?);
    handler.write(value, &mut buf)?;
    Ok(buf)
}

/// Encodes `value` so that unsigned byte order matches value order.
///
/// Signed integers get their sign bit flipped. Floats use the IEEE 754
/// total-order trick: negative values have all bits flipped, non-negative
/// values only the sign bit, which sorts negatives below positives and both
/// in magnitude order. Strings and byte arrays compare by raw bytes, with no
/// length prefix so that prefixes sort first.
fn ordered_key(handler: &TypeHandler, value: &FieldValue) -> IndexResult<Vec<u8>> {
    let mismatch = || IndexError::Layout(chronicle_layout::LayoutError::TypeMismatch {
        expected: handler.shape_name(),
        found: value.shape_name(),
    });
    match (handler, value) {
        (TypeHandler::Byte, FieldValue::Byte(v)) => Ok(vec![*v]),
        (TypeHandler::Short, FieldValue::Short(v)) => {
            Ok(((*v as u16) ^ (1 << 15)).to_be_bytes().to_vec())
        }
        (TypeHandler::Int, FieldValue::Int(v)) => {
            Ok(((*v as u32) ^ (1 << 31)).to_be_bytes().to_vec())
        }
        (TypeHandler::Enum(shape), FieldValue::Enum(v)) => {
            if !shape.contains_ordinal(*v) {
                return Err(chronicle_layout::LayoutError::UnknownEnumOrdinal(*v).into());
            }
            Ok(((*v as u32) ^ (1 << 31)).to_be_bytes().to_vec())
        }
        (TypeHandler::Long, FieldValue::Long(v)) => {
            Ok(((*v as u64) ^ (1 << 63)).to_be_bytes().to_vec())
        }
        (TypeHandler::Float, FieldValue::Float(v)) => {
            let bits = v.to_bits();
            let ordered = if bits & (1 << 31) != 0 { !bits } else { bits ^ (1 << 31) };
            Ok(ordered.to_be_bytes().to_vec())
        }
        (TypeHandler::Double, FieldValue::Double(v)) => {
            let bits = v.to_bits();
            let ordered = if bits & (1 << 63) != 0 { !bits } else { bits ^ (1 << 63) };
            Ok(ordered.to_be_bytes().to_vec())
        }
        (TypeHandler::Bool, FieldValue::Bool(v)) => Ok(vec![u8::from(*v)]),
        (TypeHandler::Uuid, FieldValue::Uuid(v)) => Ok(v.as_bytes().to_vec()),
        (TypeHandler::Str, FieldValue::Str(s)) => Ok(s.as_bytes().to_vec()),
        (TypeHandler::Bytes, FieldValue::Bytes(b)) => Ok(b.clone()),
        (
            TypeHandler::List(_) | TypeHandler::Optional(_) | TypeHandler::Record(_),
            _,
        ) => Err(IndexError::UnorderableKey(handler.shape_name())),
        _ => Err(mismatch()),
    }
}

/// True if values of this shape admit a total order.
pub(crate) fn orderable(handler: &TypeHandler) -> bool {
    !matches!(
        handler,
        TypeHandler::List(_) | TypeHandler::Optional(_) | TypeHandler::Record(_)
    )
}

/// Hash index: equality, membership and containment lookups, optionally
/// enforcing uniqueness. Collection-valued attributes are exploded so that
/// each element becomes a key, which is what containment queries probe.
#[derive(Debug)]
pub struct HashIndex {
    attribute: Attribute,
    unique: bool,
    buckets: RwLock<HashMap<Vec<u8>, Vec<EntityId>>>,
}

impl HashIndex {
    #[must_use]
    pub fn new(attribute: Attribute, unique: bool) -> Self {
        Self {
            attribute,
            unique,
            buckets: RwLock::new(HashMap::new()),
        }
    }

    /// The handler a probe value is encoded with: the element handler for
    /// collection attributes, the attribute handler otherwise.
    fn probe_handler(&self) -> &TypeHandler {
        match self.attribute.handler() {
            TypeHandler::List(element) => element,
            other => other,
        }
    }

    /// Keys an inserted value produces: one per element for collections.
    fn entry_keys(&self, value: &FieldValue) -> IndexResult<Vec<Vec<u8>>> {
        match (self.attribute.handler(), value) {
            (TypeHandler::List(element), FieldValue::List(items)) => items
                .iter()
                .map(|item| exact_key(element, item))
                .collect(),
            _ => Ok(vec![exact_key(self.probe_handler(), value)?]),
        }
    }

    fn lock_read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<Vec<u8>, Vec<EntityId>>> {
        self.buckets.read().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<Vec<u8>, Vec<EntityId>>> {
        self.buckets.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Index for HashIndex {
    fn name(&self) -> &'static str {
        if self.unique {
            "unique-hash"
        } else {
            "hash"
        }
    }

    fn attribute(&self) -> &Attribute {
        &self.attribute
    }

    fn features(&self) -> FeatureSet {
        let base = FeatureSet::of(&[
            IndexFeature::Equality,
            IndexFeature::Membership,
            IndexFeature::Containment,
        ]);
        if self.unique {
            base.with(IndexFeature::Uniqueness)
        } else {
            base
        }
    }

    fn insert(&self, key: &FieldValue, entity: EntityId) -> IndexResult<()> {
        let keys = self.entry_keys(key)?;
        let mut buckets = self.lock_write();
        if self.unique {
            for k in &keys {
                if buckets.get(k).is_some_and(|posting| {
                    posting.iter().any(|existing| *existing != entity)
                }) {
                    return Err(IndexError::UniqueViolation {
                        attribute: self.attribute.to_string(),
                    });
                }
            }
        }
        for k in keys {
            let posting = buckets.entry(k).or_default();
            if !posting.contains(&entity) {
                posting.push(entity);
            }
        }
        Ok(())
    }

    fn remove(&self, key: &FieldValue, entity: EntityId) -> IndexResult<()> {
        let keys = self.entry_keys(key)?;
        let mut buckets = self.lock_write();
        for k in keys {
            if let Some(posting) = buckets.get_mut(&k) {
                posting.retain(|existing| *existing != entity);
                if posting.is_empty() {
                    buckets.remove(&k);
                }
            }
        }
        Ok(())
    }

    fn lookup(&self, key: &FieldValue) -> IndexResult<Vec<EntityId>> {
        let probe = exact_key(self.probe_handler(), key)?;
        Ok(self.lock_read().get(&probe).cloned().unwrap_or_default())
    }

    fn range(
        &self,
        _lower: Bound<&FieldValue>,
        _upper: Bound<&FieldValue>,
    ) -> IndexResult<Vec<EntityId>> {
        Err(IndexError::FeatureUnsupported {
            index: self.name(),
            operation: "range",
        })
    }

    fn len(&self) -> usize {
        self.lock_read().len()
    }
}

/// Btree index: equality plus ordered range scans over orderable scalar
/// attributes.
#[derive(Debug)]
pub struct BTreeIndex {
    attribute: Attribute,
    tree: RwLock<BTreeMap<Vec<u8>, Vec<EntityId>>>,
}

impl BTreeIndex {
    /// Fails for attribute shapes with no total order.
    pub fn new(attribute: Attribute) -> IndexResult<Self> {
        if !orderable(attribute.handler()) {
            return Err(IndexError::UnorderableKey(attribute.handler().shape_name()));
        }
        Ok(Self {
            attribute,
            tree: RwLock::new(BTreeMap::new()),
        })
    }

    fn lock_read(&self) -> std::sync::RwLockReadGuard<'_, BTreeMap<Vec<u8>, Vec<EntityId>>> {
        self.tree.read().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_write(&self) -> std::sync::RwLockWriteGuard<'_, BTreeMap<Vec<u8>, Vec<EntityId>>> {
        self.tree.write().unwrap_or_else(|e| e.into_inner())
    }

    fn bound_key(&self, bound: Bound<&FieldValue>) -> IndexResult<Bound<Vec<u8>>> {
        Ok(match bound {
            Bound::Included(value) => {
                Bound::Included(ordered_key(self.attribute.handler(), value)?)
            }
            Bound::Excluded(value) => {
                Bound::Excluded(ordered_key(self.attribute.handler(), value)?)
            }
            Bound::Unbounded => Bound::Unbounded,
        })
    }
}

impl Index for BTreeIndex {
    fn name(&self) -> &'static str {
        "btree"
    }

    fn attribute(&self) -> &Attribute {
        &self.attribute
    }

    fn features(&self) -> FeatureSet {
        FeatureSet::of(&[IndexFeature::Equality, IndexFeature::Range])
    }

    fn insert(&self, key: &FieldValue, entity: EntityId) -> IndexResult<()> {
        let k = ordered_key(self.attribute.handler(), key)?;
        let mut tree = self.lock_write();
        let posting = tree.entry(k).or_default();
        if !posting.contains(&entity) {
            posting.push(entity);
        }
        Ok(())
    }

    fn remove(&self, key: &FieldValue, entity: EntityId) -> IndexResult<()> {
        let k = ordered_key(self.attribute.handler(), key)?;
        let mut tree = self.lock_write();
        if let Some(posting) = tree.get_mut(&k) {
            posting.retain(|existing| *existing != entity);
            if posting.is_empty() {
                tree.remove(&k);
            }
        }
        Ok(())
    }

    fn lookup(&self, key: &FieldValue) -> IndexResult<Vec<EntityId>> {
        let k = ordered_key(self.attribute.handler(), key)?;
        Ok(self.lock_read().get(&k).cloned().unwrap_or_default())
    }

    fn range(
        &self,
        lower: Bound<&FieldValue>,
        upper: Bound<&FieldValue>,
    ) -> IndexResult<Vec<EntityId>> {
        let lower = self.bound_key(lower)?;
        let upper = self.bound_key(upper)?;
        let tree = self.lock_read();
        let mut out = Vec::new();
        for (_, posting) in tree.range((lower, upper)) {
            out.extend_from_slice(posting);
        }
        Ok(out)
    }

    fn len(&self) -> usize {
        self.lock_read().len()
    }
}
