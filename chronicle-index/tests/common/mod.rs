//! Shared fixtures for index tests.

use chronicle_index::{
    Attribute, Capability, FeatureSet, HashIndex, Index, IndexEngine, IndexFeature, IndexResult,
    IndexedCollection,
};
use chronicle_layout::{Construction, FieldValue, Property, Schematic, TypeHandler};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Entity fixture with scalar and collection attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Account {
    pub owner: String,
    pub balance: i64,
    pub tags: Vec<String>,
}

impl Schematic for Account {
    const TYPE_NAME: &'static str = "Account";

    fn properties() -> Vec<Property<Self>> {
        vec![
            Property::new("owner", TypeHandler::Str, |a: &Self| {
                FieldValue::Str(a.owner.clone())
            })
            .with_set(|a, v| {
                a.owner = v.take_str()?;
                Ok(())
            }),
            Property::new("balance", TypeHandler::Long, |a: &Self| {
                FieldValue::Long(a.balance)
            })
            .with_set(|a, v| {
                a.balance = v.take_long()?;
                Ok(())
            }),
            Property::new(
                "tags",
                TypeHandler::list_of(TypeHandler::Str),
                |a: &Self| {
                    FieldValue::List(a.tags.iter().cloned().map(FieldValue::Str).collect())
                },
            )
            .with_set(|a, v| {
                a.tags = v
                    .take_list()?
                    .into_iter()
                    .map(FieldValue::take_str)
                    .collect::<Result<_, _>>()?;
                Ok(())
            }),
        ]
    }

    fn construction() -> Construction<Self> {
        Construction::Mutable(Self::default)
    }
}

pub fn balance_attribute() -> Attribute {
    Attribute::of::<Account>("balance").expect("balance attribute")
}

pub fn owner_attribute() -> Attribute {
    Attribute::of::<Account>("owner").expect("owner attribute")
}

pub fn tags_attribute() -> Attribute {
    Attribute::of::<Account>("tags").expect("tags attribute")
}

fn build_hash(attribute: &Attribute) -> IndexResult<Arc<dyn Index>> {
    Ok(Arc::new(HashIndex::new(attribute.clone(), false)))
}

/// Engine serving equality lookups only, for cascade tests.
pub struct EqualityOnlyEngine {
    capabilities: Vec<Capability>,
    collections: RwLock<HashMap<String, Arc<IndexedCollection>>>,
}

impl EqualityOnlyEngine {
    pub fn new() -> Self {
        Self {
            capabilities: vec![Capability::new(
                "hash",
                FeatureSet::of(&[IndexFeature::Equality]),
                build_hash,
            )],
            collections: RwLock::new(HashMap::new()),
        }
    }
}

impl IndexEngine for EqualityOnlyEngine {
    fn name(&self) -> &'static str {
        "equality-only"
    }

    fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    fn collection(&self, type_name: &str) -> Arc<IndexedCollection> {
        self.collections
            .write()
            .expect("collections lock")
            .entry(type_name.to_string())
            .or_insert_with(|| Arc::new(IndexedCollection::new(type_name)))
            .clone()
    }
}
