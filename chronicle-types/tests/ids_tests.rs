use chronicle_types::{EntityId, EntityKind};
use std::collections::HashSet;

#[test]
fn new_ids_are_unique() {
    let ids: HashSet<_> = (0..1000).map(|_| EntityId::new()).collect();
    assert_eq!(ids.len(), 1000);
}

#[test]
fn display_round_trips_through_from_str() {
    let id = EntityId::new();
    let parsed: EntityId = id.to_string().parse().expect("valid uuid string");
    assert_eq!(id, parsed);
}

#[test]
fn from_str_rejects_garbage() {
    assert!("not-a-uuid".parse::<EntityId>().is_err());
}

#[test]
fn byte_round_trip() {
    let id = EntityId::new();
    assert_eq!(EntityId::from_bytes(id.to_bytes()), id);
}

#[test]
fn kind_byte_round_trip() {
    assert_eq!(
        EntityKind::from_byte(EntityKind::Command.as_byte()),
        Some(EntityKind::Command)
    );
    assert_eq!(
        EntityKind::from_byte(EntityKind::Event.as_byte()),
        Some(EntityKind::Event)
    );
    assert_eq!(EntityKind::from_byte(7), None);
}
