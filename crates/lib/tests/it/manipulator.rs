//! Descriptor-driven bundle tests

use std::sync::LazyLock;

use attrium::{
    Key, Manipulator,
    cache::ImmutableCache,
    container::{Container, Value},
    transaction::ResultType,
};

use crate::helpers::{DURATION, EFFECTS, EmitterData, PARTICLE, RADIUS, effect};

static UNRELATED: LazyLock<Key<bool>> = LazyLock::new(|| Key::new("unrelated", false));

#[test]
fn test_get_and_set_declared_keys() {
    let mut data = EmitterData::default();

    assert_eq!(data.get(&DURATION), Some(600));
    assert_eq!(data.get(&RADIUS), Some(3.0));
    assert_eq!(data.get(&PARTICLE), Some("mist".to_string()));

    assert!(data.set(&DURATION, 200).unwrap());
    assert_eq!(data.get(&DURATION), Some(200));

    assert!(data.set(&EFFECTS, vec![effect("regen", 2)]).unwrap());
    assert_eq!(data.get(&EFFECTS).unwrap().len(), 1);
}

#[test]
fn test_undeclared_key_is_not_an_error() {
    let mut data = EmitterData::default();

    assert_eq!(data.get(&UNRELATED), None);
    // set reports "not declared" as false, not as a failure
    assert!(!data.set(&UNRELATED, true).unwrap());
}

#[test]
fn test_supports_is_static() {
    assert!(EmitterData::supports(&DURATION));
    assert!(EmitterData::supports(&EFFECTS));
    assert!(!EmitterData::supports(&UNRELATED));
}

#[test]
fn test_attribute_keys_in_declaration_order() {
    let ids: Vec<String> = EmitterData::attribute_keys()
        .iter()
        .map(|k| k.id().to_string())
        .collect();
    assert_eq!(ids, vec!["duration", "radius", "particle", "effects"]);
}

#[test]
fn test_set_raw_type_mismatch_fails_loudly() {
    let mut data = EmitterData::default();

    let err = data
        .set_raw(DURATION.info(), &Value::Text("soon".into()))
        .unwrap_err();
    assert!(err.is_type_error());
    // The backing field is untouched
    assert_eq!(data.get(&DURATION), Some(600));
}

#[test]
fn test_to_container_serializes_every_key() {
    let mut data = EmitterData::default();
    data.set(&DURATION, 200).unwrap();

    let doc = data.to_container();
    assert_eq!(doc.len(), 4);
    assert_eq!(doc.get_as::<i64>("duration"), Some(200));
    assert_eq!(doc.get_as::<f64>("radius"), Some(3.0));
    assert_eq!(doc.get_as::<&str>("particle"), Some("mist"));
    assert!(doc.get("effects").unwrap().as_list().unwrap().is_empty());
}

#[test]
fn test_fill_round_trip() {
    let mut original = EmitterData::default();
    original.set(&DURATION, 150).unwrap();
    original.set(&RADIUS, 7.5).unwrap();
    original
        .set(&EFFECTS, vec![effect("regen", 2), effect("haste", 1)])
        .unwrap();

    let (rebuilt, result) = EmitterData::fill(&original.to_container());
    assert!(result.is_successful());
    assert_eq!(rebuilt, original);
    assert!(rebuilt.content_equals(&original));
}

#[test]
fn test_fill_leaves_absent_keys_untouched() {
    let mut doc = Container::new();
    doc.set("duration", 42);

    let mut data = EmitterData::default();
    data.set(&RADIUS, 9.0).unwrap();
    let result = data.fill_from(&doc);

    assert!(result.is_successful());
    assert_eq!(data.get(&DURATION), Some(42));
    // Absent from the container: prior value kept, not reset to default
    assert_eq!(data.get(&RADIUS), Some(9.0));
}

#[test]
fn test_fill_skips_malformed_entries() {
    let mut doc = Container::new();
    doc.set("duration", "not a number");
    doc.set("radius", 7.5);

    let mut data = EmitterData::default();
    let result = data.fill_from(&doc);

    // The malformed key is skipped, the rest applies
    assert_eq!(result.result_type(), ResultType::Failure);
    assert_eq!(data.get(&DURATION), Some(600));
    assert_eq!(data.get(&RADIUS), Some(7.5));

    assert_eq!(result.rejected_data().len(), 1);
    assert_eq!(result.rejected_data()[0].key().id(), "duration");
    assert!(
        result
            .successful_data()
            .iter()
            .any(|s| s.key().id() == "radius")
    );
}

#[test]
fn test_copy_independence() {
    let mut original = EmitterData::default();
    original.set(&EFFECTS, vec![effect("regen", 2)]).unwrap();

    let mut copy = original.clone();
    copy.set(&DURATION, 1).unwrap();
    copy.set(&EFFECTS, vec![effect("haste", 1), effect("regen", 3)])
        .unwrap();

    assert_eq!(original.get(&DURATION), Some(600));
    assert_eq!(original.get(&EFFECTS).unwrap().len(), 1);
    assert_eq!(copy.get(&EFFECTS).unwrap().len(), 2);
}

#[test]
fn test_values_snapshot_every_key() {
    let data = EmitterData::default();
    let values = data.values();

    assert_eq!(values.len(), 4);
    assert_eq!(values[0].key().id(), "duration");
    assert_eq!(values[0].value_as::<i64>(), Some(600));
}

#[test]
fn test_immutable_snapshot_is_cached() {
    let cache = ImmutableCache::new();
    let mut data = EmitterData::default();
    data.set(&DURATION, 200).unwrap();

    let first = data.as_immutable(&cache);
    let second = data.as_immutable(&cache);
    assert!(first.ptr_eq(&second));

    // A different bundle gets a different canonical snapshot
    data.set(&DURATION, 300).unwrap();
    let third = data.as_immutable(&cache);
    assert!(!first.ptr_eq(&third));
    assert_eq!(first.get(&DURATION), Some(200));
    assert_eq!(third.get(&DURATION), Some(300));
}

#[test]
fn test_immutable_mutable_fidelity() {
    let cache = ImmutableCache::new();
    let mut data = EmitterData::default();
    data.set(&DURATION, 250).unwrap();
    data.set(&EFFECTS, vec![effect("regen", 2)]).unwrap();

    let frozen = data.as_immutable(&cache);
    let thawed = frozen.as_mutable();
    assert_eq!(thawed, data);

    // The thawed copy shares no mutable state with the snapshot
    let mut thawed = thawed;
    thawed.set(&EFFECTS, Vec::new()).unwrap();
    assert_eq!(frozen.get(&EFFECTS).unwrap().len(), 1);
}

#[test]
fn test_immutable_with() {
    let cache = ImmutableCache::new();
    let frozen = EmitterData::default().as_immutable(&cache);

    let changed = frozen.with(&DURATION, 50).unwrap();
    assert_eq!(changed.get(&DURATION), Some(50));
    assert_eq!(frozen.get(&DURATION), Some(600));

    // An undeclared key fails loudly instead of returning an unchanged copy
    let err = frozen.with(&UNRELATED, true).unwrap_err();
    assert!(err.is_not_declared());
}

#[test]
fn test_scenario_set_then_serialize_then_snapshot() {
    let cache = ImmutableCache::new();
    let mut data = EmitterData::default();

    data.set(&DURATION, 200).unwrap();

    let doc = data.to_container();
    assert_eq!(doc.get_as::<i64>("duration"), Some(200));
    assert_eq!(doc.get_as::<f64>("radius"), Some(3.0));

    let first = data.as_immutable(&cache);
    let second = data.as_immutable(&cache);
    assert!(first.ptr_eq(&second));
}
