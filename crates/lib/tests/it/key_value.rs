//! Key and value object tests

use attrium::{
    Key,
    cache::ImmutableCache,
    value::{AttrValue, ImmutableAttrValue, ValueSnapshot},
};

use crate::helpers::{DURATION, RADIUS};

#[test]
fn test_key_identity() {
    assert_eq!(DURATION.id(), "duration");
    assert_eq!(DURATION.default(), 600);

    // Clones share the same backing info
    let clone = DURATION.clone();
    assert_eq!(*DURATION, clone);

    // Equality goes by id, not by instance
    let rebuilt: Key<i64> = Key::new("duration", 600);
    assert_eq!(*DURATION, rebuilt);

    let other: Key<i64> = Key::new("wait_time", 10);
    assert_ne!(rebuilt, other);
}

#[test]
fn test_key_info_describes_value_type() {
    assert_eq!(DURATION.info().value_type(), "int");
    assert_eq!(RADIUS.info().value_type(), "float");
    assert_eq!(format!("{}", DURATION.info()), "duration: int");
}

#[test]
fn test_attr_value_get_set() {
    let mut value = AttrValue::new(DURATION.clone(), 600);

    assert_eq!(*value.get(), 600);
    assert_eq!(*value.default(), 600);

    value.set(200);
    assert_eq!(*value.get(), 200);
    // Setting never touches the default
    assert_eq!(*value.default(), 600);
}

#[test]
fn test_value_equality_excludes_default() {
    let a = AttrValue::with_default(DURATION.clone(), 600, 200);
    let b = AttrValue::with_default(DURATION.clone(), 0, 200);
    let c = AttrValue::with_default(DURATION.clone(), 600, 300);

    // Same key, same current: equal even with different defaults
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_immutable_with_returns_new_instance() {
    let original = ImmutableAttrValue::new(DURATION.clone(), 600);
    let changed = original.with(200);

    assert_eq!(*original.get(), 600);
    assert_eq!(*changed.get(), 200);
    assert_ne!(original, changed);
}

#[test]
fn test_mutable_immutable_round_trip() {
    let cache = ImmutableCache::new();
    let mut value = AttrValue::new(RADIUS.clone(), 3.0);
    value.set(5.5);

    let frozen = value.as_immutable(&cache);
    assert_eq!(*frozen.get(), 5.5);
    assert_eq!(*frozen.default(), 3.0);

    let mut thawed = frozen.as_mutable();
    assert_eq!(*thawed.get(), 5.5);

    // Mutating the thawed copy leaves the snapshot alone
    thawed.set(1.0);
    assert_eq!(*frozen.get(), 5.5);
}

#[test]
fn test_cached_of_canonicalizes() {
    let cache = ImmutableCache::new();

    let first = ImmutableAttrValue::cached_of(&cache, DURATION.clone(), 600, 200);
    let second = ImmutableAttrValue::cached_of(&cache, DURATION.clone(), 600, 200);
    assert!(std::sync::Arc::ptr_eq(&first, &second));

    let different = ImmutableAttrValue::cached_of(&cache, DURATION.clone(), 600, 300);
    assert!(!std::sync::Arc::ptr_eq(&first, &different));

    // A with() on a cached snapshot is independent of the canonical one
    let widened = different.with(400);
    assert_eq!(*widened.get(), 400);
    assert_eq!(*different.get(), 300);
}

#[test]
fn test_value_snapshot() {
    let snapshot = ValueSnapshot::of(&DURATION, 200);

    assert_eq!(snapshot.key().id(), "duration");
    assert_eq!(snapshot.value_as::<i64>(), Some(200));
    assert_eq!(snapshot.value_as::<String>(), None);
    assert_eq!(format!("{snapshot}"), "duration = 200");

    let same = ValueSnapshot::of(&DURATION, 200);
    let other = ValueSnapshot::of(&DURATION, 300);
    assert_eq!(snapshot, same);
    assert_ne!(snapshot, other);
}
