//! Canonicalization cache tests

use std::sync::Arc;

use attrium::{cache::ImmutableCache, container::Value};

#[derive(Debug, PartialEq)]
struct Snapshot {
    n: i64,
}

#[test]
fn test_equal_args_share_one_instance() {
    let cache = ImmutableCache::new();

    let first = cache.get_or_create(Value::Int(1), || Snapshot { n: 1 });
    let second = cache.get_or_create(Value::Int(1), || Snapshot { n: 1 });

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_distinct_args_get_distinct_instances() {
    let cache = ImmutableCache::new();

    let one = cache.get_or_create(Value::Int(1), || Snapshot { n: 1 });
    let two = cache.get_or_create(Value::Int(2), || Snapshot { n: 2 });

    assert!(!Arc::ptr_eq(&one, &two));
    assert_eq!(*one, Snapshot { n: 1 });
    assert_eq!(*two, Snapshot { n: 2 });
    assert_eq!(cache.len(), 2);
}

#[test]
fn test_entries_are_keyed_by_type_and_args() {
    #[derive(Debug)]
    struct Other(#[allow(dead_code)] i64);

    let cache = ImmutableCache::new();
    cache.get_or_create(Value::Int(1), || Snapshot { n: 1 });
    cache.get_or_create(Value::Int(1), || Other(1));

    // Same args, different type: two independent entries
    assert_eq!(cache.len(), 2);
    assert!(cache.lookup_args::<Snapshot>(&Value::Int(1)).is_some());
    assert!(cache.lookup_args::<Other>(&Value::Int(1)).is_some());
    assert!(cache.lookup_args::<Snapshot>(&Value::Int(2)).is_none());
}

#[test]
fn test_capacity_bounds_canonicalization() {
    let cache = ImmutableCache::with_capacity(1);
    assert_eq!(cache.capacity(), 1);

    let canonical = cache.get_or_create(Value::Int(1), || Snapshot { n: 1 });
    assert_eq!(cache.len(), 1);

    // Past the bound the cache stops sharing but stays correct
    let a = cache.get_or_create(Value::Int(2), || Snapshot { n: 2 });
    let b = cache.get_or_create(Value::Int(2), || Snapshot { n: 2 });
    assert!(!Arc::ptr_eq(&a, &b));
    assert_eq!(*a, *b);
    assert_eq!(cache.len(), 1);

    // Entries admitted before the bound keep canonicalizing
    let again = cache.get_or_create(Value::Int(1), || Snapshot { n: 1 });
    assert!(Arc::ptr_eq(&canonical, &again));
}

#[test]
fn test_concurrent_misses_converge_on_one_winner() {
    let cache = ImmutableCache::new();

    let instances: Vec<Arc<Snapshot>> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(|| cache.get_or_create(Value::Int(7), || Snapshot { n: 7 })))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    // Whoever wins the insertion race, every caller ends up with the
    // same canonical instance
    assert_eq!(cache.len(), 1);
    for instance in &instances[1..] {
        assert!(Arc::ptr_eq(&instances[0], instance));
    }
}

#[test]
fn test_default_cache_is_empty() {
    let cache = ImmutableCache::default();
    assert!(cache.is_empty());
    assert_eq!(cache.len(), 0);
}
