//! Registry dispatch tests

use std::sync::LazyLock;

use attrium::{
    DataRegistry, Key, Manipulator,
    manipulator::Descriptor,
    processor::HolderValueProcessor,
    transaction::ResultType,
};

use crate::helpers::{
    DURATION, EmitterData, FieldEmitter, PARTICLE, RADIUS, StaticScenery, effect, test_registry,
};

#[test]
fn test_get_and_offer_value() {
    let registry = test_registry();
    let mut emitter = FieldEmitter::new();

    assert_eq!(registry.get_value(&emitter, &DURATION).unwrap(), Some(600));

    let result = registry.offer_value(&mut emitter, &DURATION, 200).unwrap();
    assert!(result.is_successful());
    assert_eq!(emitter.duration(), 200);

    // The result records both the applied and the replaced value
    assert_eq!(result.successful_data()[0].value_as::<i64>(), Some(200));
    assert_eq!(result.replaced_data()[0].value_as::<i64>(), Some(600));
}

#[test]
fn test_offer_rejected_by_holder() {
    let registry = test_registry();
    let mut emitter = FieldEmitter::new();

    let result = registry.offer_value(&mut emitter, &RADIUS, -1.0).unwrap();
    assert_eq!(result.result_type(), ResultType::Failure);
    assert_eq!(result.rejected_data()[0].key().id(), "radius");
    assert_eq!(result.rejected_data()[0].value_as::<f64>(), Some(-1.0));
    // Nothing was written
    assert_eq!(emitter.radius(), 3.0);
}

#[test]
fn test_unsupported_holder_is_not_an_error() {
    let registry = test_registry();
    let mut scenery = StaticScenery::default();

    assert_eq!(registry.get_value(&scenery, &DURATION).unwrap(), None);

    let result = registry.offer_value(&mut scenery, &DURATION, 200).unwrap();
    assert_eq!(result.result_type(), ResultType::NoData);
}

#[test]
fn test_unregistered_key_fails_loudly() {
    let registry = test_registry();
    let emitter = FieldEmitter::new();
    let stray: Key<i64> = Key::new("stray", 0);

    let err = registry.get_value(&emitter, &stray).unwrap_err();
    assert!(err.is_unregistered());
}

#[test]
fn test_unregistered_data_family_fails_loudly() {
    static GLOW: LazyLock<Key<i64>> = LazyLock::new(|| Key::new("glow", 0));
    static GLOW_DESCRIPTOR: LazyLock<Descriptor<GlowData>> = LazyLock::new(|| {
        Descriptor::builder()
            .field(&GLOW, |d: &GlowData| d.brightness, |d, v| d.brightness = v)
            .build()
    });

    #[derive(Debug, Clone, Default, PartialEq)]
    struct GlowData {
        brightness: i64,
    }

    impl Manipulator for GlowData {
        fn data_name() -> &'static str {
            "glow"
        }

        fn descriptor() -> &'static Descriptor<Self> {
            &GLOW_DESCRIPTOR
        }
    }

    let registry = test_registry();
    let emitter = FieldEmitter::new();

    let err = registry.get_data::<GlowData>(&emitter).unwrap_err();
    assert!(err.is_unregistered());
}

#[test]
fn test_first_registered_processor_wins() {
    // A shadowing processor registered ahead of the real one takes
    // every query for holders it accepts
    let registry = DataRegistry::builder()
        .register_value_processor(HolderValueProcessor::new(
            DURATION.clone(),
            |_: &FieldEmitter| Some(1111),
            |_, _| true,
        ))
        .register_value_processor(HolderValueProcessor::new(
            DURATION.clone(),
            |e: &FieldEmitter| Some(e.duration()),
            |e, v| {
                e.set_duration(v);
                true
            },
        ))
        .build();

    let emitter = FieldEmitter::new();
    assert_eq!(registry.get_value(&emitter, &DURATION).unwrap(), Some(1111));
}

#[test]
fn test_dispatch_falls_through_to_an_accepting_processor() {
    let registry = DataRegistry::builder()
        .register_value_processor(HolderValueProcessor::new(
            DURATION.clone(),
            |_: &StaticScenery| Some(-1),
            |_, _| false,
        ))
        .register_value_processor(HolderValueProcessor::new(
            DURATION.clone(),
            |e: &FieldEmitter| Some(e.duration()),
            |e, v| {
                e.set_duration(v);
                true
            },
        ))
        .build();

    let scenery = StaticScenery::default();
    let emitter = FieldEmitter::new();

    assert_eq!(registry.get_value(&scenery, &DURATION).unwrap(), Some(-1));
    assert_eq!(registry.get_value(&emitter, &DURATION).unwrap(), Some(600));
}

#[test]
fn test_get_attr_value_is_a_copy() {
    let registry = test_registry();
    let emitter = FieldEmitter::new();

    let mut value = registry.get_attr_value(&emitter, &DURATION).unwrap().unwrap();
    assert_eq!(*value.get(), 600);

    value.set(1);
    // Mutating the value object does not write back
    assert_eq!(emitter.duration(), 600);
}

#[test]
fn test_offer_data_applies_whole_bundle() {
    let registry = test_registry();
    let mut emitter = FieldEmitter::new();

    let data = EmitterData {
        duration: 150,
        radius: 5.0,
        particle: "spark".to_string(),
        effects: vec![effect("regen", 2), effect("haste", 3)],
    };

    let result = registry.offer_data(&mut emitter, &data).unwrap();
    assert!(result.is_successful());
    assert_eq!(result.successful_data().len(), 4);
    assert_eq!(result.replaced_data().len(), 4);

    assert_eq!(emitter.duration(), 150);
    assert_eq!(emitter.particle(), "spark");
    // Derived state recomputed from the new effect list
    assert_eq!(emitter.tint(), 5);

    let round_trip = registry.get_data::<EmitterData>(&emitter).unwrap();
    assert_eq!(round_trip, Some(data));
}

#[test]
fn test_offer_data_rejection_applies_nothing() {
    let registry = test_registry();
    let mut emitter = FieldEmitter::new();

    let data = EmitterData {
        radius: -1.0,
        effects: vec![effect("regen", 2)],
        ..EmitterData::default()
    };

    let result = registry.offer_data(&mut emitter, &data).unwrap();
    assert_eq!(result.result_type(), ResultType::Failure);
    assert_eq!(result.rejected_data().len(), 4);

    // The radius rejection happened before any field was touched
    assert_eq!(emitter.radius(), 3.0);
    assert!(emitter.effects().is_empty());
    assert_eq!(emitter.tint(), 0);
}

#[test]
fn test_inactive_holder_reports_no_data() {
    let registry = test_registry();
    let mut emitter = FieldEmitter::new();
    emitter.active = false;

    assert!(!registry.supports_data::<EmitterData>(&emitter).unwrap());
    assert_eq!(registry.get_data::<EmitterData>(&emitter).unwrap(), None);

    let result = registry
        .offer_data(&mut emitter, &EmitterData::default())
        .unwrap();
    assert_eq!(result.result_type(), ResultType::NoData);
}

#[test]
fn test_supports_data() {
    let registry = test_registry();
    let emitter = FieldEmitter::new();
    let scenery = StaticScenery::default();

    assert!(registry.supports_data::<EmitterData>(&emitter).unwrap());
    assert!(!registry.supports_data::<EmitterData>(&scenery).unwrap());
}

#[test]
fn test_remove_defaults_to_no_data() {
    // Neither the emitter keys nor the family are removable
    let registry = test_registry();
    let mut emitter = FieldEmitter::new();

    let result = registry.remove_value(&mut emitter, &DURATION).unwrap();
    assert_eq!(result.result_type(), ResultType::NoData);
    assert_eq!(emitter.duration(), 600);

    let result = registry.remove_data::<EmitterData>(&mut emitter).unwrap();
    assert_eq!(result.result_type(), ResultType::NoData);
}

#[test]
fn test_end_to_end_scenario() {
    let registry = test_registry();
    let mut emitter = FieldEmitter::new();

    registry.offer_value(&mut emitter, &DURATION, 200).unwrap();
    registry
        .offer_value(&mut emitter, &PARTICLE, "ember".to_string())
        .unwrap();

    let bundle = registry.get_data::<EmitterData>(&emitter).unwrap().unwrap();
    assert_eq!(bundle.get(&DURATION), Some(200));
    assert_eq!(bundle.get(&PARTICLE), Some("ember".to_string()));
    assert_eq!(bundle.get(&RADIUS), Some(3.0));

    // Snapshots taken through the registry's cache canonicalize
    let first = bundle.as_immutable(registry.cache());
    let second = bundle.as_immutable(registry.cache());
    assert!(first.ptr_eq(&second));
}
