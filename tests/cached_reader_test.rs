//! Cache staleness tests for `CachedReader`.
//!
//! Each test seeds a recording cache with a result and a modification
//! marker, pins the modification times of the fixture types, and checks the
//! exact sequence of cache calls a read performs.

mod fixtures;

use annotation_reader::{
    Annotation, CacheKey, CacheValue, CachedReader, DeclaredAnnotationReader, Error,
    FixedTimestamps, Reader, TypeRegistry,
};
use fixtures::{declared_reader, fixture, fixture_registry, route, CacheCall, RecordingCache};
use pretty_assertions::assert_eq;

const CACHE_TIME: i64 = 1_700_000_000;

fn cache_key(class: &str) -> String {
    class.replace('\\', ".")
}

fn cached_reader<'a>(
    registry: &'a TypeRegistry,
    cache: &'a RecordingCache,
    debug: bool,
) -> CachedReader<DeclaredAnnotationReader<&'a TypeRegistry>, &'a RecordingCache, &'a TypeRegistry>
{
    CachedReader::from_simple_cache(declared_reader(registry), cache, registry, debug)
}

fn stale_entry(class: &str) -> RecordingCache {
    let key = cache_key(class);
    let marker = format!("[C]{key}");
    // Result was cached, but there was no annotation
    RecordingCache::seeded([
        (key.as_str(), CacheValue::Annotations(vec![])),
        (marker.as_str(), CacheValue::Timestamp(CACHE_TIME)),
    ])
}

fn assert_cache_stale(class: &str, timestamps: FixedTimestamps) {
    let registry = fixture_registry();
    let cache = stale_entry(class);
    let reader = cached_reader(&registry, &cache, true)
        .with_timestamps(timestamps);

    assert_eq!(reader.class_annotations(class).unwrap(), vec![route()]);

    let key = cache_key(class);
    let marker = format!("[C]{key}");
    assert_eq!(
        cache.calls(),
        vec![
            CacheCall::Get(key.clone()),
            CacheCall::Get(marker.clone()),
            CacheCall::Set(key.clone()),
            CacheCall::Set(marker.clone()),
        ]
    );
    assert_eq!(
        cache.value(&key),
        Some(CacheValue::Annotations(vec![route()]))
    );
    assert_eq!(
        cache.value(&marker),
        Some(CacheValue::Timestamp(CACHE_TIME + 10))
    );
}

fn assert_cache_fresh(class: &str, timestamps: FixedTimestamps) {
    let key = cache_key(class);
    let marker = format!("[C]{key}");
    // Result was cached, and there was an annotation
    let cache = RecordingCache::seeded([
        (key.as_str(), CacheValue::Annotations(vec![route()])),
        (marker.as_str(), CacheValue::Timestamp(CACHE_TIME)),
    ]);

    let registry = fixture_registry();
    let reader = cached_reader(&registry, &cache, true)
        .with_timestamps(timestamps);

    assert_eq!(reader.class_annotations(class).unwrap(), vec![route()]);
    assert_eq!(
        cache.calls(),
        vec![CacheCall::Get(key), CacheCall::Get(marker)]
    );
    assert_eq!(cache.writes(), 0);
}

#[test]
fn test_ignores_stale_cache() {
    let class = fixture("Controller");
    let timestamps = FixedTimestamps::new().with(&class, CACHE_TIME + 10);

    assert_cache_stale(&class, timestamps);
}

#[test]
fn test_ignores_stale_cache_with_parent_class() {
    let class = fixture("ControllerWithParentClass");
    let timestamps = FixedTimestamps::new()
        .with(&class, CACHE_TIME - 10)
        .with(&fixture("AbstractController"), CACHE_TIME + 10);

    assert_cache_stale(&class, timestamps);
}

#[test]
fn test_ignores_stale_cache_with_traits() {
    let class = fixture("ControllerWithTrait");
    let timestamps = FixedTimestamps::new()
        .with(&class, CACHE_TIME - 10)
        .with(&fixture("Traits\\SecretRouteTrait"), CACHE_TIME + 10);

    assert_cache_stale(&class, timestamps);
}

#[test]
fn test_ignores_stale_cache_with_traits_that_use_other_traits() {
    let class = fixture("ClassThatUsesTraitThatUsesAnotherTrait");
    let timestamps = FixedTimestamps::new()
        .with(&class, CACHE_TIME - 10)
        .with(&fixture("Traits\\EmptyTrait"), CACHE_TIME + 10);

    assert_cache_stale(&class, timestamps);
}

#[test]
fn test_ignores_stale_cache_with_interfaces_that_extend_other_interfaces() {
    let class = fixture("InterfaceThatExtendsAnInterface");
    let timestamps = FixedTimestamps::new()
        .with(&class, CACHE_TIME - 10)
        .with(&fixture("EmptyInterface"), CACHE_TIME + 10);

    assert_cache_stale(&class, timestamps);
}

#[test]
fn test_uses_fresh_cache_with_traits_that_use_other_traits() {
    let class = fixture("ClassThatUsesTraitThatUsesAnotherTrait");
    let timestamps = FixedTimestamps::new()
        .with(&class, CACHE_TIME - 10)
        .with(&fixture("Traits\\EmptyTrait"), CACHE_TIME - 10);

    assert_cache_fresh(&class, timestamps);
}

#[test]
fn test_uses_fresh_cache_when_marker_equals_modification_time() {
    let class = fixture("ControllerWithTrait");
    let timestamps = FixedTimestamps::new()
        .with(&class, CACHE_TIME - 10)
        .with(&fixture("Traits\\SecretRouteTrait"), CACHE_TIME);

    assert_cache_fresh(&class, timestamps);
}

#[test]
fn test_provider_construction_performs_same_calls() {
    let class = fixture("ControllerWithParentClass");
    let registry = fixture_registry();
    let cache = stale_entry(&class);
    let timestamps = FixedTimestamps::new().with(&fixture("AbstractController"), CACHE_TIME + 1);

    let reader = CachedReader::new(declared_reader(&registry), &cache, &registry, true)
        .with_timestamps(timestamps);

    assert_eq!(reader.class_annotations(&class).unwrap(), vec![route()]);

    let key = cache_key(&class);
    let marker = format!("[C]{key}");
    assert_eq!(
        cache.calls(),
        vec![
            CacheCall::Get(key.clone()),
            CacheCall::Get(marker.clone()),
            CacheCall::Set(key),
            CacheCall::Set(marker.clone()),
        ]
    );
    assert_eq!(
        cache.value(&marker),
        Some(CacheValue::Timestamp(CACHE_TIME + 1))
    );
}

#[test]
fn test_cache_miss_skips_marker_lookup() {
    let class = fixture("Controller");
    let registry = fixture_registry();
    let cache = RecordingCache::new();
    let reader = cached_reader(&registry, &cache, true)
        .with_timestamps(FixedTimestamps::new().with(&class, CACHE_TIME));

    assert_eq!(reader.class_annotations(&class).unwrap(), vec![route()]);

    let key = cache_key(&class);
    assert_eq!(
        cache.calls(),
        vec![
            CacheCall::Get(key.clone()),
            CacheCall::Set(key.clone()),
            CacheCall::Set(format!("[C]{key}")),
        ]
    );
}

#[test]
fn test_non_debug_reader_trusts_any_cached_entry() {
    let class = fixture("ControllerWithTrait");
    let registry = fixture_registry();
    let cache = stale_entry(&class);
    let timestamps = FixedTimestamps::new().with(&fixture("Traits\\SecretRouteTrait"), i64::MAX);

    let reader = cached_reader(&registry, &cache, false)
        .with_timestamps(timestamps);

    assert!(reader.class_annotations(&class).unwrap().is_empty());
    assert_eq!(cache.calls(), vec![CacheCall::Get(cache_key(&class))]);
}

#[test]
fn test_method_and_property_use_element_keys() {
    let class = fixture("ControllerWithTrait");
    let registry = fixture_registry();
    let cache = RecordingCache::new();
    let reader = cached_reader(&registry, &cache, true)
        .with_timestamps(FixedTimestamps::new());

    let secret = reader.method_annotations(&class, "secretAction").unwrap();
    assert_eq!(
        secret,
        vec![
            Annotation::new("Route")
                .with_value("name", "_secret")
                .with_value("pattern", "/secret"),
            Annotation::new("Template"),
        ]
    );

    let method_key = CacheKey::for_method(&class, "secretAction");
    assert_eq!(
        method_key.as_str(),
        "Doctrine.Tests.Common.Annotations.Fixtures.ControllerWithTrait#secretAction"
    );
    assert_eq!(
        cache.value(&method_key.marker()),
        Some(CacheValue::Timestamp(0))
    );

    let controller = fixture("Controller");
    let service = reader.property_annotations(&controller, "service").unwrap();
    assert_eq!(service, vec![Annotation::new("Inject")]);
    assert!(cache
        .value("Doctrine.Tests.Common.Annotations.Fixtures.Controller$service")
        .is_some());
}

#[test]
fn test_recomputing_unchanged_sources_is_idempotent() {
    let class = fixture("ClassThatUsesTraitThatUsesAnotherTrait");
    let registry = fixture_registry();

    let first_cache = RecordingCache::new();
    let first = cached_reader(&registry, &first_cache, true)
        .with_timestamps(FixedTimestamps::new())
        .class_annotations(&class)
        .unwrap();

    let second_cache = RecordingCache::new();
    let second = cached_reader(&registry, &second_cache, true)
        .with_timestamps(FixedTimestamps::new())
        .class_annotations(&class)
        .unwrap();

    assert_eq!(first, vec![route()]);
    assert_eq!(first, second);
    assert_eq!(
        first_cache.value(&cache_key(&class)),
        second_cache.value(&cache_key(&class))
    );
}

#[test]
fn test_unknown_class_surfaces_reflection_failure() {
    let registry = fixture_registry();
    let cache = RecordingCache::new();
    let reader = cached_reader(&registry, &cache, true)
        .with_timestamps(FixedTimestamps::new());

    let err = reader.class_annotations(&fixture("Missing")).unwrap_err();
    assert!(matches!(err, Error::Reflection(_)));
    assert_eq!(cache.writes(), 0);
}
