#![allow(dead_code)]

use annotation_reader::{
    Annotation, CacheProvider, CacheValue, DeclaredAnnotationReader, Result, SimpleCache,
    TypeManifest, TypeRegistry,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

pub const NAMESPACE: &str = "Doctrine\\Tests\\Common\\Annotations\\Fixtures";

pub fn manifest_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("annotations")
        .join("types.yaml")
}

pub fn fixture_manifest() -> TypeManifest {
    TypeManifest::load(manifest_path()).expect("Failed to load fixture manifest")
}

pub fn fixture_registry() -> TypeRegistry {
    fixture_manifest()
        .into_registry()
        .expect("Fixture manifest should be valid")
}

/// Declared reader honouring the fixture manifest's ignored annotations.
pub fn declared_reader(registry: &TypeRegistry) -> DeclaredAnnotationReader<&TypeRegistry> {
    DeclaredAnnotationReader::new(registry)
        .with_ignored_names(fixture_manifest().ignored_annotations)
}

/// Fully-qualified name of a fixture type, e.g. `fixture("Traits\\EmptyTrait")`.
pub fn fixture(short_name: &str) -> String {
    format!("{NAMESPACE}\\{short_name}")
}

pub fn route() -> Annotation {
    Annotation::new("Route").with_value("pattern", "/someprefix")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheCall {
    Get(String),
    Set(String),
}

/// Cache that records every get/set in order. Usable both as a
/// `SimpleCache` and as a `CacheProvider`.
#[derive(Debug, Default)]
pub struct RecordingCache {
    entries: RefCell<HashMap<String, CacheValue>>,
    calls: RefCell<Vec<CacheCall>>,
}

impl RecordingCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate entries without recording calls.
    pub fn seeded<'a>(entries: impl IntoIterator<Item = (&'a str, CacheValue)>) -> Self {
        let cache = Self::new();
        for (key, value) in entries {
            cache.entries.borrow_mut().insert(key.to_string(), value);
        }
        cache
    }

    pub fn calls(&self) -> Vec<CacheCall> {
        self.calls.borrow().clone()
    }

    pub fn writes(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, CacheCall::Set(_)))
            .count()
    }

    pub fn value(&self, key: &str) -> Option<CacheValue> {
        self.entries.borrow().get(key).cloned()
    }

    fn record(&self, call: CacheCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl SimpleCache for RecordingCache {
    fn get(&self, key: &str) -> Result<Option<CacheValue>> {
        self.record(CacheCall::Get(key.to_string()));
        Ok(self.value(key))
    }

    fn set(&self, key: &str, value: CacheValue) -> Result<bool> {
        self.record(CacheCall::Set(key.to_string()));
        self.entries.borrow_mut().insert(key.to_string(), value);
        Ok(true)
    }
}

impl CacheProvider for RecordingCache {
    fn fetch(&self, id: &str) -> Result<Option<CacheValue>> {
        SimpleCache::get(self, id)
    }

    fn contains(&self, id: &str) -> Result<bool> {
        Ok(self.entries.borrow().contains_key(id))
    }

    fn save(&self, id: &str, value: CacheValue, _lifetime: u64) -> Result<bool> {
        SimpleCache::set(self, id, value)
    }

    fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.entries.borrow_mut().remove(id).is_some())
    }
}
