//! Key-value caches the cached reader stores results in.
//!
//! Two interfaces exist: `SimpleCache` (plain get/set) and `CacheProvider`
//! (fetch/contains/save/delete with lifetimes). The cached reader talks to
//! a `SimpleCache`; `ProviderCache` adapts any provider to it.

pub mod array;
pub mod filesystem;
pub mod key;

pub use array::ArrayCache;
pub use filesystem::FilesystemCache;
pub use key::{CacheKey, KEY_DELIMITER, MARKER_PREFIX};

use serde::{Deserialize, Serialize};

use crate::annotation::Annotation;
use crate::error::Result;

/// A cached annotation result or modification marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum CacheValue {
    Annotations(Vec<Annotation>),
    Timestamp(i64),
}

impl CacheValue {
    pub fn as_timestamp(&self) -> Option<i64> {
        match self {
            CacheValue::Timestamp(timestamp) => Some(*timestamp),
            CacheValue::Annotations(_) => None,
        }
    }

    pub fn into_annotations(self) -> Option<Vec<Annotation>> {
        match self {
            CacheValue::Annotations(annotations) => Some(annotations),
            CacheValue::Timestamp(_) => None,
        }
    }
}

pub trait SimpleCache {
    fn get(&self, key: &str) -> Result<Option<CacheValue>>;

    /// Store `value`; `false` when the backend declined the write.
    fn set(&self, key: &str, value: CacheValue) -> Result<bool>;
}

pub trait CacheProvider {
    fn fetch(&self, id: &str) -> Result<Option<CacheValue>>;

    fn contains(&self, id: &str) -> Result<bool>;

    /// Store `value` for `lifetime` seconds; `0` keeps it until evicted.
    fn save(&self, id: &str, value: CacheValue, lifetime: u64) -> Result<bool>;

    fn delete(&self, id: &str) -> Result<bool>;
}

impl<C: SimpleCache + ?Sized> SimpleCache for &C {
    fn get(&self, key: &str) -> Result<Option<CacheValue>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: CacheValue) -> Result<bool> {
        (**self).set(key, value)
    }
}

impl<C: SimpleCache + ?Sized> SimpleCache for Box<C> {
    fn get(&self, key: &str) -> Result<Option<CacheValue>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: CacheValue) -> Result<bool> {
        (**self).set(key, value)
    }
}

impl<P: CacheProvider + ?Sized> CacheProvider for &P {
    fn fetch(&self, id: &str) -> Result<Option<CacheValue>> {
        (**self).fetch(id)
    }

    fn contains(&self, id: &str) -> Result<bool> {
        (**self).contains(id)
    }

    fn save(&self, id: &str, value: CacheValue, lifetime: u64) -> Result<bool> {
        (**self).save(id, value, lifetime)
    }

    fn delete(&self, id: &str) -> Result<bool> {
        (**self).delete(id)
    }
}

/// Presents a `CacheProvider` as a `SimpleCache`. Entries never expire.
#[derive(Debug, Clone)]
pub struct ProviderCache<P> {
    provider: P,
}

impl<P: CacheProvider> ProviderCache<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn into_inner(self) -> P {
        self.provider
    }
}

impl<P: CacheProvider> SimpleCache for ProviderCache<P> {
    fn get(&self, key: &str) -> Result<Option<CacheValue>> {
        self.provider.fetch(key)
    }

    fn set(&self, key: &str, value: CacheValue) -> Result<bool> {
        self.provider.save(key, value, 0)
    }
}
