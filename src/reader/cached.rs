//! Caching decorator around a `Reader`.
//!
//! Results are stored under a `CacheKey`; in debug mode each result is
//! paired with a marker (`[C]` + key) holding the latest modification time
//! of the class's dependency closure when the result was computed. A cached
//! result is trusted while its marker is at least the current latest
//! modification time.

use std::cell::RefCell;
use std::collections::HashMap;

use tracing::{debug, trace, warn};

use super::Reader;
use crate::annotation::Annotation;
use crate::cache::{CacheKey, CacheProvider, CacheValue, ProviderCache, SimpleCache};
use crate::error::Result;
use crate::reflection::Reflector;
use crate::timestamps::{last_modification, FileTimestamps, TimestampSource};

enum Lookup {
    Fresh(Vec<Annotation>),
    Stale { current: i64 },
    Missing,
}

pub struct CachedReader<R, C, X, T = FileTimestamps> {
    delegate: R,
    cache: C,
    reflector: X,
    timestamps: T,
    debug: bool,
    loaded: RefCell<HashMap<CacheKey, Vec<Annotation>>>,
}

impl<R, P, X> CachedReader<R, ProviderCache<P>, X>
where
    R: Reader,
    P: CacheProvider,
    X: Reflector,
{
    pub fn new(delegate: R, provider: P, reflector: X, debug: bool) -> Self {
        Self::from_simple_cache(delegate, ProviderCache::new(provider), reflector, debug)
    }
}

impl<R, C, X> CachedReader<R, C, X>
where
    R: Reader,
    C: SimpleCache,
    X: Reflector,
{
    pub fn from_simple_cache(delegate: R, cache: C, reflector: X, debug: bool) -> Self {
        Self {
            delegate,
            cache,
            reflector,
            timestamps: FileTimestamps,
            debug,
            loaded: RefCell::new(HashMap::new()),
        }
    }
}

impl<R, C, X, T> CachedReader<R, C, X, T>
where
    R: Reader,
    C: SimpleCache,
    X: Reflector,
    T: TimestampSource,
{
    /// Replace the source of modification times.
    pub fn with_timestamps<U: TimestampSource>(self, timestamps: U) -> CachedReader<R, C, X, U> {
        CachedReader {
            delegate: self.delegate,
            cache: self.cache,
            reflector: self.reflector,
            timestamps,
            debug: self.debug,
            loaded: self.loaded,
        }
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn delegate(&self) -> &R {
        &self.delegate
    }

    /// Forget results memoised by this reader; the cache is untouched.
    pub fn clear_loaded_annotations(&self) {
        self.loaded.borrow_mut().clear();
    }

    fn read<F>(&self, class: &str, key: CacheKey, compute: F) -> Result<Vec<Annotation>>
    where
        F: FnOnce(&R) -> Result<Vec<Annotation>>,
    {
        if let Some(annotations) = self.loaded.borrow().get(&key) {
            trace!(%key, "annotations already loaded");
            return Ok(annotations.clone());
        }

        let annotations = match self.fetch_from_cache(class, &key)? {
            Lookup::Fresh(annotations) => annotations,
            Lookup::Stale { current } => {
                debug!(%key, current, "cached annotations are stale");
                self.refresh(&key, current, compute)?
            }
            Lookup::Missing => {
                debug!(%key, "annotations not cached");
                let current = self.last_modification(class)?;
                self.refresh(&key, current, compute)?
            }
        };

        self.loaded.borrow_mut().insert(key, annotations.clone());
        Ok(annotations)
    }

    fn fetch_from_cache(&self, class: &str, key: &CacheKey) -> Result<Lookup> {
        let Some(annotations) = self
            .cache
            .get(key.as_str())?
            .and_then(CacheValue::into_annotations)
        else {
            return Ok(Lookup::Missing);
        };

        if !self.debug {
            trace!(%key, "using cached annotations without freshness check");
            return Ok(Lookup::Fresh(annotations));
        }

        let stored = self
            .cache
            .get(&key.marker())?
            .and_then(|value| value.as_timestamp());
        let current = self.last_modification(class)?;

        match stored {
            // Equal timestamps count as fresh.
            Some(stored) if stored >= current => {
                trace!(%key, stored, current, "cached annotations are fresh");
                Ok(Lookup::Fresh(annotations))
            }
            _ => Ok(Lookup::Stale { current }),
        }
    }

    fn refresh<F>(&self, key: &CacheKey, current: i64, compute: F) -> Result<Vec<Annotation>>
    where
        F: FnOnce(&R) -> Result<Vec<Annotation>>,
    {
        let annotations = compute(&self.delegate)?;

        let saved = self
            .cache
            .set(key.as_str(), CacheValue::Annotations(annotations.clone()))?;
        if !saved {
            warn!(%key, "cache refused annotations");
        }

        let marker = key.marker();
        if !self.cache.set(&marker, CacheValue::Timestamp(current))? {
            warn!(key = %marker, "cache refused modification marker");
        }

        Ok(annotations)
    }

    fn last_modification(&self, class: &str) -> Result<i64> {
        last_modification(&self.reflector, &self.timestamps, class)
    }
}

impl<R, C, X, T> Reader for CachedReader<R, C, X, T>
where
    R: Reader,
    C: SimpleCache,
    X: Reflector,
    T: TimestampSource,
{
    fn class_annotations(&self, class: &str) -> Result<Vec<Annotation>> {
        self.read(class, CacheKey::for_class(class), |reader| {
            reader.class_annotations(class)
        })
    }

    fn method_annotations(&self, class: &str, method: &str) -> Result<Vec<Annotation>> {
        self.read(class, CacheKey::for_method(class, method), |reader| {
            reader.method_annotations(class, method)
        })
    }

    fn property_annotations(&self, class: &str, property: &str) -> Result<Vec<Annotation>> {
        self.read(class, CacheKey::for_property(class, property), |reader| {
            reader.property_annotations(class, property)
        })
    }
}
