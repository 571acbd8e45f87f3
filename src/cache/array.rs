use std::cell::RefCell;
use std::collections::HashMap;
use std::time::{Duration, SystemTime};

use super::{CacheProvider, CacheValue};
use crate::error::Result;

#[derive(Debug, Clone)]
struct CacheEntry {
    value: CacheValue,
    expires_at: Option<SystemTime>,
}

impl CacheEntry {
    fn is_live(&self, now: SystemTime) -> bool {
        self.expires_at.map_or(true, |expires_at| expires_at > now)
    }
}

/// Process-local `CacheProvider` backed by a hash map.
#[derive(Debug, Default)]
pub struct ArrayCache {
    entries: RefCell<HashMap<String, CacheEntry>>,
}

impl ArrayCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn flush_all(&self) {
        self.entries.borrow_mut().clear();
    }

    fn live_entry(&self, id: &str) -> Option<CacheValue> {
        let now = SystemTime::now();
        let mut entries = self.entries.borrow_mut();
        let entry = entries.get(id)?;
        if entry.is_live(now) {
            return Some(entry.value.clone());
        }

        entries.remove(id);
        None
    }
}

impl CacheProvider for ArrayCache {
    fn fetch(&self, id: &str) -> Result<Option<CacheValue>> {
        Ok(self.live_entry(id))
    }

    fn contains(&self, id: &str) -> Result<bool> {
        Ok(self.live_entry(id).is_some())
    }

    fn save(&self, id: &str, value: CacheValue, lifetime: u64) -> Result<bool> {
        let expires_at =
            (lifetime > 0).then(|| SystemTime::now() + Duration::from_secs(lifetime));
        self.entries
            .borrow_mut()
            .insert(id.to_string(), CacheEntry { value, expires_at });
        Ok(true)
    }

    fn delete(&self, id: &str) -> Result<bool> {
        self.entries.borrow_mut().remove(id);
        Ok(true)
    }
}
