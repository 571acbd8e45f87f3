use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

use super::{CacheValue, SimpleCache};
use crate::error::{CacheError, Result};

const ENTRY_EXTENSION: &str = "json";

#[derive(Debug, Serialize, Deserialize)]
struct StoredEntry {
    key: String,
    value: CacheValue,
}

/// `SimpleCache` keeping one JSON file per key in a directory.
///
/// Files are named after the SHA-256 of the key, so any key is safe to use
/// as-is. The directory is created on first write.
#[derive(Debug, Clone)]
pub struct FilesystemCache {
    dir: PathBuf,
}

impl FilesystemCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `$HOME/.cache/annotation-reader`
    pub fn default_dir() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .map_err(|_| CacheError::backend("could not determine home directory"))?;

        Ok(PathBuf::from(home)
            .join(".cache")
            .join("annotation-reader"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        let digest = Sha256::digest(key.as_bytes());
        self.dir.join(format!("{digest:x}.{ENTRY_EXTENSION}"))
    }

    /// Remove every entry file; returns how many were removed.
    pub fn clear(&self) -> Result<usize> {
        if !self.dir.exists() {
            return Ok(0);
        }

        let mut removed = 0;
        for entry in WalkDir::new(&self.dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(&self.dir).to_path_buf();
                CacheError::io(path, e.into())
            })?;

            let path = entry.path();
            let is_entry = entry.file_type().is_file()
                && path.extension().is_some_and(|ext| ext == ENTRY_EXTENSION);
            if is_entry {
                fs::remove_file(path).map_err(|e| CacheError::io(path, e))?;
                removed += 1;
            }
        }

        debug!(dir = %self.dir.display(), removed, "cleared filesystem cache");
        Ok(removed)
    }
}

impl SimpleCache for FilesystemCache {
    fn get(&self, key: &str) -> Result<Option<CacheValue>> {
        let path = self.entry_path(key);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CacheError::io(&path, e).into()),
        };

        let stored: StoredEntry = serde_json::from_str(&content)
            .map_err(|e| CacheError::deserialize(key, e.to_string()))?;

        if stored.key != key {
            trace!(key, stored = %stored.key, "cache file belongs to another key");
            return Ok(None);
        }

        Ok(Some(stored.value))
    }

    fn set(&self, key: &str, value: CacheValue) -> Result<bool> {
        fs::create_dir_all(&self.dir).map_err(|e| CacheError::io(&self.dir, e))?;

        let stored = StoredEntry {
            key: key.to_string(),
            value,
        };
        let content = serde_json::to_string(&stored)
            .map_err(|e| CacheError::serialize(key, e.to_string()))?;

        let path = self.entry_path(key);
        fs::write(&path, content).map_err(|e| CacheError::io(&path, e))?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::Annotation;
    use crate::error::Error;
    use tempfile::TempDir;

    #[test]
    fn test_set_then_get() {
        let temp_dir = TempDir::new().unwrap();
        let cache = FilesystemCache::new(temp_dir.path().join("cache"));
        let value = CacheValue::Annotations(vec![
            Annotation::new("Route").with_value("pattern", "/someprefix")
        ]);

        assert_eq!(cache.get("App.Controller").unwrap(), None);
        assert!(cache.set("App.Controller", value.clone()).unwrap());
        assert_eq!(cache.get("App.Controller").unwrap(), Some(value));
    }

    #[test]
    fn test_entries_survive_new_instance() {
        let temp_dir = TempDir::new().unwrap();
        FilesystemCache::new(temp_dir.path())
            .set("[C]App.Controller", CacheValue::Timestamp(1234))
            .unwrap();

        let reopened = FilesystemCache::new(temp_dir.path());
        assert_eq!(
            reopened.get("[C]App.Controller").unwrap(),
            Some(CacheValue::Timestamp(1234))
        );
    }

    #[test]
    fn test_corrupt_entry_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let cache = FilesystemCache::new(temp_dir.path());
        fs::write(cache.entry_path("App.Controller"), "not json").unwrap();

        let err = cache.get("App.Controller").unwrap_err();
        assert!(matches!(
            err,
            Error::Cache(CacheError::Deserialize { ref key, .. }) if key == "App.Controller"
        ));
    }

    #[test]
    fn test_clear_removes_entries_only() {
        let temp_dir = TempDir::new().unwrap();
        let cache = FilesystemCache::new(temp_dir.path());
        cache.set("a", CacheValue::Timestamp(1)).unwrap();
        cache.set("b", CacheValue::Timestamp(2)).unwrap();
        fs::write(temp_dir.path().join("README"), "keep me").unwrap();

        assert_eq!(cache.clear().unwrap(), 2);
        assert_eq!(cache.get("a").unwrap(), None);
        assert!(temp_dir.path().join("README").exists());
    }

    #[test]
    fn test_clear_missing_dir() {
        let cache = FilesystemCache::new("/nonexistent/annotation-cache");
        assert_eq!(cache.clear().unwrap(), 0);
    }
}
