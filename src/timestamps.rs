//! Modification times of declared types.
//!
//! A cached annotation result stays valid only while nothing in its type's
//! dependency closure changed after it was written, so the cache layer asks
//! a `TimestampSource` for the modification time of every type involved.

use std::collections::HashMap;
use std::fs;
use std::time::UNIX_EPOCH;

use tracing::trace;

use crate::error::{IoError, Result};
use crate::reflection::{dependency_closure, normalize_name, Reflector, TypeDescriptor};

pub trait TimestampSource {
    /// Seconds since the epoch at which `ty` was last modified.
    fn modified_at(&self, ty: &TypeDescriptor) -> Result<i64>;
}

/// Reads the modification time of each type's declaring file.
///
/// Types without a declaring file report `0`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileTimestamps;

impl TimestampSource for FileTimestamps {
    fn modified_at(&self, ty: &TypeDescriptor) -> Result<i64> {
        let Some(path) = ty.source.as_deref() else {
            return Ok(0);
        };

        let modified = fs::metadata(path)
            .and_then(|metadata| metadata.modified())
            .map_err(|e| IoError::modification_time(path, e))?;

        // Files dated before the epoch count as never modified.
        let seconds = modified
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or(0);

        Ok(i64::try_from(seconds).unwrap_or(i64::MAX))
    }
}

/// Fixed modification times by type name. Unknown types report `0`.
#[derive(Debug, Default, Clone)]
pub struct FixedTimestamps {
    times: HashMap<String, i64>,
}

impl FixedTimestamps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, timestamp: i64) -> Self {
        self.set(name, timestamp);
        self
    }

    pub fn set(&mut self, name: &str, timestamp: i64) {
        self.times.insert(normalize_name(name).to_string(), timestamp);
    }
}

impl TimestampSource for FixedTimestamps {
    fn modified_at(&self, ty: &TypeDescriptor) -> Result<i64> {
        Ok(self.times.get(&ty.name).copied().unwrap_or(0))
    }
}

/// Latest modification time across `name` and its whole dependency closure.
///
/// Every type in the closure is consulted; the result never depends on the
/// order in which the closure was walked.
pub fn last_modification<R, T>(reflector: &R, timestamps: &T, name: &str) -> Result<i64>
where
    R: Reflector + ?Sized,
    T: TimestampSource + ?Sized,
{
    let mut latest = 0;
    for ty in dependency_closure(reflector, name)? {
        let modified = timestamps.modified_at(ty)?;
        trace!(name = %ty.name, modified, "dependency modification time");
        latest = latest.max(modified);
    }
    Ok(latest)
}
