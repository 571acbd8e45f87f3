use std::fmt;

use crate::reflection::{normalize_name, NAMESPACE_SEPARATOR};

/// Replaces the namespace separator in cache keys.
pub const KEY_DELIMITER: &str = ".";

/// Prefix of the companion key holding a result's modification marker.
pub const MARKER_PREFIX: &str = "[C]";

const METHOD_SEPARATOR: char = '#';
const PROPERTY_SEPARATOR: char = '$';

/// Cache key of an annotation result.
///
/// `App\Controller` maps to `App.Controller`, its method `index` to
/// `App.Controller#index` and its property `route` to `App.Controller$route`.
/// Other cache clients rely on this exact format.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn for_class(class: &str) -> Self {
        Self(encode(class))
    }

    pub fn for_method(class: &str, method: &str) -> Self {
        Self(format!("{}{METHOD_SEPARATOR}{method}", encode(class)))
    }

    pub fn for_property(class: &str, property: &str) -> Self {
        Self(format!("{}{PROPERTY_SEPARATOR}{property}", encode(class)))
    }

    /// Key of the modification marker stored next to this result.
    pub fn marker(&self) -> String {
        format!("{MARKER_PREFIX}{}", self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn encode(class: &str) -> String {
    normalize_name(class).replace(NAMESPACE_SEPARATOR, KEY_DELIMITER)
}
