use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReflectionError {
    #[error("type not found: {name}")]
    TypeNotFound { name: String },

    #[error("method {class}::{method}() does not exist")]
    MethodNotFound { class: String, method: String },

    #[error("property {class}::${property} does not exist")]
    PropertyNotFound { class: String, property: String },

    #[error("type '{name}' is declared more than once")]
    DuplicateType { name: String },

    #[error("failed to parse type manifest '{path}': {message}")]
    ManifestParse { path: PathBuf, message: String },

    #[error("unsupported manifest format: {format} (expected json or yaml)")]
    UnsupportedManifestFormat { format: String },
}

impl ReflectionError {
    pub fn type_not_found(name: impl Into<String>) -> Self {
        Self::TypeNotFound { name: name.into() }
    }

    pub fn method_not_found(class: impl Into<String>, method: impl Into<String>) -> Self {
        Self::MethodNotFound {
            class: class.into(),
            method: method.into(),
        }
    }

    pub fn property_not_found(class: impl Into<String>, property: impl Into<String>) -> Self {
        Self::PropertyNotFound {
            class: class.into(),
            property: property.into(),
        }
    }

    pub fn duplicate_type(name: impl Into<String>) -> Self {
        Self::DuplicateType { name: name.into() }
    }

    pub fn manifest_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ManifestParse {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn unsupported_manifest_format(format: impl Into<String>) -> Self {
        Self::UnsupportedManifestFormat {
            format: format.into(),
        }
    }
}
