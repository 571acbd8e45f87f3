use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("failed to access cache entry '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize cache entry '{key}': {message}")]
    Serialize { key: String, message: String },

    #[error("failed to deserialize cache entry '{key}': {message}")]
    Deserialize { key: String, message: String },

    #[error("cache backend error: {message}")]
    Backend { message: String },
}

impl CacheError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn serialize(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Serialize {
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn deserialize(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Deserialize {
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}
