use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReaderError {
    #[error("failed to read annotations of {target}: {message}")]
    ReadFailed { target: String, message: String },
}

impl ReaderError {
    pub fn read_failed(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ReadFailed {
            target: target.into(),
            message: message.into(),
        }
    }
}
