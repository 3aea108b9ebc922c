//! Errors raised by the rqs library

use thiserror::Error;

/// rqs errors
#[derive(Error, Debug)]
pub enum RqsError {
    /// Bad argument count or shape
    #[error("{0}")]
    Usage(String),

    #[error("rqs has no entry for {0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidOperation(String),

    #[error("Entry content needs at least one token")]
    EmptyContent,

    #[error("Invalid alias: {0}")]
    InvalidAlias(String),

    #[error("Corrupt entry {key}: {source}")]
    Codec {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RqsError {
    pub fn is_usage(&self) -> bool {
        matches!(self, RqsError::Usage(_))
    }
}

pub type Result<T> = std::result::Result<T, RqsError>;
