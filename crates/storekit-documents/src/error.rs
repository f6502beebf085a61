//! Error types for document store operations.

use thiserror::Error;

/// Result type for document store operations.
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Errors surfaced by collection backends.
///
/// Driver errors are carried unchanged; nothing here retries or recovers.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<mongodb::bson::de::Error> for DocumentError {
    fn from(err: mongodb::bson::de::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
