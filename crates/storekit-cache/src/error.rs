//! Cache error types.

use thiserror::Error;

/// Cache operation result.
pub type CacheResult<T> = Result<T, CacheError>;

/// Cache errors.
///
/// Store failures are carried unchanged. A missing key is never an error.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error(transparent)]
    Redis(#[from] redis::RedisError),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Cannot decode value as {expected}: {reason}")]
    Decode {
        expected: &'static str,
        reason: String,
    },

    #[error("Invalid cache options: {0}")]
    InvalidOptions(String),
}

impl CacheError {
    pub(crate) fn decode(expected: &'static str, reason: impl ToString) -> Self {
        Self::Decode {
            expected,
            reason: reason.to_string(),
        }
    }
}
