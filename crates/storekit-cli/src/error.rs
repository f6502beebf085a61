//! CLI error handling.

use std::io;
use std::process::ExitCode;

use storekit_cache::CacheError;
use storekit_common_config::ConfigError;
use storekit_common_log::LogError;
use storekit_documents::DocumentError;
use thiserror::Error;

/// Application exit codes
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Success = 0,
    GeneralError = 1,
    ConfigError = 2,
    IoError = 3,
    BackendError = 4,
    ValidationError = 5,
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        ExitCode::from(exit as u8)
    }
}

/// CLI error type
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        hint: Option<String>,
    },

    #[error("{message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    #[error("Document store error: {0}")]
    Document(#[from] DocumentError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("{message}")]
    Io {
        message: String,
        #[source]
        source: io::Error,
    },

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Get the error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config { .. } => "E001",
            Self::Io { .. } => "E002",
            Self::Document(_) => "E003",
            Self::Cache(_) => "E004",
            Self::Validation { .. } => "E005",
            Self::Other(_) => "E999",
        }
    }

    /// Get the exit status for this error
    pub fn exit(&self) -> Exit {
        match self {
            Self::Config { .. } => Exit::ConfigError,
            Self::Io { .. } => Exit::IoError,
            Self::Document(_) => Exit::BackendError,
            Self::Cache(CacheError::InvalidOptions(_)) => Exit::ConfigError,
            Self::Cache(CacheError::Decode { .. }) => Exit::ValidationError,
            Self::Cache(_) => Exit::BackendError,
            Self::Validation { .. } => Exit::ValidationError,
            Self::Other(_) => Exit::GeneralError,
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        self.exit().into()
    }

    /// Get hint for this error if available
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::Config { hint, .. } => hint.as_deref(),
            Self::Document(DocumentError::Mongo(_)) => {
                Some("Check that MongoDB is reachable at the configured uri (STOREKIT_MONGO_URI)")
            }
            Self::Cache(CacheError::Redis(_)) => {
                Some("Check that Redis is reachable at the configured url (STOREKIT_REDIS_URL)")
            }
            Self::Cache(CacheError::InvalidOptions(_)) => {
                Some("Set cache.key_prefix or choose a different cache.flush scope")
            }
            _ => None,
        }
    }

    /// Create a validation error for an argument
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Other(anyhow::anyhow!("JSON serialization failed: {err}"))
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config {
            message: format!("Configuration error: {err}"),
            source: Some(Box::new(err)),
            hint: Some("Check .storekit/config.yaml or the file passed with --config".to_string()),
        }
    }
}

impl From<LogError> for CliError {
    fn from(err: LogError) -> Self {
        Self::Config {
            message: format!("Logging setup failed: {err}"),
            source: Some(Box::new(err)),
            hint: Some("Check STOREKIT_LOG_FILE".to_string()),
        }
    }
}
