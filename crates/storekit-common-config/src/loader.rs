//! Configuration file loading and parsing.

use crate::env::{vars, Environment};
use crate::types::{FlushScope, StorekitConfig};
use regex::Regex;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// `${VAR}` or `${VAR:-default}`.
const ENV_REFERENCE: &str = r"\$\{([^}:]+)(?::-([^}]*))?\}";

/// Config loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read config: {source}")]
    ReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("invalid YAML at line {}: {message}", line.map(|l| l.to_string()).unwrap_or_else(|| "unknown".to_string()))]
    ParseError { line: Option<usize>, message: String },

    #[error("validation error: {message}")]
    ValidationError { message: String },

    #[error("environment variable not found: {var}")]
    EnvVarNotFound { var: String },
}

impl ConfigError {
    fn invalid(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }
}

/// Configuration loader rooted at a project directory.
pub struct ConfigLoader {
    base_path: PathBuf,
}

impl ConfigLoader {
    /// Create a loader for the given project directory.
    pub fn new(project_dir: impl AsRef<Path>) -> Self {
        Self {
            base_path: project_dir.as_ref().to_path_buf(),
        }
    }

    /// Path of the project config file.
    pub fn config_path(&self) -> PathBuf {
        self.base_path.join(".storekit/config.yaml")
    }

    /// Load configuration from `.storekit/config.yaml`, falling back to defaults.
    pub fn load(&self) -> Result<StorekitConfig, ConfigError> {
        let config_path = self.config_path();

        if !config_path.exists() {
            debug!(path = %config_path.display(), "No config file, using defaults");
            return self.finish(StorekitConfig::default());
        }

        self.load_file(&config_path)
    }

    /// Load configuration from an explicit file. The file must exist.
    pub fn load_file(&self, path: &Path) -> Result<StorekitConfig, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }

        debug!(path = %path.display(), "Loading config file");
        let contents = std::fs::read_to_string(path)?;
        let config = self.parse(&contents)?;
        self.finish(config)
    }

    /// Parse YAML after expanding environment references.
    pub fn parse(&self, contents: &str) -> Result<StorekitConfig, ConfigError> {
        let expanded = self.expand_env_vars(contents)?;

        // An empty document deserializes to unit, not to the defaulted struct.
        if expanded.trim().is_empty() {
            return Ok(StorekitConfig::default());
        }

        serde_yaml::from_str(&expanded).map_err(|e| ConfigError::ParseError {
            line: e.location().map(|l| l.line()),
            message: e.to_string(),
        })
    }

    fn finish(&self, mut config: StorekitConfig) -> Result<StorekitConfig, ConfigError> {
        apply_env_overrides(&mut config);
        validate(&config)?;
        Ok(config)
    }

    /// Expand environment variables in the form `${VAR}` or `${VAR:-default}`.
    fn expand_env_vars(&self, content: &str) -> Result<String, ConfigError> {
        let re = Regex::new(ENV_REFERENCE).map_err(|e| ConfigError::ParseError {
            line: None,
            message: e.to_string(),
        })?;
        let mut result = content.to_string();

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let value = match (Environment::get(var_name), cap.get(2)) {
                (Some(v), _) => v,
                (None, Some(default)) => default.as_str().to_string(),
                (None, None) => {
                    return Err(ConfigError::EnvVarNotFound {
                        var: var_name.to_string(),
                    })
                }
            };

            result = result.replace(&cap[0], &value);
        }

        Ok(result)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new(std::env::current_dir().unwrap_or_default())
    }
}

fn apply_env_overrides(config: &mut StorekitConfig) {
    if let Some(uri) = Environment::get(vars::STOREKIT_MONGO_URI) {
        config.mongo.uri = uri;
    }
    if let Some(url) = Environment::get(vars::STOREKIT_REDIS_URL) {
        config.redis.url = url;
    }
}

/// Validate configuration values.
pub fn validate(config: &StorekitConfig) -> Result<(), ConfigError> {
    let mongo = &config.mongo;
    if !(mongo.uri.starts_with("mongodb://") || mongo.uri.starts_with("mongodb+srv://")) {
        return Err(ConfigError::invalid(format!(
            "mongo.uri must use the mongodb:// or mongodb+srv:// scheme, got '{}'",
            mongo.uri
        )));
    }
    if mongo.database.is_empty() || mongo.collection.is_empty() {
        return Err(ConfigError::invalid(
            "mongo.database and mongo.collection must not be empty",
        ));
    }

    let url = &config.redis.url;
    if !["redis://", "rediss://", "redis+unix://", "unix://"]
        .iter()
        .any(|scheme| url.starts_with(scheme))
    {
        return Err(ConfigError::invalid(format!(
            "redis.url must be a redis:// URL, got '{url}'"
        )));
    }

    let prefix = config.cache.key_prefix.as_deref().unwrap_or_default();
    if config.cache.flush == FlushScope::Namespace && prefix.is_empty() {
        return Err(ConfigError::invalid(
            "cache.flush = namespace requires a non-empty cache.key_prefix",
        ));
    }

    Ok(())
}
