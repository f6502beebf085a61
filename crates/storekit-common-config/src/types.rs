//! Configuration types.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorekitConfig {
    /// Document store connection.
    pub mongo: MongoConfig,
    /// Key-value store connection.
    pub redis: RedisConfig,
    /// Cache wrapper behaviour.
    pub cache: CacheConfig,
}

/// MongoDB connection and target collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MongoConfig {
    /// Connection string.
    pub uri: String,
    /// Database name.
    pub database: String,
    /// Collection the helpers operate on.
    pub collection: String,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            uri: "mongodb://127.0.0.1:27017".to_string(),
            database: "my_db".to_string(),
            collection: "school".to_string(),
        }
    }
}

/// Redis connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    /// Connection URL.
    pub url: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379/".to_string(),
        }
    }
}

/// What a cache clears when it is constructed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlushScope {
    /// `FLUSHDB`: every key in the selected database, including other clients' keys.
    #[default]
    Database,
    /// Only keys under the cache's key prefix.
    Namespace,
    /// Nothing.
    None,
}

/// Cache wrapper configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Flush performed at construction.
    pub flush: FlushScope,
    /// Prefix applied to every key the cache writes.
    pub key_prefix: Option<String>,
    /// Record inputs and outputs of `store` calls.
    pub track_history: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            flush: FlushScope::Database,
            key_prefix: None,
            track_history: true,
        }
    }
}
