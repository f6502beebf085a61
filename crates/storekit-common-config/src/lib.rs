//! Configuration types for storekit.
//!
//! Configuration lives in `.storekit/config.yaml`. Every section is optional
//! and `${VAR}` / `${VAR:-default}` references are expanded before parsing.

pub mod env;
pub mod loader;
pub mod types;

pub use env::*;
pub use loader::*;
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_sensible_values() {
        let config = StorekitConfig::default();

        assert_eq!(config.mongo.uri, "mongodb://127.0.0.1:27017");
        assert_eq!(config.mongo.database, "my_db");
        assert_eq!(config.mongo.collection, "school");
        assert_eq!(config.redis.url, "redis://127.0.0.1:6379/");
        assert_eq!(config.cache.flush, FlushScope::Database);
        assert!(config.cache.key_prefix.is_none());
        assert!(config.cache.track_history);
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_config_serializes_to_yaml() {
        let yaml = serde_yaml::to_string(&StorekitConfig::default()).unwrap();

        assert!(yaml.contains("mongo:"));
        assert!(yaml.contains("redis:"));
        assert!(yaml.contains("cache:"));
        assert!(yaml.contains("flush: database"));
        assert!(yaml.contains("collection: school"));
    }

    #[test]
    fn test_flush_scope_uses_snake_case() {
        let scope: FlushScope = serde_yaml::from_str("namespace").unwrap();
        assert_eq!(scope, FlushScope::Namespace);
        assert_eq!(serde_yaml::to_string(&FlushScope::None).unwrap().trim(), "none");
    }
}
