//! The cache wrapper.

use crate::error::{CacheError, CacheResult};
use crate::instrument::{CallHistory, CountCalls, Interceptor, Invocation, Replay};
use crate::store::{escape_glob, KeyValueStore};
use crate::value::{decode_float, decode_int, decode_str, CacheValue};
use std::sync::Arc;
use storekit_common_config::CacheConfig;
use tracing::{debug, info};
use uuid::Uuid;

pub use storekit_common_config::FlushScope;

/// Qualified name under which `store` calls are counted.
pub const STORE: &str = "Cache.store";

/// Options for [`Cache::with_options`].
#[derive(Debug, Clone, PartialEq)]
pub struct CacheOptions {
    /// What to clear at construction.
    pub flush: FlushScope,
    /// Namespace applied to every key the cache touches.
    pub key_prefix: Option<String>,
    /// Record call inputs and outputs in addition to the counter.
    pub track_history: bool,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            flush: FlushScope::Database,
            key_prefix: None,
            track_history: true,
        }
    }
}

impl From<&CacheConfig> for CacheOptions {
    fn from(config: &CacheConfig) -> Self {
        Self {
            flush: config.flush,
            key_prefix: config.key_prefix.clone(),
            track_history: config.track_history,
        }
    }
}

/// Stores scalar values under generated keys in a key-value store.
pub struct Cache {
    store: Arc<dyn KeyValueStore>,
    key_prefix: Option<String>,
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache")
            .field("key_prefix", &self.key_prefix)
            .field("interceptors", &self.interceptors.len())
            .finish()
    }
}

impl Cache {
    /// Wrap `store`, flushing its whole active database first.
    ///
    /// Any data already in that database is destroyed.
    pub async fn new(store: Arc<dyn KeyValueStore>) -> CacheResult<Self> {
        Self::with_options(store, CacheOptions::default()).await
    }

    /// Wrap `store` with an explicit flush scope and optional key namespace.
    pub async fn with_options(
        store: Arc<dyn KeyValueStore>,
        options: CacheOptions,
    ) -> CacheResult<Self> {
        let key_prefix = options.key_prefix.filter(|prefix| !prefix.is_empty());

        match (options.flush, &key_prefix) {
            (FlushScope::Database, _) => {
                store.flush_db().await?;
                info!("Flushed cache database");
            }
            (FlushScope::Namespace, Some(prefix)) => {
                let deleted = store
                    .delete_pattern(&format!("{}:*", escape_glob(prefix)))
                    .await?;
                info!(prefix = %prefix, deleted = deleted, "Flushed cache namespace");
            }
            (FlushScope::Namespace, None) => {
                return Err(CacheError::InvalidOptions(
                    "namespace flush requires a key prefix".into(),
                ));
            }
            (FlushScope::None, _) => {}
        }

        let mut interceptors: Vec<Arc<dyn Interceptor>> = vec![Arc::new(CountCalls)];
        if options.track_history {
            interceptors.push(Arc::new(CallHistory));
        }

        Ok(Self {
            store,
            key_prefix,
            interceptors,
        })
    }

    /// Append an interceptor; it runs inside the ones already registered.
    pub fn with_interceptor(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    /// Namespace prefix, if any.
    pub fn key_prefix(&self) -> Option<&str> {
        self.key_prefix.as_deref()
    }

    fn key(&self, key: &str) -> String {
        match &self.key_prefix {
            Some(prefix) => format!("{prefix}:{key}"),
            None => key.to_string(),
        }
    }

    /// Store `data` under a fresh UUID v4 key and return the key.
    pub async fn store(&self, data: impl Into<CacheValue>) -> CacheResult<String> {
        let value = data.into();
        let call = Invocation {
            qualified_name: STORE,
            key: self.key(STORE),
            args: format!("({},)", value.repr()),
        };

        for interceptor in &self.interceptors {
            interceptor.before(self.store.as_ref(), &call).await?;
        }

        let key = Uuid::new_v4().to_string();
        self.store.set(&self.key(&key), &value.to_bytes()).await?;
        debug!(key = %key, "Stored value");

        for interceptor in self.interceptors.iter().rev() {
            interceptor.after(self.store.as_ref(), &call, &key).await?;
        }

        Ok(key)
    }

    /// Raw bytes stored under `key`; `None` when the key does not exist.
    pub async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        let key = self.key(key);
        if !self.store.exists(&key).await? {
            debug!(key = %key, "Cache miss");
            return Ok(None);
        }
        self.store.get(&key).await
    }

    /// Value under `key` passed through `transform`.
    pub async fn get_with<T, F>(&self, key: &str, transform: F) -> CacheResult<Option<T>>
    where
        F: FnOnce(Vec<u8>) -> CacheResult<T>,
    {
        self.get(key).await?.map(transform).transpose()
    }

    pub async fn get_str(&self, key: &str) -> CacheResult<Option<String>> {
        self.get_with(key, decode_str).await
    }

    pub async fn get_int(&self, key: &str) -> CacheResult<Option<i64>> {
        self.get_with(key, decode_int).await
    }

    pub async fn get_float(&self, key: &str) -> CacheResult<Option<f64>> {
        self.get_with(key, decode_float).await
    }

    /// How many times `qualified_name` was called; 0 if never.
    pub async fn call_count(&self, qualified_name: &str) -> CacheResult<i64> {
        match self.store.get(&self.key(qualified_name)).await? {
            Some(raw) => decode_int(raw),
            None => Ok(0),
        }
    }

    /// Recorded calls of `qualified_name`.
    pub async fn replay(&self, qualified_name: &str) -> CacheResult<Replay> {
        Replay::load(self.store.as_ref(), qualified_name, &self.key(qualified_name)).await
    }
}
