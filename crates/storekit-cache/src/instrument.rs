//! Call instrumentation.
//!
//! Interceptors wrap a cache operation: `before` hooks run in registration
//! order, `after` hooks in reverse, so the first interceptor registered is
//! the outermost one.

use crate::error::{CacheError, CacheResult};
use crate::store::KeyValueStore;
use async_trait::async_trait;
use std::fmt;

/// One call as seen by interceptors.
#[derive(Debug, Clone)]
pub struct Invocation<'a> {
    /// Qualified operation name, e.g. `Cache.store`.
    pub qualified_name: &'a str,
    /// Store key derived from the name (includes the cache prefix, if any).
    pub key: String,
    /// Rendered argument tuple, e.g. `('foo',)`.
    pub args: String,
}

/// Hooks run around an instrumented operation.
#[async_trait]
pub trait Interceptor: Send + Sync {
    async fn before(&self, _store: &dyn KeyValueStore, _call: &Invocation<'_>) -> CacheResult<()> {
        Ok(())
    }

    async fn after(
        &self,
        _store: &dyn KeyValueStore,
        _call: &Invocation<'_>,
        _output: &str,
    ) -> CacheResult<()> {
        Ok(())
    }
}

/// Counts invocations under the operation's key.
#[derive(Debug, Clone, Copy, Default)]
pub struct CountCalls;

#[async_trait]
impl Interceptor for CountCalls {
    async fn before(&self, store: &dyn KeyValueStore, call: &Invocation<'_>) -> CacheResult<()> {
        store.incr(&call.key, 1).await?;
        Ok(())
    }
}

/// Records rendered inputs and outputs in `<key>:inputs` / `<key>:outputs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CallHistory;

impl CallHistory {
    pub fn inputs_key(key: &str) -> String {
        format!("{key}:inputs")
    }

    pub fn outputs_key(key: &str) -> String {
        format!("{key}:outputs")
    }
}

#[async_trait]
impl Interceptor for CallHistory {
    async fn before(&self, store: &dyn KeyValueStore, call: &Invocation<'_>) -> CacheResult<()> {
        store
            .rpush(&Self::inputs_key(&call.key), call.args.as_bytes())
            .await?;
        Ok(())
    }

    async fn after(
        &self,
        store: &dyn KeyValueStore,
        call: &Invocation<'_>,
        output: &str,
    ) -> CacheResult<()> {
        store
            .rpush(&Self::outputs_key(&call.key), output.as_bytes())
            .await?;
        Ok(())
    }
}

/// Recorded history of one operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Replay {
    pub name: String,
    /// Counter value, which may exceed `calls.len()` if history was off for some calls.
    pub count: i64,
    /// `(input, output)` pairs in call order.
    pub calls: Vec<(String, String)>,
}

impl Replay {
    /// Load the history recorded under `key` for `name`.
    pub async fn load(store: &dyn KeyValueStore, name: &str, key: &str) -> CacheResult<Self> {
        let count = match store.get(key).await? {
            Some(raw) => crate::value::decode_int(raw)?,
            None => 0,
        };
        let inputs = store.lrange(&CallHistory::inputs_key(key), 0, -1).await?;
        let outputs = store.lrange(&CallHistory::outputs_key(key), 0, -1).await?;

        let calls = inputs
            .into_iter()
            .zip(outputs)
            .map(|(input, output)| Ok((utf8(input)?, utf8(output)?)))
            .collect::<CacheResult<Vec<_>>>()?;

        Ok(Self {
            name: name.to_string(),
            count,
            calls,
        })
    }
}

fn utf8(raw: Vec<u8>) -> CacheResult<String> {
    String::from_utf8(raw).map_err(|e| CacheError::decode("history entry", e))
}

impl fmt::Display for Replay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} was called {} times:", self.name, self.count)?;
        for (input, output) in &self.calls {
            write!(f, "\n{}(*{}) -> {}", self.name, input, output)?;
        }
        Ok(())
    }
}
