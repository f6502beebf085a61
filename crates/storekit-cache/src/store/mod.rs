//! Key-value store backends.

pub mod memory;
pub mod redis;

use crate::error::CacheResult;
use async_trait::async_trait;

pub use self::memory::MemoryStore;
pub use self::redis::RedisStore;

/// The store commands the cache relies on. Each maps to one Redis command.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// `FLUSHDB`: remove every key in the selected database.
    async fn flush_db(&self) -> CacheResult<()>;

    /// Delete every key matching a glob pattern; returns how many were removed.
    async fn delete_pattern(&self, pattern: &str) -> CacheResult<u64>;

    /// `SET key value`.
    async fn set(&self, key: &str, value: &[u8]) -> CacheResult<()>;

    /// `EXISTS key`.
    async fn exists(&self, key: &str) -> CacheResult<bool>;

    /// `GET key`.
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>>;

    /// `INCRBY key delta`; a missing key counts from zero.
    async fn incr(&self, key: &str, delta: i64) -> CacheResult<i64>;

    /// `RPUSH key value`; returns the new list length.
    async fn rpush(&self, key: &str, value: &[u8]) -> CacheResult<u64>;

    /// `LRANGE key start stop` with Redis index semantics (negative counts from the end).
    async fn lrange(&self, key: &str, start: isize, stop: isize) -> CacheResult<Vec<Vec<u8>>>;
}

/// Escape glob metacharacters so `literal` matches only itself.
///
/// Uses bracket classes, which Redis `KEYS` and [`glob::Pattern`] read the same way.
pub fn escape_glob(literal: &str) -> String {
    let mut escaped = String::with_capacity(literal.len());
    for c in literal.chars() {
        match c {
            '*' => escaped.push_str("[*]"),
            '?' => escaped.push_str("[?]"),
            '[' => escaped.push_str("[[]"),
            '\\' => escaped.push_str("[\\\\]"),
            _ => escaped.push(c),
        }
    }
    escaped
}
