//! Redis store implementation.

use super::KeyValueStore;
use crate::error::CacheResult;
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use storekit_common_config::RedisConfig;
use tracing::debug;

/// Redis-backed store over a single multiplexed connection.
#[derive(Clone)]
pub struct RedisStore {
    connection: MultiplexedConnection,
}

impl RedisStore {
    /// Connect to the server at `url`.
    pub async fn open(url: &str) -> CacheResult<Self> {
        let client = redis::Client::open(url)?;
        let connection = client.get_multiplexed_async_connection().await?;
        debug!("Connected to Redis");
        Ok(Self { connection })
    }

    /// Connect using the configured URL.
    pub async fn connect(config: &RedisConfig) -> CacheResult<Self> {
        Self::open(&config.url).await
    }

    // Clones share the underlying socket.
    fn conn(&self) -> MultiplexedConnection {
        self.connection.clone()
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn flush_db(&self) -> CacheResult<()> {
        redis::cmd("FLUSHDB")
            .query_async::<_, ()>(&mut self.conn())
            .await?;
        debug!("Redis FLUSHDB");
        Ok(())
    }

    async fn delete_pattern(&self, pattern: &str) -> CacheResult<u64> {
        let mut conn = self.conn();
        let keys: Vec<String> = conn.keys(pattern).await?;

        if keys.is_empty() {
            return Ok(0);
        }

        let deleted: u64 = conn.del(&keys).await?;
        debug!(pattern = pattern, deleted = deleted, "Redis delete pattern");
        Ok(deleted)
    }

    async fn set(&self, key: &str, value: &[u8]) -> CacheResult<()> {
        self.conn().set::<_, _, ()>(key, value).await?;
        debug!(key = key, bytes = value.len(), "Redis set");
        Ok(())
    }

    async fn exists(&self, key: &str) -> CacheResult<bool> {
        Ok(self.conn().exists(key).await?)
    }

    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        let value: Option<Vec<u8>> = self.conn().get(key).await?;
        debug!(key = key, hit = value.is_some(), "Redis get");
        Ok(value)
    }

    async fn incr(&self, key: &str, delta: i64) -> CacheResult<i64> {
        Ok(self.conn().incr(key, delta).await?)
    }

    async fn rpush(&self, key: &str, value: &[u8]) -> CacheResult<u64> {
        Ok(self.conn().rpush(key, value).await?)
    }

    async fn lrange(&self, key: &str, start: isize, stop: isize) -> CacheResult<Vec<Vec<u8>>> {
        Ok(self.conn().lrange(key, start, stop).await?)
    }
}
