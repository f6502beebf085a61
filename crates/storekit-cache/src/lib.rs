//! Key-value cache with call instrumentation.
//!
//! [`Cache`] stores scalar values under generated UUID keys in a
//! [`KeyValueStore`] (Redis in production, [`MemoryStore`] in tests) and
//! counts every `store` call in the same store.
//!
//! ```no_run
//! # async fn demo() -> storekit_cache::CacheResult<()> {
//! use std::sync::Arc;
//! use storekit_cache::{Cache, RedisStore};
//!
//! let store = RedisStore::open("redis://127.0.0.1:6379/").await?;
//! let cache = Cache::new(Arc::new(store)).await?;
//! let key = cache.store("hello").await?;
//! assert_eq!(cache.get_str(&key).await?, Some("hello".to_string()));
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod error;
pub mod instrument;
pub mod store;
pub mod value;

pub use cache::{Cache, CacheOptions, FlushScope, STORE};
pub use error::{CacheError, CacheResult};
pub use instrument::{CallHistory, CountCalls, Interceptor, Invocation, Replay};
pub use store::{KeyValueStore, MemoryStore, RedisStore};
pub use value::CacheValue;
