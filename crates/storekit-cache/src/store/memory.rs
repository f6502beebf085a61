//! In-memory store implementation.

use super::KeyValueStore;
use crate::error::{CacheError, CacheResult};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry as MapEntry;
use dashmap::DashMap;
use glob::Pattern;
use tracing::debug;

const WRONG_TYPE: &str = "WRONGTYPE Operation against a key holding the wrong kind of value";

enum Entry {
    Bytes(Vec<u8>),
    List(Vec<Vec<u8>>),
}

/// Process-local store with Redis string and list semantics.
///
/// Used by tests and by the CLI's `--memory` mode.
#[derive(Default)]
pub struct MemoryStore {
    entries: DashMap<String, Entry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn wrong_type() -> CacheError {
    CacheError::Backend(WRONG_TYPE.to_string())
}

fn compile_pattern(pattern: &str) -> CacheResult<Pattern> {
    Pattern::new(pattern)
        .map_err(|e| CacheError::Backend(format!("ERR invalid pattern {pattern:?}: {e}")))
}

/// Resolve `LRANGE` bounds against a list of `len` items.
fn range_bounds(len: usize, start: isize, stop: isize) -> Option<(usize, usize)> {
    let len = len as isize;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };

    if start > stop || start >= len {
        None
    } else {
        Some((start as usize, stop as usize))
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn flush_db(&self) -> CacheResult<()> {
        self.entries.clear();
        debug!("Memory store flushed");
        Ok(())
    }

    async fn delete_pattern(&self, pattern: &str) -> CacheResult<u64> {
        let matcher = compile_pattern(pattern)?;
        let keys: Vec<String> = self
            .entries
            .iter()
            .filter(|entry| matcher.matches(entry.key()))
            .map(|entry| entry.key().clone())
            .collect();

        let mut deleted = 0;
        for key in keys {
            if self.entries.remove(&key).is_some() {
                deleted += 1;
            }
        }
        debug!(pattern = pattern, deleted = deleted, "Memory delete pattern");
        Ok(deleted)
    }

    async fn set(&self, key: &str, value: &[u8]) -> CacheResult<()> {
        self.entries
            .insert(key.to_string(), Entry::Bytes(value.to_vec()));
        Ok(())
    }

    async fn exists(&self, key: &str) -> CacheResult<bool> {
        Ok(self.entries.contains_key(key))
    }

    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        match self.entries.get(key).as_deref() {
            Some(Entry::Bytes(value)) => Ok(Some(value.clone())),
            Some(Entry::List(_)) => Err(wrong_type()),
            None => Ok(None),
        }
    }

    async fn incr(&self, key: &str, delta: i64) -> CacheResult<i64> {
        match self.entries.entry(key.to_string()) {
            MapEntry::Occupied(mut occupied) => {
                let Entry::Bytes(raw) = occupied.get() else {
                    return Err(wrong_type());
                };
                let current: i64 = std::str::from_utf8(raw)
                    .ok()
                    .and_then(|text| text.parse().ok())
                    .ok_or_else(|| {
                        CacheError::Backend("ERR value is not an integer or out of range".into())
                    })?;
                let next = current.checked_add(delta).ok_or_else(|| {
                    CacheError::Backend("ERR increment or decrement would overflow".into())
                })?;
                occupied.insert(Entry::Bytes(next.to_string().into_bytes()));
                Ok(next)
            }
            MapEntry::Vacant(vacant) => {
                vacant.insert(Entry::Bytes(delta.to_string().into_bytes()));
                Ok(delta)
            }
        }
    }

    async fn rpush(&self, key: &str, value: &[u8]) -> CacheResult<u64> {
        let mut entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::List(Vec::new()));
        match entry.value_mut() {
            Entry::List(items) => {
                items.push(value.to_vec());
                Ok(items.len() as u64)
            }
            Entry::Bytes(_) => Err(wrong_type()),
        }
    }

    async fn lrange(&self, key: &str, start: isize, stop: isize) -> CacheResult<Vec<Vec<u8>>> {
        match self.entries.get(key).as_deref() {
            Some(Entry::List(items)) => Ok(range_bounds(items.len(), start, stop)
                .map(|(from, to)| items[from..=to].to_vec())
                .unwrap_or_default()),
            Some(Entry::Bytes(_)) => Err(wrong_type()),
            None => Ok(Vec::new()),
        }
    }
}
