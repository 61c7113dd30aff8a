//! Memory Store Module
//!
//! In-process stand-in for the remote store, following Redis semantics for
//! the commands the cache layer uses.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{CacheError, Result};
use crate::store::entry::{Slot, StoredEntry};
use crate::store::{Store, StoreValue};

const WRONG_TYPE: &str = "WRONGTYPE Operation against a key holding the wrong kind of value";

// == Memory Store ==
/// HashMap-backed store with lazy TTL expiration.
///
/// Expired entries are treated as absent on read and dropped on the next
/// write to the same key.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, StoredEntry>>,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // == Length ==
    /// Returns the number of live (unexpired) keys.
    pub async fn len(&self) -> usize {
        self.entries
            .read()
            .await
            .values()
            .filter(|entry| !entry.is_expired())
            .count()
    }

    // == Is Empty ==
    /// Returns true if no live key remains.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    // == Time To Live ==
    /// Remaining lifetime of `key`, None when absent or persistent.
    pub async fn ttl(&self, key: &str) -> Option<Duration> {
        self.entries
            .read()
            .await
            .get(key)
            .filter(|entry| !entry.is_expired())
            .and_then(StoredEntry::ttl_remaining)
    }
}

/// Drops `key` if its entry has expired, so writers see it as absent.
fn purge_expired(entries: &mut HashMap<String, StoredEntry>, key: &str) {
    if entries.get(key).is_some_and(StoredEntry::is_expired) {
        entries.remove(key);
    }
}

/// Resolves Redis-style inclusive list bounds against a list of `len` items.
fn range_bounds(len: usize, start: isize, stop: isize) -> Option<(usize, usize)> {
    let len = len as isize;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };

    if start >= len || start > stop {
        None
    } else {
        Some((start as usize, stop as usize))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn set(&self, key: &str, value: &StoreValue) -> Result<()> {
        let entry = StoredEntry::new(Slot::Value(value.to_bytes()), None);
        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(entry) if entry.is_expired() => Ok(None),
            Some(StoredEntry {
                slot: Slot::Value(bytes),
                ..
            }) => Ok(Some(bytes.clone())),
            Some(_) => Err(CacheError::StoreUnavailable(WRONG_TYPE.to_string())),
            None => Ok(None),
        }
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        let mut entries = self.entries.write().await;
        purge_expired(&mut entries, key);

        let entry = entries
            .entry(key.to_string())
            .or_insert_with(|| StoredEntry::new(Slot::Value(b"0".to_vec()), None));

        let Slot::Value(bytes) = &mut entry.slot else {
            return Err(CacheError::StoreUnavailable(WRONG_TYPE.to_string()));
        };

        let current: i64 = std::str::from_utf8(bytes.as_slice())
            .ok()
            .and_then(|text| text.parse().ok())
            .ok_or_else(|| {
                CacheError::StoreUnavailable(
                    "ERR value is not an integer or out of range".to_string(),
                )
            })?;
        let next = current.checked_add(1).ok_or_else(|| {
            CacheError::StoreUnavailable("ERR increment or decrement would overflow".to_string())
        })?;

        *bytes = next.to_string().into_bytes();
        debug!("INCR {} -> {}", key, next);
        Ok(next)
    }

    async fn rpush(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut entries = self.entries.write().await;
        purge_expired(&mut entries, key);

        let entry = entries
            .entry(key.to_string())
            .or_insert_with(|| StoredEntry::new(Slot::List(Vec::new()), None));

        match &mut entry.slot {
            Slot::List(items) => {
                items.push(value.to_vec());
                Ok(())
            }
            Slot::Value(_) => Err(CacheError::StoreUnavailable(WRONG_TYPE.to_string())),
        }
    }

    async fn lrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<Vec<u8>>> {
        let entries = self.entries.read().await;
        let items = match entries.get(key) {
            Some(entry) if entry.is_expired() => return Ok(Vec::new()),
            Some(StoredEntry {
                slot: Slot::List(items),
                ..
            }) => items,
            Some(_) => return Err(CacheError::StoreUnavailable(WRONG_TYPE.to_string())),
            None => return Ok(Vec::new()),
        };

        Ok(match range_bounds(items.len(), start, stop) {
            Some((first, last)) => items[first..=last].to_vec(),
            None => Vec::new(),
        })
    }

    async fn setex(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()> {
        if ttl.as_secs() == 0 {
            return Err(CacheError::StoreUnavailable(
                "ERR invalid expire time in 'setex' command".to_string(),
            ));
        }

        let ttl = Duration::from_secs(ttl.as_secs());
        let entry = StoredEntry::new(Slot::Value(value.to_vec()), Some(ttl));
        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    async fn flush_all(&self) -> Result<()> {
        let mut entries = self.entries.write().await;
        debug!("Flushing {} keys", entries.len());
        entries.clear();
        Ok(())
    }
}
