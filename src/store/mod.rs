//! Store Module
//!
//! The key-value store contract consumed by the cache layer, with a Redis
//! client and an in-process stand-in.

mod entry;
mod memory;
mod redis_store;
mod value;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

// Re-export public types
pub use memory::MemoryStore;
pub use redis_store::RedisStore;
pub use value::StoreValue;

// == Store Trait ==
/// Remote key-value store operations used by the cache layer.
///
/// Persistence, atomic counters and expiration are the store's job. Every
/// failure surfaces as [`crate::error::CacheError::StoreUnavailable`].
#[async_trait]
pub trait Store: Send + Sync {
    /// Writes `value` under `key` with no expiration.
    async fn set(&self, key: &str, value: &StoreValue) -> Result<()>;

    /// Reads the raw bytes under `key`, `None` when absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Atomically increments the integer under `key`, treating absent as zero.
    async fn incr(&self, key: &str) -> Result<i64>;

    /// Appends `value` to the list under `key`.
    async fn rpush(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Returns list elements `start..=stop`; negative indices count from the end.
    async fn lrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<Vec<u8>>>;

    /// Writes `value` under `key`, expiring after `ttl` (whole seconds).
    async fn setex(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()>;

    /// Discards every key in the selected database.
    async fn flush_all(&self) -> Result<()>;
}
