//! Redis Store Module
//!
//! Production store client backed by a Redis server.
//!
//! ## Features
//! - Multiplexed connection shared by every clone of the store
//! - Automatic reconnection through the `redis` connection manager
//! - PING check with a bounded timeout when connecting

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{Client, RedisError};
use tokio::time::timeout;
use tracing::{info, warn};

use crate::error::{CacheError, Result};
use crate::store::{Store, StoreValue};

// == Redis Store ==
/// Store client talking to a Redis server.
///
/// Cloning is cheap: clones share the same multiplexed connection.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    // == Constructor ==
    /// Connects to Redis and verifies the connection with a PING.
    ///
    /// # Arguments
    /// * `url` - Redis connection URL (e.g., "redis://localhost:6379")
    /// * `connect_timeout` - Upper bound on connection establishment
    ///
    /// # Errors
    /// Returns `StoreUnavailable` if the URL is invalid, the server cannot be
    /// reached in time, or the PING reply is unexpected.
    pub async fn connect(url: &str, connect_timeout: Duration) -> Result<Self> {
        info!("Connecting to Redis at {}", url);

        let client = Client::open(url)?;

        let mut conn = timeout(connect_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| {
                CacheError::StoreUnavailable(format!(
                    "timed out connecting to {} after {}s",
                    url,
                    connect_timeout.as_secs()
                ))
            })??;

        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        if pong != "PONG" {
            return Err(CacheError::StoreUnavailable(format!(
                "unexpected PING reply from {}: {}",
                url, pong
            )));
        }

        info!("Redis connection established");
        Ok(Self { conn })
    }

    /// Returns a handle onto the shared connection.
    fn connection(&self) -> ConnectionManager {
        self.conn.clone()
    }
}

/// Logs a failed command and maps it into the cache error type.
fn command_failed<'a>(
    command: &'static str,
    key: &'a str,
) -> impl FnOnce(RedisError) -> CacheError + 'a {
    move |err| {
        warn!("Redis {} failed for {}: {}", command, key, err);
        CacheError::from(err)
    }
}

#[async_trait]
impl Store for RedisStore {
    async fn set(&self, key: &str, value: &StoreValue) -> Result<()> {
        redis::cmd("SET")
            .arg(key)
            .arg(value.to_bytes())
            .query_async::<()>(&mut self.connection())
            .await
            .map_err(command_failed("SET", key))
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        redis::cmd("GET")
            .arg(key)
            .query_async::<Option<Vec<u8>>>(&mut self.connection())
            .await
            .map_err(command_failed("GET", key))
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        redis::cmd("INCR")
            .arg(key)
            .query_async::<i64>(&mut self.connection())
            .await
            .map_err(command_failed("INCR", key))
    }

    async fn rpush(&self, key: &str, value: &[u8]) -> Result<()> {
        redis::cmd("RPUSH")
            .arg(key)
            .arg(value)
            .query_async::<()>(&mut self.connection())
            .await
            .map_err(command_failed("RPUSH", key))
    }

    async fn lrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<Vec<u8>>> {
        redis::cmd("LRANGE")
            .arg(key)
            .arg(start)
            .arg(stop)
            .query_async::<Vec<Vec<u8>>>(&mut self.connection())
            .await
            .map_err(command_failed("LRANGE", key))
    }

    async fn setex(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()> {
        redis::cmd("SETEX")
            .arg(key)
            .arg(ttl.as_secs())
            .arg(value)
            .query_async::<()>(&mut self.connection())
            .await
            .map_err(command_failed("SETEX", key))
    }

    async fn flush_all(&self) -> Result<()> {
        warn!("Flushing the selected Redis database");
        redis::cmd("FLUSHDB")
            .query_async::<()>(&mut self.connection())
            .await
            .map_err(command_failed("FLUSHDB", "*"))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_invalid_url() {
        let result = RedisStore::connect("not-a-redis-url", Duration::from_secs(1)).await;
        assert!(matches!(result, Err(CacheError::StoreUnavailable(_))));
    }

    #[tokio::test]
    async fn test_connect_unreachable_server() {
        // Port 1 is reserved and nothing listens on it
        let result = RedisStore::connect("redis://127.0.0.1:1", Duration::from_secs(2)).await;
        assert!(matches!(result, Err(CacheError::StoreUnavailable(_))));
    }
}
