//! Configuration Module
//!
//! Handles loading client configuration from environment variables.

use std::env;
use std::time::Duration;

/// Default page cache TTL in seconds
pub const DEFAULT_PAGE_TTL: u64 = 10;

/// Client configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Redis connection URL
    pub redis_url: String,
    /// Lifetime of a cached page in seconds
    pub page_ttl: u64,
    /// Timeout in seconds for establishing the Redis connection
    pub connect_timeout: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `REDIS_URL` - Redis connection URL (default: redis://127.0.0.1:6379)
    /// - `PAGE_TTL` - Page cache TTL in seconds, at least 1 (default: 10)
    /// - `CONNECT_TIMEOUT` - Connect timeout in seconds (default: 5)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            redis_url: env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            page_ttl: env::var("PAGE_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&ttl| ttl >= 1)
                .unwrap_or(defaults.page_ttl),
            connect_timeout: env::var("CONNECT_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.connect_timeout),
        }
    }

    /// Page TTL as a Duration.
    pub fn page_ttl(&self) -> Duration {
        Duration::from_secs(self.page_ttl)
    }

    /// Connect timeout as a Duration.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            redis_url: "redis://127.0.0.1:6379".to_string(),
            page_ttl: DEFAULT_PAGE_TTL,
            connect_timeout: 5,
        }
    }
}
