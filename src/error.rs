//! Error types for the cache layer
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache layer.
///
/// An absent key is not an error: lookups return `Ok(None)` for it.
#[derive(Error, Debug)]
pub enum CacheError {
    /// A store command failed (connection, timeout, protocol or type error)
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// A converter rejected the bytes read back from the store
    #[error("Conversion failed: {0}")]
    Conversion(String),

    /// The page fetcher failed
    #[error("Fetch failed: {0}")]
    Fetch(String),
}

// == Conversions ==
impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        CacheError::StoreUnavailable(err.to_string())
    }
}

impl From<reqwest::Error> for CacheError {
    fn from(err: reqwest::Error) -> Self {
        CacheError::Fetch(err.to_string())
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache layer.
pub type Result<T> = std::result::Result<T, CacheError>;
