//! Cache Facade Module
//!
//! Stores values under generated keys and reads them back typed.

use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{CacheError, Result};
use crate::instrument::{call_count, call_history, count_calls, Operation};
use crate::store::{Store, StoreValue};

/// Instrumentation identity of [`Cache::store`].
pub const STORE_OPERATION: Operation = Operation::new("Cache.store");

// == Cache ==
/// Typed cache facade over a shared store handle.
///
/// # Warning
/// Constructing a `Cache` flushes the **entire** backing database, not only
/// keys written by this facade. Anything else stored in the same database is
/// lost.
pub struct Cache<S: Store + ?Sized> {
    store: Arc<S>,
}

impl<S: Store + ?Sized> Cache<S> {
    // == Constructor ==
    /// Creates the facade and flushes every key of the backing database.
    pub async fn new(store: Arc<S>) -> Result<Self> {
        warn!("Flushing backing database before use");
        store.flush_all().await?;
        Ok(Self { store })
    }

    // == Store ==
    /// Writes `value` under a fresh random key and returns the key.
    ///
    /// Every call bumps the `Cache.store` counter and appends to its
    /// input/output history.
    pub async fn store(&self, value: impl Into<StoreValue>) -> Result<String> {
        let value = value.into();
        let store = self.store.as_ref();

        call_history(store, &STORE_OPERATION, &(&value,), || {
            count_calls(store, &STORE_OPERATION, || self.write_new(&value))
        })
        .await
    }

    async fn write_new(&self, value: &StoreValue) -> Result<String> {
        let key = Uuid::new_v4().to_string();
        self.store.set(&key, value).await?;
        debug!("Stored {} under {}", value, key);
        Ok(key)
    }

    // == Get ==
    /// Reads the raw bytes under `key`, `None` when absent.
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.store.get(key).await
    }

    /// Reads `key` and applies `converter` to the bytes when present.
    ///
    /// A converter error surfaces as [`CacheError::Conversion`]; an absent
    /// key is `Ok(None)` and never reaches the converter.
    pub async fn get_with<T, E, F>(&self, key: &str, converter: F) -> Result<Option<T>>
    where
        F: FnOnce(Vec<u8>) -> std::result::Result<T, E>,
        E: Display,
    {
        match self.get(key).await? {
            Some(bytes) => converter(bytes)
                .map(Some)
                .map_err(|err| CacheError::Conversion(format!("value at {}: {}", key, err))),
            None => Ok(None),
        }
    }

    /// Reads `key` as UTF-8 text.
    pub async fn get_str(&self, key: &str) -> Result<Option<String>> {
        self.get_with(key, String::from_utf8).await
    }

    /// Reads `key` as a decimal integer.
    pub async fn get_int(&self, key: &str) -> Result<Option<i64>> {
        self.get_with(key, |bytes| parse_number(&bytes)).await
    }

    /// Reads `key` as a floating point number.
    pub async fn get_float(&self, key: &str) -> Result<Option<f64>> {
        self.get_with(key, |bytes| parse_number(&bytes)).await
    }

    // == Calls ==
    /// Number of times [`Cache::store`] has been called against this database.
    pub async fn calls(&self) -> Result<u64> {
        call_count(self.store.as_ref(), &STORE_OPERATION).await
    }
}

/// Parses ASCII-whitespace-padded decimal text.
fn parse_number<T>(bytes: &[u8]) -> std::result::Result<T, String>
where
    T: FromStr,
    T::Err: Display,
{
    let text = std::str::from_utf8(bytes).map_err(|err| err.to_string())?;
    text.trim()
        .parse()
        .map_err(|err: T::Err| format!("{:?}: {}", text, err))
}
