//! Redis Basic - instrumented caching over a remote key-value store
//!
//! Stores values under generated keys with call counting and replayable
//! call history, and caches fetched pages with access counting and expiry.

pub mod cache;
pub mod config;
pub mod error;
pub mod instrument;
pub mod proxy;
pub mod replay;
pub mod store;

pub use cache::{Cache, STORE_OPERATION};
pub use config::Config;
pub use error::{CacheError, Result};
pub use proxy::{Fetch, HttpFetcher, PageCache};
pub use replay::{print_replay, replay, Replay};
pub use store::{MemoryStore, RedisStore, Store, StoreValue};
