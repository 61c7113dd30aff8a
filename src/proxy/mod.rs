//! Proxy Module
//!
//! Expiring, access-counted cache in front of a page fetcher.

mod fetch;
mod page_cache;

// Re-export public types
pub use fetch::{Fetch, HttpFetcher};
pub use page_cache::{PageCache, CACHED_PREFIX, COUNT_PREFIX};
