//! Page Cache Module
//!
//! Counts every access to a URL and serves its content from a short-lived
//! store entry, fetching only on a miss.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::DEFAULT_PAGE_TTL;
use crate::error::{CacheError, Result};
use crate::instrument::read_counter;
use crate::proxy::Fetch;
use crate::store::Store;

/// Key prefix of per-URL access counters
pub const COUNT_PREFIX: &str = "count:";

/// Key prefix of cached page content
pub const CACHED_PREFIX: &str = "cached:";

fn count_key(url: &str) -> String {
    format!("{}{}", COUNT_PREFIX, url)
}

fn cached_key(url: &str) -> String {
    format!("{}{}", CACHED_PREFIX, url)
}

// == Page Cache ==
/// Access-counted, expiring cache wrapped around a [`Fetch`] implementation.
///
/// Expiration is enforced by the store through `SETEX`; this type keeps no
/// local state.
pub struct PageCache<S: Store + ?Sized, F: Fetch> {
    store: Arc<S>,
    fetcher: F,
    ttl: Duration,
}

impl<S: Store + ?Sized, F: Fetch> PageCache<S, F> {
    // == Constructor ==
    /// Wraps `fetcher`, caching pages for the default 10 seconds.
    pub fn new(store: Arc<S>, fetcher: F) -> Self {
        Self {
            store,
            fetcher,
            ttl: Duration::from_secs(DEFAULT_PAGE_TTL),
        }
    }

    /// Sets how long a fetched page stays cached.
    ///
    /// The store expires keys in whole seconds, so `ttl` is truncated to
    /// seconds and raised to one second if shorter.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Duration::from_secs(ttl.as_secs().max(1));
        self
    }

    /// The configured page lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // == Get Page ==
    /// Returns the content of `url`, from cache when fresh.
    ///
    /// The access counter is bumped first, whether the call then hits,
    /// misses, or fails. On a miss the page is fetched and cached; a failed
    /// fetch leaves no cache entry behind.
    pub async fn get_page(&self, url: &str) -> Result<String> {
        let accesses = self.store.incr(&count_key(url)).await?;
        debug!("{} accessed {} times", url, accesses);

        if let Some(bytes) = self.store.get(&cached_key(url)).await? {
            debug!("Page cache hit for {}", url);
            return String::from_utf8(bytes).map_err(|err| {
                CacheError::Conversion(format!("cached page for {}: {}", url, err))
            });
        }

        debug!("Page cache miss for {}", url);
        let content = self.fetcher.fetch(url).await.map_err(|err| {
            warn!("Fetching {} failed: {}", url, err);
            err
        })?;

        self.store
            .setex(&cached_key(url), content.as_bytes(), self.ttl)
            .await?;
        Ok(content)
    }

    // == Access Count ==
    /// Number of times `url` has been requested through the cache.
    pub async fn access_count(&self, url: &str) -> Result<u64> {
        read_counter(self.store.as_ref(), &count_key(url)).await
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const URL: &str = "http://example.com/page";

    /// Fetcher returning a numbered body and counting its invocations.
    #[derive(Default)]
    struct CountingFetcher {
        calls: AtomicUsize,
    }

    impl CountingFetcher {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Fetch for CountingFetcher {
        async fn fetch(&self, url: &str) -> Result<String> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(format!("{} #{}", url, n))
        }
    }

    struct FailingFetcher;

    #[async_trait]
    impl Fetch for FailingFetcher {
        async fn fetch(&self, url: &str) -> Result<String> {
            Err(CacheError::Fetch(format!("connection refused: {}", url)))
        }
    }

    fn counting_cache() -> (
        Arc<MemoryStore>,
        Arc<CountingFetcher>,
        PageCache<MemoryStore, Arc<CountingFetcher>>,
    ) {
        let store = Arc::new(MemoryStore::new());
        let fetcher = Arc::new(CountingFetcher::default());
        let pages = PageCache::new(Arc::clone(&store), Arc::clone(&fetcher));
        (store, fetcher, pages)
    }

    #[test]
    fn test_keys() {
        assert_eq!(count_key(URL), "count:http://example.com/page");
        assert_eq!(cached_key(URL), "cached:http://example.com/page");
    }

    #[tokio::test]
    async fn test_default_ttl() {
        let (_, _, pages) = counting_cache();
        assert_eq!(pages.ttl(), Duration::from_secs(10));

        let pages = pages.with_ttl(Duration::from_secs(30));
        assert_eq!(pages.ttl(), Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_with_ttl_clamps_to_whole_seconds() {
        let (_, _, pages) = counting_cache();
        assert_eq!(pages.with_ttl(Duration::ZERO).ttl(), Duration::from_secs(1));

        let (_, _, pages) = counting_cache();
        assert_eq!(
            pages.with_ttl(Duration::from_millis(2500)).ttl(),
            Duration::from_secs(2)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_ttl_still_caches_fetched_page() {
        let (store, fetcher, pages) = counting_cache();
        let pages = pages.with_ttl(Duration::ZERO);

        let first = pages.get_page(URL).await.unwrap();
        assert_eq!(first, "http://example.com/page #1");
        assert_eq!(store.ttl(&cached_key(URL)).await, Some(Duration::from_secs(1)));

        assert_eq!(pages.get_page(URL).await.unwrap(), first);
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_call_served_from_cache() {
        let (store, fetcher, pages) = counting_cache();

        let first = pages.get_page(URL).await.unwrap();
        let second = pages.get_page(URL).await.unwrap();

        assert_eq!(first, "http://example.com/page #1");
        assert_eq!(second, first);
        assert_eq!(fetcher.calls(), 1);
        assert_eq!(pages.access_count(URL).await.unwrap(), 2);
        assert_eq!(store.ttl(&cached_key(URL)).await, Some(Duration::from_secs(10)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_refetch_after_expiry() {
        let (_, fetcher, pages) = counting_cache();

        pages.get_page(URL).await.unwrap();

        tokio::time::advance(Duration::from_secs(9)).await;
        assert_eq!(pages.get_page(URL).await.unwrap(), "http://example.com/page #1");
        assert_eq!(fetcher.calls(), 1);

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(pages.get_page(URL).await.unwrap(), "http://example.com/page #2");
        assert_eq!(fetcher.calls(), 2);

        // The refreshed entry lives for a full TTL again
        tokio::time::advance(Duration::from_secs(9)).await;
        assert_eq!(pages.get_page(URL).await.unwrap(), "http://example.com/page #2");
        assert_eq!(fetcher.calls(), 2);
        assert_eq!(pages.access_count(URL).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_urls_cached_independently() {
        let (_, fetcher, pages) = counting_cache();

        pages.get_page("http://a.test/").await.unwrap();
        pages.get_page("http://b.test/").await.unwrap();
        pages.get_page("http://a.test/").await.unwrap();

        assert_eq!(fetcher.calls(), 2);
        assert_eq!(pages.access_count("http://a.test/").await.unwrap(), 2);
        assert_eq!(pages.access_count("http://b.test/").await.unwrap(), 1);
        assert_eq!(pages.access_count("http://c.test/").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_fetch_failure_counts_but_does_not_cache() {
        let store = Arc::new(MemoryStore::new());
        let pages = PageCache::new(Arc::clone(&store), FailingFetcher);

        let result = pages.get_page(URL).await;

        assert!(matches!(result, Err(CacheError::Fetch(_))));
        assert_eq!(pages.access_count(URL).await.unwrap(), 1);
        assert_eq!(store.get(&cached_key(URL)).await.unwrap(), None);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_cached_entry_survives_fetcher_outage() {
        let store = Arc::new(MemoryStore::new());
        store
            .setex(&cached_key(URL), b"cached body", Duration::from_secs(10))
            .await
            .unwrap();

        let pages = PageCache::new(Arc::clone(&store), FailingFetcher);
        assert_eq!(pages.get_page(URL).await.unwrap(), "cached body");
    }
}
