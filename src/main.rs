//! Redis Basic - demo driver
//!
//! Connects to Redis, stores a few values through the cache facade and
//! prints the replay of `Cache.store`. When a URL is given as the first
//! argument it is fetched twice through the page cache.
//!
//! The cache facade flushes the selected Redis database on construction.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use redis_basic::{print_replay, Cache, Config, HttpFetcher, PageCache, RedisStore, STORE_OPERATION};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var.
    // Logs go to stderr so the replay on stdout stays clean.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "redis_basic=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: redis_url={}, page_ttl={}s, connect_timeout={}s",
        config.redis_url, config.page_ttl, config.connect_timeout
    );

    let store = Arc::new(
        RedisStore::connect(&config.redis_url, config.connect_timeout())
            .await
            .with_context(|| format!("connecting to {}", config.redis_url))?,
    );

    let cache = Cache::new(Arc::clone(&store)).await?;
    cache.store("foo").await?;
    cache.store("bar").await?;
    cache.store(42).await?;

    print_replay(store.as_ref(), &STORE_OPERATION).await?;

    if let Some(url) = std::env::args().nth(1) {
        let pages = PageCache::new(Arc::clone(&store), HttpFetcher::new())
            .with_ttl(config.page_ttl());

        for _ in 0..2 {
            let body = pages
                .get_page(&url)
                .await
                .with_context(|| format!("fetching {}", url))?;
            info!("Fetched {} ({} bytes)", url, body.len());
        }
        info!("{} accessed {} times", url, pages.access_count(&url).await?);
    }

    Ok(())
}
