//! Fetch Module
//!
//! The page source wrapped by the page cache.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::Result;

// == Fetch Trait ==
/// Produces the text content of a URL.
///
/// Implementations report failures as [`crate::error::CacheError::Fetch`].
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

#[async_trait]
impl<T: Fetch + ?Sized> Fetch for Arc<T> {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.as_ref().fetch(url).await
    }
}

// == HTTP Fetcher ==
/// Fetches pages over HTTP with a GET request.
///
/// The body is returned whatever the status code; no retries.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Creates a fetcher with a default client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a fetcher reusing an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        debug!("GET {} -> {}", url, response.status());
        Ok(response.text().await?)
    }
}
