//! Cached HTTP client
//!
//! Wraps a `Transport` with the response cache and the 429 retry loop.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use super::{FetchError, HttpTransport, RetryPolicy, Transport};
use crate::cache::ResponseCache;
use crate::config::ClientConfig;

/// Whether a fetch may use the response cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheMode {
    /// Serve a fresh cached entry if there is one, and cache successful responses
    #[default]
    Use,
    /// Always hit the network; never read or write the cache
    Bypass,
}

/// GET client for the catalog API with a TTL cache and rate-limit retries
#[derive(Debug, Clone)]
pub struct CachedClient {
    transport: Arc<dyn Transport>,
    cache: Arc<ResponseCache>,
    base_url: String,
    ttl: Duration,
    retry: RetryPolicy,
}

impl CachedClient {
    /// Creates a client using the reqwest transport described by `config`
    pub fn new(config: &ClientConfig) -> Result<Self, FetchError> {
        let transport = HttpTransport::new(config.timeout, &config.user_agent)?;
        Ok(Self::with_transport(Arc::new(transport), config))
    }

    /// Creates a client over a custom transport with an empty cache
    pub fn with_transport(transport: Arc<dyn Transport>, config: &ClientConfig) -> Self {
        Self {
            transport,
            cache: Arc::new(ResponseCache::new()),
            base_url: config.base_url.clone(),
            ttl: config.ttl,
            retry: config.retry,
        }
    }

    /// Replaces the response cache, e.g. to share one cache between clients
    pub fn with_cache(mut self, cache: Arc<ResponseCache>) -> Self {
        self.cache = cache;
        self
    }

    /// The response cache used by this client
    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    /// Fetches `path` (including its query string), using the cache
    pub async fn fetch(&self, path: &str) -> Result<Value, FetchError> {
        self.fetch_with(path, CacheMode::Use).await
    }

    /// Fetches `path` with an explicit cache mode
    ///
    /// # Behavior
    /// - With `CacheMode::Use`, a cached payload younger than the TTL is returned
    ///   without any network request
    /// - Otherwise the request is sent; a 429 is retried with backoff until the
    ///   retry policy's attempt ceiling is reached
    /// - A successful payload is cached (in `Use` mode) under the exact path,
    ///   overwriting any older entry
    /// - Any other failure is returned immediately and leaves the cache untouched
    pub async fn fetch_with(&self, path: &str, mode: CacheMode) -> Result<Value, FetchError> {
        if mode == CacheMode::Use {
            if let Some(value) = self.cache.get(path, self.ttl) {
                debug!(path, "cache hit");
                return Ok(value);
            }
        }

        let value = self.request_with_retry(path).await?;

        if mode == CacheMode::Use {
            debug!(path, "caching response");
            self.cache.put(path, value.clone());
        }

        Ok(value)
    }

    async fn request_with_retry(&self, path: &str) -> Result<Value, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        let mut attempts = 0;

        loop {
            let response = self.transport.get(&url).await?;
            attempts += 1;

            match response.status {
                200..=299 => return Ok(serde_json::from_str(&response.body)?),
                429 if self.retry.allows_retry(attempts) => {
                    let delay = self.retry.delay_for(attempts, response.retry_after);
                    warn!(
                        path,
                        attempts,
                        delay_ms = delay.as_millis() as u64,
                        "rate limited, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
                429 => {
                    warn!(path, attempts, "rate limit persisted, giving up");
                    return Err(FetchError::RateLimitExceeded { attempts });
                }
                status => {
                    debug!(path, status, "request failed");
                    return Err(FetchError::Http { status });
                }
            }
        }
    }
}
