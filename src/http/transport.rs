//! Raw GET transport
//!
//! The transport performs exactly one request and reports what came back. It
//! knows nothing about caching or retries.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, ACCEPT, RETRY_AFTER};
use reqwest::Client;
use tracing::debug;

use super::FetchError;

/// The parts of an HTTP response the cached client acts on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Delay requested through a `Retry-After: <seconds>` header
    pub retry_after: Option<Duration>,
    /// Response body as text
    pub body: String,
}

impl RawResponse {
    /// Builds a response with the given status and body and no `Retry-After`
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            retry_after: None,
            body: body.into(),
        }
    }

    /// Sets the `Retry-After` delay
    pub fn with_retry_after(mut self, retry_after: Duration) -> Self {
        self.retry_after = Some(retry_after);
        self
    }
}

/// Performs a single GET request
///
/// Implementations return `Ok` for every HTTP response, whatever its status,
/// and `Err(FetchError::Network)` only when no response was received.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    async fn get(&self, url: &str) -> Result<RawResponse, FetchError>;
}

/// Transport backed by a `reqwest::Client`
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport with an explicit request timeout and user agent
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<RawResponse, FetchError> {
        debug!(url, "API request");

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status().as_u16();
        let retry_after = parse_retry_after(response.headers().get(RETRY_AFTER));
        let body = response.text().await?;

        debug!(url, status, bytes = body.len(), "API response");

        Ok(RawResponse {
            status,
            retry_after,
            body,
        })
    }
}

/// Parses a `Retry-After` header given in whole seconds
///
/// The HTTP-date form is not supported and yields `None`, which makes the
/// caller fall back to exponential backoff.
fn parse_retry_after(value: Option<&HeaderValue>) -> Option<Duration> {
    let seconds = value?.to_str().ok()?.trim().parse::<u64>().ok()?;
    Some(Duration::from_secs(seconds))
}
