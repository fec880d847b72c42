use thiserror::Error;

/// Errors surfaced by `CachedClient::fetch`
///
/// Only rate limiting is recovered from inside the client; everything else is
/// handed to the caller unchanged.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server kept answering 429 until the attempt ceiling was reached
    #[error("Rate limit exceeded after {attempts} attempts")]
    RateLimitExceeded { attempts: u32 },

    /// The request never produced an HTTP response
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-2xx, non-429 status
    #[error("HTTP error: status {status}")]
    Http { status: u16 },

    /// A 2xx response body was not valid JSON
    #[error("Failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Network(err.to_string())
    }
}
