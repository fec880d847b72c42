//! Client configuration
//!
//! Defaults match the public Jikan v4 API. Values can be overridden from the
//! environment (optionally through a `.env` file) and from CLI flags.

use std::time::Duration;

use thiserror::Error;

use crate::http::RetryPolicy;

/// Base URL of the Jikan v4 API
pub const DEFAULT_BASE_URL: &str = "https://api.jikan.moe/v4";

/// How long a cached response stays fresh
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Transport timeout for a single request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

const ENV_BASE_URL: &str = "ANIMECAT_BASE_URL";
const ENV_CACHE_TTL_SECS: &str = "ANIMECAT_CACHE_TTL_SECS";
const ENV_TIMEOUT_SECS: &str = "ANIMECAT_TIMEOUT_SECS";
const ENV_MAX_ATTEMPTS: &str = "ANIMECAT_MAX_ATTEMPTS";

/// Errors raised while reading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable held a value that could not be parsed
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },

    /// A `.env` file exists but could not be read or parsed
    #[error("Failed to load .env file: {0}")]
    DotEnv(#[from] dotenvy::Error),
}

/// Settings for the cached catalog client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API base URL without a trailing slash
    pub base_url: String,
    /// Freshness window of cached responses
    pub ttl: Duration,
    /// Transport timeout per request
    pub timeout: Duration,
    /// Retry behaviour for rate-limited requests
    pub retry: RetryPolicy,
    /// Value of the `User-Agent` header
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            ttl: DEFAULT_CACHE_TTL,
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
            user_agent: concat!("animecat/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    /// Reads configuration from the process environment
    ///
    /// A `.env` file in the working directory is loaded first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        accept_missing_dotenv(dotenvy::dotenv().map(|_| ()))?;
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_BASE_URL) {
            config = config.with_base_url(url);
        }
        if let Some(secs) = parse_var(&lookup, ENV_CACHE_TTL_SECS)? {
            config.ttl = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_var(&lookup, ENV_TIMEOUT_SECS)? {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(attempts) = parse_var(&lookup, ENV_MAX_ATTEMPTS)? {
            config.retry.max_attempts = attempts;
        }

        Ok(config)
    }

    /// Sets the API base URL, dropping any trailing slash
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the cache TTL
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Sets the retry policy
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// Treats a missing `.env` file as success and keeps every other failure
fn accept_missing_dotenv(result: Result<(), dotenvy::Error>) -> Result<(), ConfigError> {
    match result {
        Err(err) if !err.not_found() => Err(err.into()),
        _ => Ok(()),
    }
}

fn parse_var<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value }),
    }
}
