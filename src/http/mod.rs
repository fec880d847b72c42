//! Cached, rate-limit aware HTTP access to the catalog API
//!
//! `CachedClient` is the single entry point: it serves fresh responses from the
//! in-memory cache, performs GET requests through a `Transport`, and retries
//! requests that were answered with HTTP 429.

mod client;
mod error;
mod retry;
#[cfg(test)]
pub(crate) mod scripted;
mod transport;

pub use client::{CacheMode, CachedClient};
pub use error::FetchError;
pub use retry::RetryPolicy;
pub use transport::{HttpTransport, RawResponse, Transport};
