//! Time-to-live cache for API responses
//!
//! Provides a `ResponseCache` keyed by request path (including the query string)
//! that serves an entry only while it is younger than the caller's TTL.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

/// A single cached response
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Request path and query string the response belongs to
    pub key: String,
    /// The response payload, kept as opaque JSON
    pub value: Value,
    /// When the payload was stored
    pub stored_at: Instant,
}

/// Shared in-memory cache of API responses
///
/// The map sits behind a mutex so concurrent fetches can share one cache. The
/// lock is only held for the duration of a single read or write and never
/// across an `.await`.
#[derive(Debug, Default)]
pub struct ResponseCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl ResponseCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reads the payload stored for `key` if it is younger than `ttl`
    ///
    /// Returns `None` both for missing keys and for entries whose age has
    /// reached the TTL. Reading never modifies the cache.
    pub fn get(&self, key: &str, ttl: Duration) -> Option<Value> {
        let entries = self.lock();
        let entry = entries.get(key)?;
        if entry.stored_at.elapsed() < ttl {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    /// Stores `value` under `key`, replacing any previous entry and its timestamp
    pub fn put(&self, key: impl Into<String>, value: Value) {
        let key = key.into();
        let entry = CacheEntry {
            key: key.clone(),
            value,
            stored_at: Instant::now(),
        };
        self.lock().insert(key, entry);
    }

    /// Returns a copy of the raw entry for `key`, regardless of its age
    pub fn entry(&self, key: &str) -> Option<CacheEntry> {
        self.lock().get(key).cloned()
    }

    /// Number of stored entries, fresh or stale
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the cache holds no entries at all
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
