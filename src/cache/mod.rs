//! In-memory response cache
//!
//! Holds the JSON payloads returned by the catalog API for the lifetime of the
//! process. Entries are never swept in the background: freshness is checked when
//! an entry is read, and a stale entry is simply overwritten by the next fetch.

mod memory;

pub use memory::{CacheEntry, ResponseCache};
