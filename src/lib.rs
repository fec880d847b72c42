//! animecat library
//!
//! Exposes the cached catalog client, favorites store and CLI definitions used by
//! the `animecat` binary and by integration tests.

pub mod cache;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod favorites;
pub mod format;
pub mod http;
