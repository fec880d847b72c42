//! Command-line interface parsing for animecat
//!
//! This module handles parsing of CLI arguments using clap. Each subcommand maps
//! to one catalog view: the ranked, airing and upcoming lists, search,
//! recommendations, a detail page, the combined home feeds, and favorites.

use clap::{Parser, Subcommand};
use thiserror::Error;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// Pages are numbered from 1
    #[error("Invalid page: '{0}'. Pages start at 1")]
    InvalidPage(String),

    /// Search needs at least one non-blank character
    #[error("Search query must not be empty")]
    EmptyQuery,
}

/// animecat - Browse the Jikan anime catalog
#[derive(Parser, Debug)]
#[command(name = "animecat")]
#[command(about = "Browse anime rankings, seasons, search results and favorites")]
#[command(version)]
pub struct Cli {
    /// Print raw JSON instead of formatted text
    #[arg(long, global = true)]
    pub json: bool,

    /// Log requests, cache hits and retries to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Override the catalog API base URL
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Catalog views
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Top-ranked anime
    Top {
        #[arg(long, default_value = "1", value_parser = parse_page)]
        page: u32,
    },
    /// Anime airing this season
    Airing {
        #[arg(long, default_value = "1", value_parser = parse_page)]
        page: u32,
    },
    /// Anime announced for upcoming seasons
    Upcoming {
        #[arg(long, default_value = "1", value_parser = parse_page)]
        page: u32,
    },
    /// Latest user recommendations
    Recommendations,
    /// Search anime by title
    ///
    /// Examples:
    ///   animecat search "cowboy bebop"
    ///   animecat search naruto --page 2
    Search {
        #[arg(value_parser = parse_query)]
        query: String,
        #[arg(long, default_value = "1", value_parser = parse_page)]
        page: u32,
    },
    /// Details for one anime by MyAnimeList id
    Detail { id: u32 },
    /// Airing, top, upcoming and recommendations at once
    Home,
    /// Manage local favorites
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
}

/// Favorites operations
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoritesAction {
    /// List favorites, most recent first
    List,
    /// Add an anime by id
    Add { id: u32 },
    /// Remove an anime by id
    Remove { id: u32 },
    /// Add the anime if absent, remove it otherwise
    Toggle { id: u32 },
}

/// Parses a 1-based page number.
///
/// # Returns
/// * `Ok(u32)` for any integer of at least 1
/// * `Err(CliError::InvalidPage)` otherwise
pub fn parse_page(s: &str) -> Result<u32, CliError> {
    match s.trim().parse::<u32>() {
        Ok(page) if page >= 1 => Ok(page),
        _ => Err(CliError::InvalidPage(s.to_string())),
    }
}

/// Rejects blank search queries.
pub fn parse_query(s: &str) -> Result<String, CliError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyQuery)
    } else {
        Ok(trimmed.to_string())
    }
}
