//! Favorites store persisted to disk
//!
//! Provides a `FavoritesStore` that keeps the favorites list in memory, writes it
//! to a JSON file after every change, and notifies subscribers through a
//! `tokio::sync::watch` channel.

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::watch;
use tracing::debug;

use crate::catalog::Anime;

/// File name of the favorites list inside the data directory
const FAVORITES_FILE: &str = "favorites.json";

/// Errors that can occur when loading or saving favorites
#[derive(Debug, Error)]
pub enum FavoritesError {
    /// Reading or writing the favorites file failed
    #[error("Favorites file error: {0}")]
    Io(#[from] io::Error),

    /// The favorites file is not valid JSON
    #[error("Favorites file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// No home directory to place the data directory in
    #[error("Could not determine a data directory for favorites")]
    NoDataDir,
}

/// A favorited anime, stored with the fields needed to list it offline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteAnime {
    pub mal_id: u32,
    pub title: String,
    pub image_url: Option<String>,
    pub score: Option<f64>,
    pub episodes: Option<u32>,
    pub kind: Option<String>,
    /// When the anime was added
    pub added_at: DateTime<Utc>,
}

impl FavoriteAnime {
    /// Captures an anime as a favorite added now
    pub fn from_anime(anime: &Anime) -> Self {
        Self {
            mal_id: anime.mal_id,
            title: anime.display_title().to_string(),
            image_url: anime.image_url().map(str::to_string),
            score: anime.score,
            episodes: anime.episodes,
            kind: anime.kind.clone(),
            added_at: Utc::now(),
        }
    }
}

/// Favorites list backed by a JSON file
///
/// The list is ordered most recently added first.
#[derive(Debug)]
pub struct FavoritesStore {
    path: PathBuf,
    favorites: Vec<FavoriteAnime>,
    updates: watch::Sender<Vec<FavoriteAnime>>,
}

impl FavoritesStore {
    /// Opens the store in the XDG-compliant data directory
    ///
    /// Uses `~/.local/share/animecat/favorites.json` on Linux, or the equivalent
    /// path on other platforms.
    pub fn open() -> Result<Self, FavoritesError> {
        let project_dirs =
            ProjectDirs::from("", "", "animecat").ok_or(FavoritesError::NoDataDir)?;
        Self::with_path(project_dirs.data_dir().join(FAVORITES_FILE))
    }

    /// Opens the store at a specific file path
    ///
    /// A missing file is treated as an empty list; it is created on the first change.
    pub fn with_path(path: PathBuf) -> Result<Self, FavoritesError> {
        let favorites = load(&path)?;
        let (updates, _) = watch::channel(favorites.clone());
        Ok(Self {
            path,
            favorites,
            updates,
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All favorites, most recently added first
    pub fn list(&self) -> &[FavoriteAnime] {
        &self.favorites
    }

    /// Whether the anime with `mal_id` is a favorite
    pub fn is_favorited(&self, mal_id: u32) -> bool {
        self.favorites.iter().any(|f| f.mal_id == mal_id)
    }

    /// Subscribes to changes; the receiver always holds the current list
    pub fn subscribe(&self) -> watch::Receiver<Vec<FavoriteAnime>> {
        self.updates.subscribe()
    }

    /// Adds an anime, replacing an existing entry with the same id
    pub fn add(&mut self, anime: &Anime) -> Result<(), FavoritesError> {
        let mut favorites = Vec::with_capacity(self.favorites.len() + 1);
        favorites.push(FavoriteAnime::from_anime(anime));
        favorites.extend(
            self.favorites
                .iter()
                .filter(|f| f.mal_id != anime.mal_id)
                .cloned(),
        );
        self.commit(favorites)?;
        debug!(mal_id = anime.mal_id, "added favorite");
        Ok(())
    }

    /// Removes an anime; returns whether it was a favorite
    pub fn remove(&mut self, mal_id: u32) -> Result<bool, FavoritesError> {
        if !self.is_favorited(mal_id) {
            return Ok(false);
        }
        let favorites = self
            .favorites
            .iter()
            .filter(|f| f.mal_id != mal_id)
            .cloned()
            .collect();
        self.commit(favorites)?;
        debug!(mal_id, "removed favorite");
        Ok(true)
    }

    /// Adds the anime if absent, removes it otherwise
    ///
    /// Returns whether the anime is a favorite afterwards.
    pub fn toggle(&mut self, anime: &Anime) -> Result<bool, FavoritesError> {
        if self.remove(anime.mal_id)? {
            Ok(false)
        } else {
            self.add(anime)?;
            Ok(true)
        }
    }

    /// Writes `favorites` to disk, then makes it the current list
    ///
    /// On a failed write the in-memory list and subscribers keep the previous
    /// state, matching what is on disk.
    fn commit(&mut self, favorites: Vec<FavoriteAnime>) -> Result<(), FavoritesError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&favorites)?;
        fs::write(&self.path, json)?;
        self.favorites = favorites;
        self.updates.send_replace(self.favorites.clone());
        Ok(())
    }
}

fn load(path: &Path) -> Result<Vec<FavoriteAnime>, FavoritesError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(serde_json::from_str(&content)?),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(err) => Err(err.into()),
    }
}
