//! Local favorites
//!
//! Favorites are persisted to a JSON file in the user's data directory. Every
//! change is published to subscribers as the full, updated list so views can
//! derive "is this a favorite" flags from a single source.

mod store;

pub use store::{FavoriteAnime, FavoritesError, FavoritesStore};
