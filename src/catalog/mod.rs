//! Jikan catalog endpoints
//!
//! Typed wrappers over `CachedClient`. Every endpoint except search is cached;
//! search text changes with every submission, so search always goes to the
//! network while still sharing the rate-limit retry policy.

pub mod models;

pub use models::{Anime, Detail, Page, Pagination, Recommendation};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::config::ClientConfig;
use crate::http::{CacheMode, CachedClient, FetchError};

/// Errors that can occur when querying the catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The request itself failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The payload did not have the expected shape
    #[error("Unexpected response shape: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Results of loading the home feeds, each independent of the others
#[derive(Debug)]
pub struct HomeFeeds {
    pub airing: Result<Page<Anime>, CatalogError>,
    pub top: Result<Page<Anime>, CatalogError>,
    pub upcoming: Result<Page<Anime>, CatalogError>,
    pub recommendations: Result<Page<Recommendation>, CatalogError>,
}

/// Client for the anime catalog
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: CachedClient,
}

impl CatalogClient {
    /// Creates a catalog client over the reqwest transport
    pub fn new(config: &ClientConfig) -> Result<Self, CatalogError> {
        Ok(Self::with_http(CachedClient::new(config)?))
    }

    /// Creates a catalog client over an existing cached client
    pub fn with_http(http: CachedClient) -> Self {
        Self { http }
    }

    /// The underlying cached client
    pub fn http(&self) -> &CachedClient {
        &self.http
    }

    /// Top-ranked anime
    pub async fn top_anime(&self, page: u32) -> Result<Page<Anime>, CatalogError> {
        self.get(&format!("/top/anime?page={page}"), CacheMode::Use)
            .await
    }

    /// Anime airing this season
    pub async fn season_now(&self, page: u32) -> Result<Page<Anime>, CatalogError> {
        self.get(&format!("/seasons/now?page={page}"), CacheMode::Use)
            .await
    }

    /// Anime announced for upcoming seasons
    pub async fn season_upcoming(&self, page: u32) -> Result<Page<Anime>, CatalogError> {
        self.get(&format!("/seasons/upcoming?page={page}"), CacheMode::Use)
            .await
    }

    /// Latest user recommendations
    pub async fn recommendations(&self) -> Result<Page<Recommendation>, CatalogError> {
        self.get("/recommendations/anime", CacheMode::Use).await
    }

    /// Full-text search; never cached
    pub async fn search(&self, query: &str, page: u32) -> Result<Page<Anime>, CatalogError> {
        let path = format!("/anime?q={}&page={page}", encode_query(query));
        self.get(&path, CacheMode::Bypass).await
    }

    /// A single anime by MyAnimeList id
    pub async fn anime_detail(&self, id: u32) -> Result<Anime, CatalogError> {
        let detail: Detail<Anime> = self.get(&format!("/anime/{id}"), CacheMode::Use).await?;
        Ok(detail.data)
    }

    /// Loads the four home feeds concurrently
    ///
    /// A failure in one feed does not affect the others.
    pub async fn home(&self) -> HomeFeeds {
        let (airing, top, upcoming, recommendations) = futures::join!(
            self.season_now(1),
            self.top_anime(1),
            self.season_upcoming(1),
            self.recommendations()
        );

        HomeFeeds {
            airing,
            top,
            upcoming,
            recommendations,
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        mode: CacheMode,
    ) -> Result<T, CatalogError> {
        let value = self.http.fetch_with(path, mode).await?;
        debug!(path, "decoding catalog response");
        Ok(serde_json::from_value(value)?)
    }
}

/// Percent-encodes a search query for use as a query-string value
fn encode_query(query: &str) -> String {
    url::form_urlencoded::byte_serialize(query.trim().as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::scripted::ScriptedTransport;
    use crate::http::RawResponse;
    use serde_json::json;
    use std::sync::Arc;

    const BASE: &str = "https://catalog.test/v4";

    fn catalog_with(transport: &Arc<ScriptedTransport>) -> CatalogClient {
        let config = ClientConfig::default().with_base_url(BASE);
        CatalogClient::with_http(CachedClient::with_transport(transport.clone(), &config))
    }

    fn anime_page(ids: &[u32]) -> serde_json::Value {
        let data: Vec<_> = ids
            .iter()
            .map(|id| json!({ "mal_id": id, "title": format!("Anime {id}") }))
            .collect();
        json!({
            "pagination": { "last_visible_page": 3, "has_next_page": true },
            "data": data
        })
    }

    #[test]
    fn test_encode_query() {
        assert_eq!(encode_query("one piece"), "one+piece");
        assert_eq!(encode_query("  steins;gate "), "steins%3Bgate");
        assert_eq!(encode_query("a&b=c"), "a%26b%3Dc");
    }

    #[tokio::test(start_paused = true)]
    async fn test_list_endpoints_use_expected_paths() {
        let transport = Arc::new(ScriptedTransport::new());
        transport
            .push_json(anime_page(&[1]))
            .push_json(anime_page(&[2]))
            .push_json(anime_page(&[3]))
            .push_json(json!({ "data": [] }));
        let catalog = catalog_with(&transport);

        catalog.top_anime(2).await.unwrap();
        catalog.season_now(1).await.unwrap();
        catalog.season_upcoming(4).await.unwrap();
        catalog.recommendations().await.unwrap();

        assert_eq!(
            transport.urls(),
            vec![
                format!("{BASE}/top/anime?page=2"),
                format!("{BASE}/seasons/now?page=1"),
                format!("{BASE}/seasons/upcoming?page=4"),
                format!("{BASE}/recommendations/anime"),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_top_anime_decodes_page() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(anime_page(&[5114, 9253]));
        let catalog = catalog_with(&transport);

        let page = catalog.top_anime(1).await.unwrap();

        assert_eq!(page.data.len(), 2);
        assert_eq!(page.data[1].mal_id, 9253);
        assert!(page.has_next_page());
    }

    #[tokio::test(start_paused = true)]
    async fn test_detail_is_cached() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(json!({ "data": { "mal_id": 1, "title": "Cowboy Bebop" } }));
        let catalog = catalog_with(&transport);

        let first = catalog.anime_detail(1).await.unwrap();
        let second = catalog.anime_detail(1).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.title, "Cowboy Bebop");
        assert_eq!(transport.urls(), vec![format!("{BASE}/anime/1")]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_is_never_cached() {
        let transport = Arc::new(ScriptedTransport::new());
        transport
            .push_json(anime_page(&[20]))
            .push_json(anime_page(&[20]));
        let catalog = catalog_with(&transport);

        catalog.search("naruto shippuden", 1).await.unwrap();
        catalog.search("naruto shippuden", 1).await.unwrap();

        assert_eq!(transport.call_count(), 2);
        assert_eq!(
            transport.urls()[0],
            format!("{BASE}/anime?q=naruto+shippuden&page=1")
        );
        assert!(catalog.http().cache().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unexpected_shape_is_parse_error() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(json!({ "data": { "not": "a list" } }));
        let catalog = catalog_with(&transport);

        let result = catalog.top_anime(1).await;

        assert!(matches!(result, Err(CatalogError::Parse(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_errors_pass_through() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push(RawResponse::new(404, ""));
        let catalog = catalog_with(&transport);

        let result = catalog.anime_detail(999_999).await;

        assert!(matches!(
            result,
            Err(CatalogError::Fetch(FetchError::Http { status: 404 }))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_home_reports_feeds_independently() {
        let transport = Arc::new(ScriptedTransport::new());
        // Empty pages decode as any feed, so only the 500 can fail a feed
        transport
            .push_json(json!({ "data": [] }))
            .push(RawResponse::new(500, ""))
            .push_json(json!({ "data": [] }))
            .push_json(json!({ "data": [] }));
        let catalog = catalog_with(&transport);

        let feeds = catalog.home().await;

        let failures = [
            feeds.airing.is_err(),
            feeds.top.is_err(),
            feeds.upcoming.is_err(),
            feeds.recommendations.is_err(),
        ]
        .iter()
        .filter(|failed| **failed)
        .count();
        assert_eq!(failures, 1);
        assert_eq!(transport.call_count(), 4);
    }
}
