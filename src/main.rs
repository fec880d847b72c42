//! animecat - Browse the Jikan anime catalog from the terminal
//!
//! Fetches rankings, seasonal lists, search results and recommendations through
//! a cached, rate-limit aware HTTP client, and keeps a local favorites list.

use std::error::Error;
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use animecat::catalog::{Anime, CatalogClient, CatalogError, Page, Recommendation};
use animecat::cli::{Cli, Command, FavoritesAction};
use animecat::config::ClientConfig;
use animecat::favorites::FavoritesStore;
use animecat::format;

/// Installs the stderr log subscriber
///
/// `RUST_LOG` wins when set; otherwise only warnings are shown, or debug output
/// for this crate with `--verbose`.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "animecat=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_anime_page(title: &str, page: &Page<Anime>) {
    println!("{}", title);
    if page.data.is_empty() {
        println!("  (no results)");
    }
    for anime in &page.data {
        println!("  {}", format::anime_line(anime));
    }
    if page.has_next_page() {
        println!("  ... more with --page");
    }
}

fn print_recommendations(page: &Page<Recommendation>) {
    println!("Recommendations");
    for recommendation in &page.data {
        println!("  {}", format::recommendation_line(recommendation));
    }
}

fn print_anime_result(title: &str, page: &Result<Page<Anime>, CatalogError>) {
    match page {
        Ok(page) => print_anime_page(title, page),
        Err(err) => println!("{}\n  unavailable: {}", title, err),
    }
    println!();
}

fn feed_json<T: Serialize>(feed: &Result<T, CatalogError>) -> serde_json::Value {
    match feed {
        Ok(value) => json!(value),
        Err(err) => json!({ "error": err.to_string() }),
    }
}

async fn run_home(catalog: &CatalogClient, as_json: bool) -> Result<(), Box<dyn Error>> {
    let feeds = catalog.home().await;

    if as_json {
        return print_json(&json!({
            "airing": feed_json(&feeds.airing),
            "top": feed_json(&feeds.top),
            "upcoming": feed_json(&feeds.upcoming),
            "recommendations": feed_json(&feeds.recommendations),
        }));
    }

    print_anime_result("Airing now", &feeds.airing);
    print_anime_result("Top ranked", &feeds.top);
    print_anime_result("Upcoming", &feeds.upcoming);
    match &feeds.recommendations {
        Ok(page) => print_recommendations(page),
        Err(err) => println!("Recommendations\n  unavailable: {}", err),
    }
    Ok(())
}

async fn run_favorites(
    catalog: &CatalogClient,
    action: FavoritesAction,
    as_json: bool,
) -> Result<(), Box<dyn Error>> {
    let mut store = FavoritesStore::open()?;

    match action {
        FavoritesAction::List => {
            if as_json {
                return print_json(&store.list());
            }
            if store.list().is_empty() {
                println!("No favorites yet");
            }
            for favorite in store.list() {
                println!(
                    "  {:>7}  {:<50} {:>5}  added {}",
                    favorite.mal_id,
                    format::truncate_text(&favorite.title, 47),
                    format::format_score(favorite.score),
                    favorite.added_at.format("%Y-%m-%d"),
                );
            }
        }
        FavoritesAction::Add { id } => {
            let anime = catalog.anime_detail(id).await?;
            store.add(&anime)?;
            println!("Added {} to favorites", anime.display_title());
        }
        FavoritesAction::Remove { id } => {
            if store.remove(id)? {
                println!("Removed {} from favorites", id);
            } else {
                println!("{} is not a favorite", id);
            }
        }
        FavoritesAction::Toggle { id } => {
            // Removal works offline; only adding needs the catalog entry
            let existing = store.list().iter().find(|f| f.mal_id == id);
            if let Some(title) = existing.map(|f| f.title.clone()) {
                store.remove(id)?;
                println!("Removed {} from favorites", title);
            } else {
                let anime = catalog.anime_detail(id).await?;
                store.add(&anime)?;
                println!("Added {} to favorites", anime.display_title());
            }
        }
    }
    Ok(())
}

async fn run(cli: Cli, catalog: &CatalogClient) -> Result<(), Box<dyn Error>> {
    let as_json = cli.json;

    match cli.command {
        Command::Top { page } => {
            let result = catalog.top_anime(page).await?;
            if as_json {
                return print_json(&result);
            }
            print_anime_page("Top ranked", &result);
        }
        Command::Airing { page } => {
            let result = catalog.season_now(page).await?;
            if as_json {
                return print_json(&result);
            }
            print_anime_page("Airing now", &result);
        }
        Command::Upcoming { page } => {
            let result = catalog.season_upcoming(page).await?;
            if as_json {
                return print_json(&result);
            }
            print_anime_page("Upcoming", &result);
        }
        Command::Recommendations => {
            let result = catalog.recommendations().await?;
            if as_json {
                return print_json(&result);
            }
            print_recommendations(&result);
        }
        Command::Search { query, page } => {
            let result = catalog.search(&query, page).await?;
            if as_json {
                return print_json(&result);
            }
            print_anime_page(&format!("Results for \"{}\"", query), &result);
        }
        Command::Detail { id } => {
            let anime = catalog.anime_detail(id).await?;
            if as_json {
                return print_json(&anime);
            }
            // A broken favorites file should not hide the detail view
            let favorited = FavoritesStore::open()
                .map(|store| store.is_favorited(id))
                .unwrap_or(false);
            println!("{}", format::anime_detail(&anime, favorited));
        }
        Command::Home => run_home(catalog, as_json).await?,
        Command::Favorites { action } => run_favorites(catalog, action, as_json).await?,
    }
    Ok(())
}

async fn start(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url.as_str());
    }

    let catalog = CatalogClient::new(&config)?;
    run(cli, &catalog).await
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match start(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
