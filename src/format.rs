//! Display helpers for catalog values

use crate::catalog::{Anime, Recommendation};

/// Formats a score with one decimal place, or `N/A`
pub fn format_score(score: Option<f64>) -> String {
    match score {
        Some(score) => format!("{:.1}", score),
        None => "N/A".to_string(),
    }
}

/// Formats an episode count, or `Unknown`
pub fn format_episodes(episodes: Option<u32>) -> String {
    match episodes {
        Some(count) => count.to_string(),
        None => "Unknown".to_string(),
    }
}

/// Shortens the API's airing status labels
pub fn format_status(status: Option<&str>) -> String {
    match status {
        None | Some("") => "Unknown".to_string(),
        Some("Currently Airing") => "Airing".to_string(),
        Some("Finished Airing") => "Finished".to_string(),
        Some("Not yet aired") => "Upcoming".to_string(),
        Some(other) => other.to_string(),
    }
}

/// Truncates `text` to `max_chars` characters, appending `...` when cut
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}

/// One-line summary used in list output
pub fn anime_line(anime: &Anime) -> String {
    let rank = anime
        .rank
        .map(|r| format!("#{:<5}", r))
        .unwrap_or_else(|| " ".repeat(6));
    format!(
        "{} {:>7}  {:<50} {:>5}  {:>4} ep  {}",
        rank,
        anime.mal_id,
        truncate_text(anime.display_title(), 47),
        format_score(anime.score),
        format_episodes(anime.episodes),
        format_status(anime.status.as_deref()),
    )
}

/// One-line summary of a recommendation pair
pub fn recommendation_line(recommendation: &Recommendation) -> String {
    let titles: Vec<String> = recommendation
        .entry
        .iter()
        .map(|e| format!("{} ({})", truncate_text(&e.title, 40), e.mal_id))
        .collect();
    let by = recommendation
        .user
        .as_ref()
        .map(|u| format!("  by {}", u.username))
        .unwrap_or_default();
    format!("{}{}", titles.join("  <->  "), by)
}

/// Multi-line detail view of a single anime
pub fn anime_detail(anime: &Anime, favorited: bool) -> String {
    let mut lines = vec![format!(
        "{}{}",
        anime.display_title(),
        if favorited { "  [favorite]" } else { "" }
    )];

    if anime.display_title() != anime.title {
        lines.push(anime.title.clone());
    }
    if let Some(japanese) = anime.title_japanese.as_deref() {
        lines.push(japanese.to_string());
    }
    lines.push(String::new());
    lines.push(format!(
        "Type: {}   Episodes: {}   Status: {}",
        anime.kind.as_deref().unwrap_or("Unknown"),
        format_episodes(anime.episodes),
        format_status(anime.status.as_deref()),
    ));
    lines.push(format!(
        "Score: {}   Rank: {}   Duration: {}",
        format_score(anime.score),
        anime
            .rank
            .map(|r| format!("#{}", r))
            .unwrap_or_else(|| "N/A".to_string()),
        anime.duration.as_deref().unwrap_or("Unknown"),
    ));
    if let (Some(season), Some(year)) = (anime.season.as_deref(), anime.year) {
        lines.push(format!("Season: {} {}", season, year));
    }
    if !anime.genres.is_empty() {
        let genres: Vec<&str> = anime.genres.iter().map(|g| g.name.as_str()).collect();
        lines.push(format!("Genres: {}", genres.join(", ")));
    }
    if !anime.studios.is_empty() {
        let studios: Vec<&str> = anime.studios.iter().map(|s| s.name.as_str()).collect();
        lines.push(format!("Studios: {}", studios.join(", ")));
    }
    if let Some(synopsis) = anime.synopsis.as_deref() {
        lines.push(String::new());
        lines.push(truncate_text(synopsis, 600));
    }
    if let Some(url) = anime.url.as_deref() {
        lines.push(String::new());
        lines.push(url.to_string());
    }

    lines.join("\n")
}
