//! # Movie Formatting Module
//!
//! Turns raw catalog entries into display messages. Every field falls back to
//! a fixed default so that formatting never fails on sparse catalog data.

use serde_json::{Number, Value};
use teloxide::utils::html;

/// Maximum overview length in characters before truncation
pub const OVERVIEW_LIMIT: usize = 400;
/// Appended to an overview that was cut at [`OVERVIEW_LIMIT`]
pub const TRUNCATION_MARKER: &str = "...";

pub const DEFAULT_TITLE: &str = "N/A";
pub const DEFAULT_RELEASE_DATE: &str = "TBA";
pub const DEFAULT_SCORE: &str = "N/A";
pub const DEFAULT_OVERVIEW: &str = "No description available.";

/// A movie entry as returned by the catalog
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieRecord {
    pub title: Option<String>,
    pub release_date: Option<String>,
    /// Kept as the catalog's JSON number so `7.0` renders as `7.0`
    pub vote_average: Option<Number>,
    pub popularity: Option<Number>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
}

impl MovieRecord {
    /// Extract the consumed fields from one element of a `results` array.
    ///
    /// Missing, null or mistyped fields become `None`. Empty release dates and
    /// poster paths are treated as missing.
    pub fn from_json(value: &Value) -> Self {
        let text = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);
        let non_empty = |key: &str| text(key).filter(|s| !s.trim().is_empty());
        let number = |key: &str| match value.get(key) {
            Some(Value::Number(n)) => Some(n.clone()),
            _ => None,
        };

        Self {
            title: text("title"),
            release_date: non_empty("release_date"),
            vote_average: number("vote_average"),
            popularity: number("popularity"),
            overview: text("overview"),
            poster_path: non_empty("poster_path"),
        }
    }
}

/// A rendered reply body with an optional poster
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedMessage {
    /// HTML body, also used as photo caption
    pub body: String,
    /// Absolute poster URL
    pub image_url: Option<String>,
}

/// Cut `overview` to [`OVERVIEW_LIMIT`] characters and append the marker.
///
/// Counts Unicode scalar values, not bytes.
pub fn truncate_overview(overview: &str) -> String {
    match overview.char_indices().nth(OVERVIEW_LIMIT) {
        Some((cut, _)) => format!("{}{}", &overview[..cut], TRUNCATION_MARKER),
        None => overview.to_string(),
    }
}

/// Join a poster reference onto the image host base path
pub fn poster_url(image_base_url: &str, poster_path: &str) -> String {
    format!(
        "{}/{}",
        image_base_url.trim_end_matches('/'),
        poster_path.trim_start_matches('/')
    )
}

fn score(value: Option<&Number>) -> String {
    value.map_or_else(|| DEFAULT_SCORE.to_string(), Number::to_string)
}

/// Render a [`MovieRecord`] into a [`FormattedMessage`]
pub fn format_movie(record: &MovieRecord, image_base_url: &str) -> FormattedMessage {
    let title = record.title.as_deref().unwrap_or(DEFAULT_TITLE);
    let release_date = record.release_date.as_deref().unwrap_or(DEFAULT_RELEASE_DATE);
    let overview = truncate_overview(record.overview.as_deref().unwrap_or(DEFAULT_OVERVIEW));

    let body = format!(
        "🎬 <b>{}</b>\n\n📅 <b>Release Date:</b> {}\n⭐ <b>Rating:</b> {}/10\n🔥 <b>Popularity:</b> {}\n\n📖 <b>Description:</b>\n{}",
        html::escape(title),
        html::escape(release_date),
        score(record.vote_average.as_ref()),
        score(record.popularity.as_ref()),
        html::escape(&overview),
    );

    let image_url = record
        .poster_path
        .as_deref()
        .map(|path| poster_url(image_base_url, path));

    FormattedMessage { body, image_url }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truncate_multibyte_overview() {
        let overview = "é".repeat(401);
        let truncated = truncate_overview(&overview);
        assert_eq!(truncated.chars().count(), 403);
        assert!(truncated.ends_with("é..."));
    }

    #[test]
    fn test_from_json_ignores_mistyped_fields() {
        let record = MovieRecord::from_json(&json!({
            "title": 42,
            "vote_average": "high",
            "poster_path": null
        }));
        assert_eq!(record, MovieRecord::default());
    }

    #[test]
    fn test_escapes_html_in_title() {
        let record = MovieRecord {
            title: Some("Fast & <Furious>".to_string()),
            ..Default::default()
        };
        let message = format_movie(&record, "https://img");
        assert!(message.body.contains("<b>Fast &amp; &lt;Furious&gt;</b>"));
    }

    #[test]
    fn test_integer_scores_render_without_fraction() {
        let record = MovieRecord::from_json(&json!({ "vote_average": 7, "popularity": 1234 }));
        let message = format_movie(&record, "https://img");
        assert!(message.body.contains("<b>Rating:</b> 7/10"));
        assert!(message.body.contains("<b>Popularity:</b> 1234"));
    }
}
