//! HTTP client for the movie catalog service.
//!
//! This module provides the [`CatalogSource`] trait used by the dispatcher and
//! [`TmdbClient`], its implementation over the TMDB v3 REST API.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};

use crate::errors::CatalogError;

/// Endpoint for movies currently in theatres
pub const NOW_PLAYING: &str = "movie/now_playing";
/// Endpoint for the weekly trending list
pub const TRENDING_WEEK: &str = "trending/movie/week";
/// Endpoint for upcoming releases
pub const UPCOMING: &str = "movie/upcoming";
/// Endpoint for title search
pub const SEARCH: &str = "search/movie";

/// Locale sent with every catalog request
pub const LOCALE: &str = "en-US";

const API_KEY_PARAM: &str = "api_key";
const LANGUAGE_PARAM: &str = "language";

/// Source of raw catalog listings.
///
/// The dispatcher only depends on this trait so tests can substitute a fake.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Query `endpoint` with `params` and return the decoded JSON object.
    async fn fetch(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Value, CatalogError>;
}

/// HTTP client for the TMDB catalog.
///
/// # Examples
///
/// ```no_run
/// # use movie_updates_bot::catalog::{CatalogSource, TmdbClient, NOW_PLAYING};
/// # async fn example() {
/// let tmdb = TmdbClient::new("https://api.themoviedb.org/3", "your_api_key");
/// let listing = tmdb.fetch(NOW_PLAYING, &[("page", "1")]).await.unwrap();
/// println!("Results: {}", listing["results"]);
/// # }
/// ```
pub struct TmdbClient {
    /// Catalog API base url, without trailing slash
    base_url: String,
    /// API credential sent as `api_key`
    api_key: String,
    /// HTTP client
    client: Client,
}

impl TmdbClient {
    /// Create a new [`TmdbClient`].
    ///
    /// # Arguments
    ///
    /// * `base_url` - Root of the REST API, e.g. `https://api.themoviedb.org/3`.
    /// * `api_key` - The catalog credential.
    pub fn new(base_url: &str, api_key: &str) -> Self {
        TmdbClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client: Client::new(),
        }
    }

    /// Merge caller parameters over the defaults.
    ///
    /// The caller may override the locale but never the credential.
    pub fn query_params(&self, params: &[(&str, &str)]) -> Vec<(String, String)> {
        let mut query = vec![
            (API_KEY_PARAM.to_string(), self.api_key.clone()),
            (LANGUAGE_PARAM.to_string(), LOCALE.to_string()),
        ];

        for (key, value) in params {
            if *key == API_KEY_PARAM {
                continue;
            }
            match query.iter_mut().find(|(existing, _)| existing == key) {
                Some(entry) => entry.1 = value.to_string(),
                None => query.push((key.to_string(), value.to_string())),
            }
        }

        query
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }
}

#[async_trait]
impl CatalogSource for TmdbClient {
    /// Request `{base}/{endpoint}` and return the JSON object body.
    ///
    /// Any transport failure, non-success status or undecodable body is a
    /// [`CatalogError`]. There are no retries.
    async fn fetch(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Value, CatalogError> {
        let url = self.endpoint_url(endpoint);
        info!(endpoint = %endpoint, "request catalog");
        debug!(url = %url, params = ?params, "catalog request parameters");

        let response = self
            .client
            .get(&url)
            .query(&self.query_params(params))
            .send()
            .await
            .map_err(CatalogError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status));
        }

        let body: Value = response.json().await.map_err(CatalogError::Decode)?;
        if !body.is_object() {
            return Err(CatalogError::NotAnObject);
        }

        let results = body.get("results").and_then(Value::as_array).map(Vec::len);
        debug!(endpoint = %endpoint, results, "catalog response decoded");

        Ok(body)
    }
}
