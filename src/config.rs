//! # Configuration Module
//!
//! Process-wide settings read once at startup and handed to each component.

use std::env;
use std::net::SocketAddr;

use crate::errors::ConfigError;

// Constants for catalog and server defaults
pub const DEFAULT_CATALOG_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Runtime configuration for the bot
#[derive(Clone)]
pub struct Config {
    /// Telegram bot token
    pub bot_token: String,
    /// Movie catalog API key
    pub catalog_api_key: String,
    /// Base URL of the movie catalog REST API
    pub catalog_base_url: String,
    /// Base path poster references are appended to
    pub image_base_url: String,
    /// Externally reachable URL; enables webhook mode when present
    pub public_url: Option<String>,
    /// Listen address for the webhook server
    pub bind_addr: SocketAddr,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// `BOT_TOKEN` (or `TELOXIDE_TOKEN`) and `TMDB_API_KEY` are required.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as absent.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let bot_token = get("BOT_TOKEN")
            .or_else(|| get("TELOXIDE_TOKEN"))
            .ok_or(ConfigError::Missing("BOT_TOKEN"))?;
        let catalog_api_key = get("TMDB_API_KEY").ok_or(ConfigError::Missing("TMDB_API_KEY"))?;

        let catalog_base_url = get("TMDB_BASE_URL")
            .unwrap_or_else(|| DEFAULT_CATALOG_BASE_URL.to_string());
        validate_url("TMDB_BASE_URL", &catalog_base_url)?;

        let image_base_url = get("TMDB_IMAGE_BASE_URL")
            .unwrap_or_else(|| DEFAULT_IMAGE_BASE_URL.to_string());
        validate_url("TMDB_IMAGE_BASE_URL", &image_base_url)?;

        let public_url = get("PUBLIC_URL")
            .map(|url| url.trim_end_matches('/').to_string());
        if let Some(url) = &public_url {
            validate_url("PUBLIC_URL", url)?;
        }

        let bind_addr_raw = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr_raw
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddr(bind_addr_raw.clone()))?;

        Ok(Self {
            bot_token,
            catalog_api_key,
            catalog_base_url,
            image_base_url,
            public_url,
            bind_addr,
        })
    }

    /// Full URL the platform should push updates to, if webhook mode is enabled
    pub fn webhook_url(&self) -> Option<String> {
        self.public_url.as_ref().map(|url| format!("{url}/webhook"))
    }
}

// Credentials stay out of debug output.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bot_token", &"<redacted>")
            .field("catalog_api_key", &"<redacted>")
            .field("catalog_base_url", &self.catalog_base_url)
            .field("image_base_url", &self.image_base_url)
            .field("public_url", &self.public_url)
            .field("bind_addr", &self.bind_addr)
            .finish()
    }
}

fn validate_url(key: &'static str, value: &str) -> Result<(), ConfigError> {
    reqwest::Url::parse(value)
        .map(|_| ())
        .map_err(|_| ConfigError::InvalidUrl {
            key,
            value: value.to_string(),
        })
}
