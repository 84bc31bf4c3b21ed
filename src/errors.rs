//! # Error Types Module
//!
//! This module defines the error types used across the bot. Each type maps to
//! one handling policy:
//!
//! - [`CatalogError`] is surfaced to the user as a single generic message
//! - [`DeliveryError`] on photo sends is recovered with a plain-text fallback
//! - [`InputError`] is surfaced as a prompt and never reaches the network
//! - [`ConfigError`] is fatal at startup

use thiserror::Error;

/// Failures talking to the movie catalog service
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Connection, DNS or TLS failure before a response arrived
    #[error("catalog transport error: {0}")]
    Transport(#[source] reqwest::Error),
    /// The service answered with a non-success status
    #[error("catalog returned status {0}")]
    Status(reqwest::StatusCode),
    /// The body could not be read or decoded as JSON
    #[error("catalog response could not be decoded: {0}")]
    Decode(#[source] reqwest::Error),
    /// The body was valid JSON but not an object
    #[error("catalog response is not a JSON object")]
    NotAnObject,
}

/// Failures delivering a reply to the messaging platform
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("telegram request failed: {0}")]
    Request(#[from] teloxide::RequestError),
    #[error("invalid photo url: {0}")]
    InvalidUrl(String),
}

/// Problems with what the user typed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("search query is missing")]
    MissingSearchQuery,
}

/// Startup configuration problems
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required environment variable is absent or empty
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} is not a valid URL: {value}")]
    InvalidUrl { key: &'static str, value: String },
    #[error("BIND_ADDR is not a valid socket address: {0}")]
    InvalidBindAddr(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_formatting() {
        assert_eq!(
            ConfigError::Missing("TMDB_API_KEY").to_string(),
            "TMDB_API_KEY must be set"
        );
        assert_eq!(
            CatalogError::Status(reqwest::StatusCode::UNAUTHORIZED).to_string(),
            "catalog returned status 401 Unauthorized"
        );
        assert_eq!(
            InputError::MissingSearchQuery.to_string(),
            "search query is missing"
        );
    }
}
