//! Recording fakes for the catalog and messaging boundaries.
//!
//! [`FakeCatalog`] returns a canned payload or failure and records every
//! request; [`RecordingMessenger`] records every delivered message and can be
//! told to reject photos or typing indicators.

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};
use teloxide::types::{ChatId, InlineKeyboardMarkup};
use teloxide::{ApiError, RequestError};

use movie_updates_bot::bot::{Messenger, TextStyle};
use movie_updates_bot::catalog::CatalogSource;
use movie_updates_bot::errors::{CatalogError, DeliveryError};

pub const IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";

/// One recorded `fetch(endpoint, params)` call.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogCall {
    pub endpoint: String,
    pub params: Vec<(String, String)>,
}

enum Outcome {
    Payload(Value),
    Status(u16),
}

/// Catalog stub with a fixed outcome.
pub struct FakeCatalog {
    outcome: Outcome,
    calls: Mutex<Vec<CatalogCall>>,
}

impl FakeCatalog {
    pub fn with_payload(payload: Value) -> Self {
        Self {
            outcome: Outcome::Payload(payload),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A catalog whose `results` holds `count` movies titled "Movie 1".."Movie n".
    pub fn with_movies(count: usize) -> Self {
        Self::with_payload(json!({ "page": 1, "results": movies(count) }))
    }

    pub fn failing(status: u16) -> Self {
        Self {
            outcome: Outcome::Status(status),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<CatalogCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogSource for FakeCatalog {
    async fn fetch(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Value, CatalogError> {
        self.calls.lock().unwrap().push(CatalogCall {
            endpoint: endpoint.to_string(),
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });

        match &self.outcome {
            Outcome::Payload(payload) => Ok(payload.clone()),
            Outcome::Status(code) => Err(CatalogError::Status(
                reqwest::StatusCode::from_u16(*code).unwrap(),
            )),
        }
    }
}

/// Movie objects shaped like catalog results, each with a poster.
pub fn movies(count: usize) -> Vec<Value> {
    (1..=count)
        .map(|i| {
            json!({
                "title": format!("Movie {i}"),
                "release_date": "2024-05-01",
                "vote_average": 7.5,
                "popularity": 100.0 + i as f64,
                "overview": format!("Overview {i}"),
                "poster_path": format!("/poster{i}.jpg"),
            })
        })
        .collect()
}

/// One recorded outbound operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Typing(ChatId),
    Text {
        chat_id: ChatId,
        text: String,
        style: TextStyle,
        keyboard: Option<InlineKeyboardMarkup>,
    },
    Photo {
        chat_id: ChatId,
        url: String,
        caption: String,
    },
}

/// Messenger that records successful sends.
#[derive(Default)]
pub struct RecordingMessenger {
    pub fail_photos: bool,
    pub fail_typing: bool,
    sent: Mutex<Vec<Sent>>,
    failed_photos: Mutex<Vec<String>>,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting_photos() -> Self {
        Self {
            fail_photos: true,
            ..Self::default()
        }
    }

    pub fn rejecting_typing() -> Self {
        Self {
            fail_typing: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    /// Sends excluding typing indicators, i.e. the replies the user sees.
    pub fn replies(&self) -> Vec<Sent> {
        self.sent()
            .into_iter()
            .filter(|s| !matches!(s, Sent::Typing(_)))
            .collect()
    }

    pub fn reply_texts(&self) -> Vec<String> {
        self.replies()
            .into_iter()
            .map(|s| match s {
                Sent::Text { text, .. } => text,
                Sent::Photo { caption, .. } => caption,
                Sent::Typing(_) => unreachable!(),
            })
            .collect()
    }

    pub fn failed_photos(&self) -> Vec<String> {
        self.failed_photos.lock().unwrap().clone()
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send_typing(&self, chat_id: ChatId) -> Result<(), DeliveryError> {
        if self.fail_typing {
            return Err(DeliveryError::Request(RequestError::Api(ApiError::BotBlocked)));
        }
        self.sent.lock().unwrap().push(Sent::Typing(chat_id));
        Ok(())
    }

    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        style: TextStyle,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<(), DeliveryError> {
        self.sent.lock().unwrap().push(Sent::Text {
            chat_id,
            text: text.to_string(),
            style,
            keyboard,
        });
        Ok(())
    }

    async fn send_photo(
        &self,
        chat_id: ChatId,
        photo_url: &str,
        caption: &str,
    ) -> Result<(), DeliveryError> {
        if self.fail_photos {
            self.failed_photos.lock().unwrap().push(photo_url.to_string());
            return Err(DeliveryError::InvalidUrl(photo_url.to_string()));
        }
        self.sent.lock().unwrap().push(Sent::Photo {
            chat_id,
            url: photo_url.to_string(),
            caption: caption.to_string(),
        });
        Ok(())
    }
}
