//! Response Dispatcher module
//!
//! Turns an [`Intent`] into outbound replies. Catalog-backed intents are
//! described by a [`ListingRequest`] (endpoint, parameters, selection policy)
//! so that latest, trending, upcoming and search share one code path.

use serde_json::Value;
use teloxide::types::ChatId;
use tracing::{error, info, warn};

use crate::catalog::{CatalogSource, NOW_PLAYING, SEARCH, TRENDING_WEEK, UPCOMING};
use crate::errors::{DeliveryError, InputError};
use crate::movie_format::{format_movie, FormattedMessage, MovieRecord};

use super::intent_router::{Intent, IntentKind};
use super::messenger::{deliver_with_photo_fallback, signal_typing, Messenger, TextStyle};
use super::ui_builder::{
    create_main_menu_keyboard, help_message, no_results_message, welcome_message,
    FETCH_FAILED_MESSAGE, SEARCH_BUTTON_MESSAGE, SEARCH_USAGE_MESSAGE,
};

/// Number of movies shown for listing intents
pub const LISTING_LIMIT: usize = 5;

/// One reply to send back to the chat
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundReply {
    /// A text message
    Text { body: String, style: TextStyle },
    /// The welcome text with the shortcut keyboard
    Menu { body: String },
    /// A formatted movie, sent as photo when it has a poster
    Movie(FormattedMessage),
}

impl OutboundReply {
    fn plain(body: impl Into<String>) -> Self {
        OutboundReply::Text {
            body: body.into(),
            style: TextStyle::Plain,
        }
    }
}

/// Which results of a listing become replies
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The first `n` results, or fewer when the catalog has fewer
    Top(usize),
    /// Only the best match; zero results produce a "no movies found" reply
    FirstMatch { query: String },
}

/// A catalog query and what to do with its results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRequest {
    pub endpoint: &'static str,
    pub params: Vec<(&'static str, String)>,
    pub selection: Selection,
}

impl ListingRequest {
    pub fn now_playing() -> Self {
        Self {
            endpoint: NOW_PLAYING,
            params: vec![("page", "1".to_string())],
            selection: Selection::Top(LISTING_LIMIT),
        }
    }

    pub fn trending() -> Self {
        Self {
            endpoint: TRENDING_WEEK,
            params: Vec::new(),
            selection: Selection::Top(LISTING_LIMIT),
        }
    }

    pub fn upcoming() -> Self {
        Self {
            endpoint: UPCOMING,
            params: Vec::new(),
            selection: Selection::Top(LISTING_LIMIT),
        }
    }

    /// Build a title search; an empty query is rejected before any network call
    pub fn search(query: &str) -> Result<Self, InputError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(InputError::MissingSearchQuery);
        }
        Ok(Self {
            endpoint: SEARCH,
            params: vec![("query", query.to_string())],
            selection: Selection::FirstMatch {
                query: query.to_string(),
            },
        })
    }
}

/// How an intent is answered
#[derive(Debug, Clone, PartialEq)]
pub enum ResponsePlan {
    /// Replies known without touching the catalog
    Immediate(Vec<OutboundReply>),
    /// Replies depend on a catalog listing
    Catalog(ListingRequest),
}

impl ResponsePlan {
    pub fn for_intent(kind: &IntentKind) -> Self {
        match kind {
            IntentKind::Start { first_name } => {
                ResponsePlan::Immediate(vec![OutboundReply::Menu {
                    body: welcome_message(first_name.as_deref()),
                }])
            }
            IntentKind::Help => ResponsePlan::Immediate(vec![OutboundReply::Text {
                body: help_message(),
                style: TextStyle::Html,
            }]),
            IntentKind::SearchPrompt => {
                ResponsePlan::Immediate(vec![OutboundReply::plain(SEARCH_BUTTON_MESSAGE)])
            }
            IntentKind::Latest => ResponsePlan::Catalog(ListingRequest::now_playing()),
            IntentKind::Trending => ResponsePlan::Catalog(ListingRequest::trending()),
            IntentKind::Upcoming => ResponsePlan::Catalog(ListingRequest::upcoming()),
            IntentKind::Search(query) => match ListingRequest::search(query) {
                Ok(request) => ResponsePlan::Catalog(request),
                Err(InputError::MissingSearchQuery) => {
                    ResponsePlan::Immediate(vec![OutboundReply::plain(SEARCH_USAGE_MESSAGE)])
                }
            },
        }
    }
}

/// Orchestrates catalog queries, formatting and delivery
pub struct ResponseDispatcher<C> {
    catalog: C,
    image_base_url: String,
}

impl<C: CatalogSource> ResponseDispatcher<C> {
    pub fn new(catalog: C, image_base_url: &str) -> Self {
        Self {
            catalog,
            image_base_url: image_base_url.to_string(),
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Compute the replies for `kind` without delivering them
    pub async fn replies(&self, kind: &IntentKind) -> Vec<OutboundReply> {
        match ResponsePlan::for_intent(kind) {
            ResponsePlan::Immediate(replies) => replies,
            ResponsePlan::Catalog(request) => self.fetch_listing(&request).await,
        }
    }

    /// Run a listing request and turn its results into replies.
    ///
    /// A catalog failure or a payload without a `results` list yields exactly
    /// one error reply.
    pub async fn fetch_listing(&self, request: &ListingRequest) -> Vec<OutboundReply> {
        let params: Vec<(&str, &str)> = request
            .params
            .iter()
            .map(|(key, value)| (*key, value.as_str()))
            .collect();

        let payload = match self.catalog.fetch(request.endpoint, &params).await {
            Ok(payload) => payload,
            Err(e) => {
                warn!(endpoint = %request.endpoint, error = %e, "Catalog request failed");
                return vec![OutboundReply::plain(FETCH_FAILED_MESSAGE)];
            }
        };

        let Some(results) = payload.get("results").and_then(Value::as_array) else {
            warn!(endpoint = %request.endpoint, "Catalog payload has no results list");
            return vec![OutboundReply::plain(FETCH_FAILED_MESSAGE)];
        };

        let selected: &[Value] = match &request.selection {
            Selection::Top(limit) => &results[..results.len().min(*limit)],
            Selection::FirstMatch { query } => match results.first() {
                Some(first) => std::slice::from_ref(first),
                None => {
                    info!(query = %query, "Search returned no results");
                    return vec![OutboundReply::plain(no_results_message(query))];
                }
            },
        };

        if selected.is_empty() {
            info!(endpoint = %request.endpoint, "Catalog listing is empty");
        }

        selected
            .iter()
            .map(|item| {
                let record = MovieRecord::from_json(item);
                OutboundReply::Movie(format_movie(&record, &self.image_base_url))
            })
            .collect()
    }

    /// Handle `intent` to completion and return how many replies were delivered.
    ///
    /// Catalog-backed intents first show the typing indicator. Individual
    /// delivery failures are logged and do not stop the remaining replies.
    pub async fn dispatch<M: Messenger + ?Sized>(&self, messenger: &M, intent: &Intent) -> usize {
        let chat_id = intent.chat_id;

        let replies = match ResponsePlan::for_intent(&intent.kind) {
            ResponsePlan::Immediate(replies) => replies,
            ResponsePlan::Catalog(request) => {
                signal_typing(messenger, chat_id).await;
                self.fetch_listing(&request).await
            }
        };

        let total = replies.len();
        let mut delivered = 0;
        for reply in replies {
            match deliver_reply(messenger, chat_id, reply).await {
                Ok(()) => delivered += 1,
                Err(e) => error!(chat_id = %chat_id, error = %e, "Failed to deliver reply"),
            }
        }

        info!(chat_id = %chat_id, intent = ?intent.kind, delivered, total, "Intent handled");
        delivered
    }
}

async fn deliver_reply<M: Messenger + ?Sized>(
    messenger: &M,
    chat_id: ChatId,
    reply: OutboundReply,
) -> Result<(), DeliveryError> {
    match reply {
        OutboundReply::Text { body, style } => {
            messenger.send_text(chat_id, &body, style, None).await
        }
        OutboundReply::Menu { body } => {
            messenger
                .send_text(chat_id, &body, TextStyle::Plain, Some(create_main_menu_keyboard()))
                .await
        }
        OutboundReply::Movie(message) => {
            deliver_with_photo_fallback(messenger, chat_id, &message.body, message.image_url.as_deref())
                .await
        }
    }
}
