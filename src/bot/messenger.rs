//! Messaging platform boundary
//!
//! [`Messenger`] is the outbound surface the dispatcher talks to. The
//! teloxide [`Bot`] implements it for production; tests use a recording fake.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatAction, InlineKeyboardMarkup, InputFile, ParseMode};
use tracing::{debug, warn};

use crate::errors::DeliveryError;

/// How a text body should be interpreted by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    Plain,
    Html,
}

/// Outbound operations on the messaging platform
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Show the "typing…" presence indicator
    async fn send_typing(&self, chat_id: ChatId) -> Result<(), DeliveryError>;

    /// Send a text message, optionally with an inline keyboard
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        style: TextStyle,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<(), DeliveryError>;

    /// Send a photo by URL with an HTML caption
    async fn send_photo(
        &self,
        chat_id: ChatId,
        photo_url: &str,
        caption: &str,
    ) -> Result<(), DeliveryError>;
}

#[async_trait]
impl Messenger for Bot {
    async fn send_typing(&self, chat_id: ChatId) -> Result<(), DeliveryError> {
        self.send_chat_action(chat_id, ChatAction::Typing).await?;
        Ok(())
    }

    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        style: TextStyle,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<(), DeliveryError> {
        let mut request = self.send_message(chat_id, text);
        if style == TextStyle::Html {
            request = request.parse_mode(ParseMode::Html);
        }
        if let Some(keyboard) = keyboard {
            request = request.reply_markup(keyboard);
        }
        request.await?;
        Ok(())
    }

    async fn send_photo(
        &self,
        chat_id: ChatId,
        photo_url: &str,
        caption: &str,
    ) -> Result<(), DeliveryError> {
        let url = reqwest::Url::parse(photo_url)
            .map_err(|_| DeliveryError::InvalidUrl(photo_url.to_string()))?;

        Requester::send_photo(self, chat_id, InputFile::url(url))
            .caption(caption)
            .parse_mode(ParseMode::Html)
            .await?;
        Ok(())
    }
}

/// Deliver an HTML body, preferring a photo with caption.
///
/// When `image_url` is present a photo is attempted first; on any failure the
/// same body is sent once as plain HTML text. Without an image the text is
/// sent directly.
pub async fn deliver_with_photo_fallback<M: Messenger + ?Sized>(
    messenger: &M,
    chat_id: ChatId,
    body: &str,
    image_url: Option<&str>,
) -> Result<(), DeliveryError> {
    if let Some(url) = image_url {
        match messenger.send_photo(chat_id, url, body).await {
            Ok(()) => return Ok(()),
            Err(e) => {
                warn!(chat_id = %chat_id, photo_url = %url, error = %e, "Photo delivery failed, falling back to text");
            }
        }
    }

    messenger
        .send_text(chat_id, body, TextStyle::Html, None)
        .await
}

/// Show the typing indicator, ignoring failures
pub async fn signal_typing<M: Messenger + ?Sized>(messenger: &M, chat_id: ChatId) {
    if let Err(e) = messenger.send_typing(chat_id).await {
        debug!(chat_id = %chat_id, error = %e, "Typing indicator not delivered");
    }
}
