//! Callback Handler module for processing inline keyboard callback queries

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::CallbackQuery;
use tracing::{debug, warn};

use super::intent_router::{route, InboundEvent};
use super::SharedDispatcher;

/// Convert a callback query into an [`InboundEvent`].
///
/// Queries without data or without an originating chat yield `None`.
pub fn inbound_from_callback(q: &CallbackQuery) -> Option<InboundEvent> {
    let tag = q.data.clone()?;
    let chat_id = q.message.as_ref()?.chat().id;
    Some(InboundEvent::Button { chat_id, tag })
}

/// Handle callback queries from the start-menu keyboard
pub async fn callback_handler(bot: Bot, q: CallbackQuery, dispatcher: SharedDispatcher) -> Result<()> {
    debug!(user_id = %q.from.id, data = ?q.data, "Received callback query from user");

    // Answer first so the client stops showing the loading state
    if let Err(e) = bot.answer_callback_query(q.id.clone()).await {
        warn!(user_id = %q.from.id, error = %e, "Failed to answer callback query");
    }

    let Some(event) = inbound_from_callback(&q) else {
        debug!(user_id = %q.from.id, "Callback query has no data or chat");
        return Ok(());
    };

    match route(&event) {
        Some(intent) => {
            dispatcher.dispatch(&bot, &intent).await;
        }
        None => debug!(user_id = %q.from.id, "Unknown button tag"),
    }

    Ok(())
}
