//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::Me;
use tracing::debug;

use super::intent_router::{route, InboundEvent};
use super::SharedDispatcher;

/// Convert a Telegram message into an [`InboundEvent`]; non-text messages yield `None`
pub fn inbound_from_message(msg: &Message, bot_username: Option<&str>) -> Option<InboundEvent> {
    let text = msg.text()?;
    let first_name = msg.from.as_ref().map(|user| user.first_name.clone());

    Some(InboundEvent::Command {
        chat_id: msg.chat.id,
        text: text.to_string(),
        first_name,
        bot_username: bot_username.map(str::to_string),
    })
}

/// Handle an incoming message by routing it and dispatching the intent
pub async fn message_handler(
    bot: Bot,
    msg: Message,
    me: Me,
    dispatcher: SharedDispatcher,
) -> Result<()> {
    let Some(event) = inbound_from_message(&msg, me.user.username.as_deref()) else {
        debug!(chat_id = %msg.chat.id, "Ignoring non-text message");
        return Ok(());
    };

    match route(&event) {
        Some(intent) => {
            dispatcher.dispatch(&bot, &intent).await;
        }
        None => debug!(chat_id = %msg.chat.id, "Message is not a known command"),
    }

    Ok(())
}
