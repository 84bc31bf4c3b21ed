//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules:
//! - `intent_router`: Normalises commands and button taps into intents
//! - `response_dispatcher`: Answers intents using the movie catalog
//! - `messenger`: Outbound platform operations and the photo fallback
//! - `message_handler`: Handles incoming text messages
//! - `callback_handler`: Handles inline keyboard callback queries
//! - `ui_builder`: Creates keyboards and static messages

pub mod callback_handler;
pub mod intent_router;
pub mod message_handler;
pub mod messenger;
pub mod response_dispatcher;
pub mod ui_builder;

use std::sync::Arc;

use anyhow::Result;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::{BotCommand, Me, UpdateKind};
use tracing::{debug, info, warn};

use crate::catalog::TmdbClient;

pub use callback_handler::callback_handler;
pub use intent_router::{route, InboundEvent, Intent, IntentKind};
pub use message_handler::message_handler;
pub use messenger::{Messenger, TextStyle};
pub use response_dispatcher::{OutboundReply, ResponseDispatcher};

/// Dispatcher shared across concurrent handlers
pub type SharedDispatcher = Arc<ResponseDispatcher<TmdbClient>>;

/// Build the update handler tree: messages and callback queries
pub fn schema() -> UpdateHandler<anyhow::Error> {
    dptree::entry()
        .branch(Update::filter_message().endpoint(message_handler))
        .branch(Update::filter_callback_query().endpoint(callback_handler))
}

/// Handle a single update received outside the teloxide dispatcher (webhook mode)
pub async fn handle_update(
    bot: Bot,
    update: Update,
    me: Me,
    dispatcher: SharedDispatcher,
) -> Result<()> {
    match update.kind {
        UpdateKind::Message(msg) => message_handler(bot, msg, me, dispatcher).await,
        UpdateKind::CallbackQuery(q) => callback_handler(bot, q, dispatcher).await,
        other => {
            debug!(update_id = update.id.0, kind = ?other, "Ignoring unsupported update");
            Ok(())
        }
    }
}

/// Register the command menu shown by Telegram clients, best-effort
pub async fn register_commands(bot: &Bot) {
    let commands: Vec<BotCommand> = ui_builder::COMMAND_DESCRIPTIONS
        .iter()
        .map(|(name, description)| BotCommand::new(*name, *description))
        .collect();

    if let Err(e) = bot.set_my_commands(commands).await {
        warn!(error = %e, "Failed to register bot commands");
    }
}

/// Serve updates by long polling until Ctrl-C
pub async fn run_polling(bot: Bot, me: Me, dispatcher: SharedDispatcher) {
    register_commands(&bot).await;

    info!("Bot initialized, starting long polling dispatcher");

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![me, dispatcher])
        .default_handler(|update| async move {
            debug!(update_id = update.id.0, "Unhandled update");
        })
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}
