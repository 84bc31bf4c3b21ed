use std::sync::Arc;

use anyhow::{Context, Result};
use teloxide::prelude::*;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use movie_updates_bot::bot::{self, ResponseDispatcher};
use movie_updates_bot::catalog::TmdbClient;
use movie_updates_bot::config::Config;
use movie_updates_bot::webhook;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_tracing();

    info!("Starting Movie Updates Telegram Bot");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration, refusing to start");
            return Err(e.into());
        }
    };
    info!(config = ?config, "Configuration loaded");

    let bot = Bot::new(&config.bot_token);
    let me = bot.get_me().await.context("failed to fetch bot identity")?;
    info!(username = ?me.user.username, "Authenticated with Telegram");

    let catalog = TmdbClient::new(&config.catalog_base_url, &config.catalog_api_key);
    let dispatcher = Arc::new(ResponseDispatcher::new(catalog, &config.image_base_url));

    match config.webhook_url() {
        Some(webhook_url) => {
            info!(webhook_url = %webhook_url, "Running in webhook mode");
            webhook::serve(bot, me, dispatcher, webhook_url, config.bind_addr).await?;
        }
        None => {
            info!("Running in long polling mode");
            bot::run_polling(bot, me, dispatcher).await;
        }
    }

    info!("Bot stopped");
    Ok(())
}
