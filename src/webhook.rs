//! Webhook HTTP surface
//!
//! Exposes the endpoints Telegram pushes updates to, plus helpers to register
//! and remove the webhook and a liveness check. Received updates are queued
//! and handled by a worker that spawns one task per update.

use std::future::Future;
use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use teloxide::prelude::*;
use teloxide::types::Me;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::bot::{handle_update, register_commands, SharedDispatcher};

/// Capacity of the inbound update queue
pub const UPDATE_QUEUE_CAPACITY: usize = 256;

#[derive(Clone)]
pub struct WebhookState {
    pub bot: Bot,
    pub updates: mpsc::Sender<Update>,
    /// Full URL registered with Telegram, e.g. `https://host/webhook`
    pub webhook_url: Option<String>,
}

pub fn build_router(state: WebhookState) -> Router {
    Router::new()
        .route("/", get(liveness))
        .route("/webhook", post(receive_update))
        .route("/set_webhook", get(set_webhook))
        .route("/remove_webhook", get(remove_webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn liveness() -> &'static str {
    "🎬 Movie Bot is running! Send /start to your Telegram bot."
}

async fn receive_update(
    State(state): State<WebhookState>,
    payload: Result<Json<Update>, JsonRejection>,
) -> (StatusCode, &'static str) {
    let Json(update) = match payload {
        Ok(update) => update,
        Err(e) => {
            warn!(error = %e, "Rejected malformed webhook payload");
            return (StatusCode::BAD_REQUEST, "error");
        }
    };

    match state.updates.send(update).await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(_) => {
            error!("Update queue is closed, dropping webhook update");
            (StatusCode::SERVICE_UNAVAILABLE, "error")
        }
    }
}

async fn set_webhook(State(state): State<WebhookState>) -> (StatusCode, String) {
    let Some(webhook_url) = state.webhook_url.as_deref() else {
        return (
            StatusCode::BAD_REQUEST,
            "❌ PUBLIC_URL is not configured".to_string(),
        );
    };

    match register_webhook(&state.bot, webhook_url).await {
        Ok(()) => (
            StatusCode::OK,
            format!("✅ Webhook set successfully to: {webhook_url}"),
        ),
        Err(e) => {
            error!(error = %e, "Failed to set webhook");
            (
                StatusCode::BAD_GATEWAY,
                format!("❌ Error setting webhook: {e}"),
            )
        }
    }
}

async fn remove_webhook(State(state): State<WebhookState>) -> (StatusCode, String) {
    match state.bot.delete_webhook().await {
        Ok(_) => {
            info!("Webhook removed");
            (StatusCode::OK, "✅ Webhook removed successfully".to_string())
        }
        Err(e) => {
            error!(error = %e, "Failed to remove webhook");
            (
                StatusCode::BAD_GATEWAY,
                format!("❌ Error removing webhook: {e}"),
            )
        }
    }
}

async fn register_webhook(bot: &Bot, webhook_url: &str) -> Result<()> {
    let url = reqwest::Url::parse(webhook_url).context("invalid webhook url")?;
    bot.set_webhook(url).await?;
    info!(webhook_url = %webhook_url, "Webhook registered");
    Ok(())
}

/// Drain the update queue, handling each update on its own task.
///
/// Once the queue is closed the worker waits for every in-flight update
/// before returning.
pub async fn run_update_worker<H, Fut>(mut updates: mpsc::Receiver<Update>, handler: H)
where
    H: Fn(Update) -> Fut,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    let mut tasks = JoinSet::new();

    while let Some(update) = updates.recv().await {
        let update_id = update.id.0;
        let handling = handler(update);
        tasks.spawn(async move {
            if let Err(e) = handling.await {
                error!(update_id, error = %e, "Failed to handle update");
            }
        });

        while let Some(joined) = tasks.try_join_next() {
            log_task_outcome(joined);
        }
    }

    if !tasks.is_empty() {
        info!(in_flight = tasks.len(), "Update queue closed, finishing in-flight updates");
    }
    while let Some(joined) = tasks.join_next().await {
        log_task_outcome(joined);
    }
    info!("Update worker stopped");
}

fn log_task_outcome(joined: Result<(), JoinError>) {
    if let Err(e) = joined {
        error!(error = %e, "Update task panicked");
    }
}

/// Run the webhook server until Ctrl-C
pub async fn serve(
    bot: Bot,
    me: Me,
    dispatcher: SharedDispatcher,
    webhook_url: String,
    bind_addr: SocketAddr,
) -> Result<()> {
    let (tx, rx) = mpsc::channel(UPDATE_QUEUE_CAPACITY);
    let handler_bot = bot.clone();
    let worker = tokio::spawn(run_update_worker(rx, move |update| {
        handle_update(handler_bot.clone(), update, me.clone(), dispatcher.clone())
    }));

    register_commands(&bot).await;
    if let Err(e) = register_webhook(&bot, &webhook_url).await {
        warn!(error = %e, "Automatic webhook registration failed, use /set_webhook");
    }

    let app = build_router(WebhookState {
        bot,
        updates: tx,
        webhook_url: Some(webhook_url),
    });

    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    info!(addr = %listener.local_addr()?, "Webhook server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for shutdown signal");
            }
        })
        .await?;

    // The router (and its sender) is dropped on shutdown, which closes the
    // queue; the worker then finishes in-flight updates.
    worker.await.context("update worker panicked")?;
    Ok(())
}
