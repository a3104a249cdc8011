//! Webhook delivery variant of the bot: Telegram pushes updates to
//! `POST /telegram-webhook` instead of the binary long-polling for them.

use std::sync::Arc;

use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use gastobot_bot::{config, handler, handler::BotContext, telegram::TelegramClient, Update};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

struct AppState {
    ctx: BotContext,
    client: TelegramClient,
}

fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/health", get(health))
        .route("/telegram-webhook", post(telegram_webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "gastobot — asistente de gastos por Telegram. El webhook está en /telegram-webhook"
    }))
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

/// Telegram retries any non-200 answer, so failures are logged and
/// acknowledged rather than surfaced as HTTP errors.
async fn telegram_webhook(
    State(state): State<Arc<AppState>>,
    Json(update): Json<Update>,
) -> Json<Value> {
    match process_update(&state, update).await {
        Ok(()) => Json(json!({"status": "ok"})),
        Err(e) => {
            tracing::error!("webhook processing error: {e}");
            Json(json!({"status": "error", "message": e.to_string()}))
        }
    }
}

async fn process_update(state: &AppState, update: Update) -> anyhow::Result<()> {
    let Some(message) = update.message else {
        return Ok(());
    };
    let Some(text) = message.text.as_deref() else {
        return Ok(());
    };

    let sender = message.from.as_ref().map(|u| u.first_name.as_str());
    tracing::info!(chat = message.chat.id, "webhook message received: {text}");

    let reply = handler::handle_message(&state.ctx, text, sender).await;
    state
        .client
        .send_message(message.chat.id, &reply.text, reply.html)
        .await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let token = config::bot_token()?;
    let cfg = config::load_config()?;
    let db = gastobot_storage::create_db(&config::db_path()?).await?;

    let state = Arc::new(AppState {
        ctx: BotContext {
            db,
            registry: cfg.registry(),
        },
        client: TelegramClient::new(&token),
    });

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let addr = format!("0.0.0.0:{port}");

    tracing::info!("webhook server listening on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}
