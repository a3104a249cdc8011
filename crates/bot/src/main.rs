use std::time::Duration;

use anyhow::Result;
use gastobot_bot::{config, handler, telegram::TelegramClient};

const POLL_TIMEOUT_SECS: u64 = 50;
const RETRY_DELAY: Duration = Duration::from_secs(3);

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let token = config::bot_token()?;
    let cfg = config::load_config()?;
    let db = gastobot_storage::create_db(&config::db_path()?).await?;

    let ctx = handler::BotContext {
        db,
        registry: cfg.registry(),
    };
    let client = TelegramClient::new(&token);

    tracing::info!(
        "bot started, polling for updates (payment methods: {})",
        ctx.registry.listing()
    );

    let mut offset: Option<i64> = None;
    loop {
        let updates = match client.get_updates(offset, POLL_TIMEOUT_SECS).await {
            Ok(updates) => updates,
            Err(e) => {
                tracing::warn!("getUpdates failed: {e}");
                tokio::time::sleep(RETRY_DELAY).await;
                continue;
            }
        };

        for update in updates {
            offset = Some(update.update_id + 1);

            let Some(message) = update.message else {
                continue;
            };
            let Some(text) = message.text.as_deref() else {
                continue;
            };

            let sender = message.from.as_ref().map(|u| u.first_name.as_str());
            tracing::info!(chat = message.chat.id, "message received: {text}");

            let reply = handler::handle_message(&ctx, text, sender).await;
            if let Err(e) = client
                .send_message(message.chat.id, &reply.text, reply.html)
                .await
            {
                tracing::warn!(chat = message.chat.id, "sendMessage failed: {e}");
            }
        }
    }
}
