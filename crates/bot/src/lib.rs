pub mod config;
pub mod handler;
pub mod telegram;

pub use handler::{handle_message, BotContext, Reply};
pub use telegram::{Chat, Message, TelegramClient, Update, User};
