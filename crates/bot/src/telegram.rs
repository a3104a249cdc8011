use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// The slice of the Telegram Bot API wire format this bot cares about.
/// Unknown fields are ignored on deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub first_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
}

pub struct TelegramClient {
    http: reqwest::Client,
    base: String,
}

impl TelegramClient {
    pub fn new(token: &str) -> Self {
        TelegramClient {
            http: reqwest::Client::new(),
            base: format!("https://api.telegram.org/bot{token}"),
        }
    }

    /// Long-polls for new updates. `offset` must be one past the last
    /// update_id already processed, or None on the first call.
    pub async fn get_updates(&self, offset: Option<i64>, timeout_secs: u64) -> Result<Vec<Update>> {
        #[derive(Serialize)]
        struct Req {
            timeout: u64,
            #[serde(skip_serializing_if = "Option::is_none")]
            offset: Option<i64>,
            allowed_updates: &'static [&'static str],
        }

        let body = Req {
            timeout: timeout_secs,
            offset,
            allowed_updates: &["message"],
        };

        let resp: ApiResponse<Vec<Update>> = self
            .call("getUpdates", &body)
            .await
            .context("getUpdates request")?;
        resp.into_result("getUpdates")
    }

    pub async fn send_message(&self, chat_id: i64, text: &str, html: bool) -> Result<()> {
        #[derive(Serialize)]
        struct Req<'a> {
            chat_id: i64,
            text: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            parse_mode: Option<&'a str>,
        }

        let body = Req {
            chat_id,
            text,
            parse_mode: html.then_some("HTML"),
        };

        let resp: ApiResponse<Message> = self
            .call("sendMessage", &body)
            .await
            .context("sendMessage request")?;
        resp.into_result("sendMessage")?;
        Ok(())
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> Result<ApiResponse<T>>
    where
        B: Serialize,
        T: serde::de::DeserializeOwned,
    {
        let resp = self
            .http
            .post(format!("{}/{method}", self.base))
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            bail!("telegram error: {status} {txt}");
        }

        resp.json().await.context("parse telegram response")
    }
}

/// Every Bot API method answers `{ok, result}` or `{ok: false, description}`.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

impl<T> ApiResponse<T> {
    fn into_result(self, method: &str) -> Result<T> {
        if !self.ok {
            bail!(
                "{method} failed: {}",
                self.description.unwrap_or_else(|| "unknown error".to_string())
            );
        }
        self.result
            .ok_or_else(|| anyhow::anyhow!("{method} returned ok without a result"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_a_text_update() {
        let raw = r#"{
            "update_id": 42,
            "message": {
                "message_id": 7,
                "from": {"id": 1, "is_bot": false, "first_name": "Ana"},
                "chat": {"id": 99, "type": "private"},
                "text": "50,Café,Efectivo"
            }
        }"#;
        let update: Update = serde_json::from_str(raw).unwrap();
        assert_eq!(update.update_id, 42);
        let message = update.message.unwrap();
        assert_eq!(message.chat.id, 99);
        assert_eq!(message.from.unwrap().first_name, "Ana");
        assert_eq!(message.text.as_deref(), Some("50,Café,Efectivo"));
    }

    #[test]
    fn tolerates_non_text_updates() {
        let update: Update = serde_json::from_str(r#"{"update_id": 1}"#).unwrap();
        assert!(update.message.is_none());
    }
}
