//! Minimal Telegram Bot API client.
//!
//! Blocking HTTP with long polling: `get_updates` blocks server-side
//! until an update arrives or the poll timeout elapses, and the caller
//! fully handles each update (reply sent) before asking for the next.
//! The router only needs the send side, expressed as [`ChatTransport`].

use serde::Deserialize;

use crate::error::BotError;

const BASE_URL: &str = "https://api.telegram.org";

/// Long-poll timeout passed to getUpdates, in seconds.
pub(crate) const POLL_TIMEOUT_SECS: u64 = 50;

/// Envelope every Bot API method responds with.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: serde::Deserialize<'de>"))]
struct ApiResponse<T> {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    result: Option<T>,
}

/// One long-poll update.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Message {
    pub message_id: i64,
    #[serde(default)]
    pub from: Option<User>,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct User {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Chat {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
struct Me {
    #[serde(default)]
    username: Option<String>,
}

/// Send side of the chat transport. The router depends only on this,
/// so tests can swap in a recording fake.
pub(crate) trait ChatTransport {
    fn send_reply(
        &self,
        chat_id: i64,
        reply_to: Option<i64>,
        text: &str,
    ) -> Result<(), BotError>;
}

pub(crate) struct TelegramClient {
    http: reqwest::blocking::Client,
    base: String,
}

impl TelegramClient {
    pub(crate) fn new(token: &str) -> Result<Self, BotError> {
        // Client timeout must outlast the server-side long-poll window.
        let http = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(POLL_TIMEOUT_SECS + 15))
            .build()
            .map_err(|e| BotError::transport(e.to_string()))?;
        Ok(Self {
            http,
            base: format!("{BASE_URL}/bot{token}"),
        })
    }

    /// Validate the token and fetch the bot's username.
    pub(crate) fn get_me(&self) -> Result<String, BotError> {
        let me: Me = self.call("getMe", &serde_json::json!({}))?;
        Ok(me.username.unwrap_or_else(|| "unknown".to_string()))
    }

    /// Long-poll for updates with ids at or after `offset`.
    pub(crate) fn get_updates(&self, offset: i64) -> Result<Vec<Update>, BotError> {
        self.call(
            "getUpdates",
            &serde_json::json!({
                "offset": offset,
                "timeout": POLL_TIMEOUT_SECS,
                "allowed_updates": ["message"],
            }),
        )
    }

    fn call<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        body: &serde_json::Value,
    ) -> Result<T, BotError> {
        let resp = self
            .http
            .post(format!("{}/{}", self.base, method))
            .json(body)
            .send()
            .map_err(|e| BotError::transport(format!("{method}: {e}")))?;

        let status = resp.status();
        let parsed: ApiResponse<T> = resp
            .json()
            .map_err(|e| BotError::transport(format!("{method}: invalid response: {e}")))?;

        if !parsed.ok {
            let desc = parsed
                .description
                .unwrap_or_else(|| format!("HTTP {status}"));
            return Err(BotError::transport(format!("{method}: {desc}")));
        }
        parsed
            .result
            .ok_or_else(|| BotError::transport(format!("{method}: empty result")))
    }
}

impl ChatTransport for TelegramClient {
    fn send_reply(
        &self,
        chat_id: i64,
        reply_to: Option<i64>,
        text: &str,
    ) -> Result<(), BotError> {
        let mut body = serde_json::json!({ "chat_id": chat_id, "text": text });
        if let Some(id) = reply_to {
            body["reply_to_message_id"] = id.into();
        }
        let _: Message = self.call("sendMessage", &body)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_deserializes_from_wire_shape() {
        let raw = r#"{
            "update_id": 7,
            "message": {
                "message_id": 12,
                "from": {"id": 42, "is_bot": false, "first_name": "A"},
                "chat": {"id": 99, "type": "private"},
                "text": "racing"
            }
        }"#;
        let update: Update = serde_json::from_str(raw).unwrap();
        assert_eq!(update.update_id, 7);
        let message = update.message.unwrap();
        assert_eq!(message.message_id, 12);
        assert_eq!(message.from.unwrap().id, 42);
        assert_eq!(message.chat.id, 99);
        assert_eq!(message.text.as_deref(), Some("racing"));
    }

    #[test]
    fn non_text_update_deserializes() {
        let raw = r#"{"update_id": 8, "message": {"message_id": 1, "chat": {"id": 5}}}"#;
        let update: Update = serde_json::from_str(raw).unwrap();
        let message = update.message.unwrap();
        assert!(message.text.is_none());
        assert!(message.from.is_none());
    }

    #[test]
    fn api_error_envelope_parses() {
        let raw = r#"{"ok": false, "error_code": 401, "description": "Unauthorized"}"#;
        let parsed: ApiResponse<Vec<Update>> = serde_json::from_str(raw).unwrap();
        assert!(!parsed.ok);
        assert_eq!(parsed.description.as_deref(), Some("Unauthorized"));
        assert!(parsed.result.is_none());
    }
}
