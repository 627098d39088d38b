//! Telegram Bot API adapter.
//!
//! Bot API Reference: https://core.telegram.org/bots/api#sendmessage

use std::time::Instant;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, info};

use super::NotifyAdapter;
use crate::config::TelegramConfig;
use crate::error::{AppError, AppResult};
use crate::external::HTTP_CLIENT;
use crate::external::response::dispatch;
use crate::models::{Content, DeliveryReceipt, ParseMode};
use crate::services::adapter::{ProviderAdapter, endpoint, require};

const NAME: &str = "telegram";

/// Envelope every Bot API method answers with
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    result: Option<T>,
}

#[derive(Debug, Deserialize)]
struct Message {
    message_id: i64,
}

#[derive(Debug, Deserialize)]
struct User {
    #[serde(default)]
    username: Option<String>,
}

/// Posts chat messages through `POST {api_url}/bot{token}/sendMessage`
#[derive(Clone)]
pub struct TelegramAdapter {
    /// `{api_url}/bot{token}`; never logged
    bot_url: String,
    chat_id: Value,
    debug: bool,
}

impl std::fmt::Debug for TelegramAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramAdapter")
            .field("chat_id", &self.chat_id)
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}

impl TelegramAdapter {
    /// Requires `telegram.bot_token` and `telegram.chat_id`
    ///
    /// A numeric chat id is sent as a number, anything else (e.g.
    /// `@channelname`) as a string.
    pub fn new(config: &TelegramConfig) -> AppResult<Self> {
        require("telegram.bot_token", &config.bot_token)?;
        require("telegram.chat_id", &config.chat_id)?;

        let chat_id = match config.chat_id.trim().parse::<i64>() {
            Ok(id) => json!(id),
            Err(_) => json!(config.chat_id.trim()),
        };

        Ok(Self {
            bot_url: endpoint(&config.api_url, &format!("bot{}", config.bot_token)),
            chat_id,
            debug: config.debug,
        })
    }

    fn method_url(&self, method: &str) -> String {
        endpoint(&self.bot_url, method)
    }

    /// `Subject: <subject>\n\n<message>` when a subject is present
    fn render_text(content: &Content) -> String {
        match content.subject() {
            Some(subject) => format!("Subject: {}\n\n{}", subject, content.message),
            None => content.message.clone(),
        }
    }

    /// Without an explicit parse mode the text is sent as HTML with `<`, `>`
    /// and `&` escaped, so plain text always renders verbatim. An explicit
    /// mode sends the text untouched.
    fn build_request_body(&self, content: &Content) -> Value {
        let text = Self::render_text(content);
        let (parse_mode, text) = match content.parse_mode {
            Some(mode) => (mode, text),
            None => (ParseMode::Html, escape_html_text(&text)),
        };
        json!({
            "chat_id": self.chat_id,
            "text": text,
            "parse_mode": parse_mode.as_str(),
        })
    }

    async fn call<T>(&self, request: reqwest::RequestBuilder) -> AppResult<T>
    where
        T: DeserializeOwned + Send,
    {
        let response = dispatch(NAME, request).await?;
        let status = response.status().as_u16();
        let raw = response
            .text()
            .await
            .map_err(|source| AppError::Transport {
                provider: NAME,
                source,
            })?;

        if self.debug {
            debug!(status, body = %raw, "Telegram response");
        }

        let envelope: ApiResponse<T> = serde_json::from_str(&raw).map_err(|e| AppError::Internal {
            source: anyhow::Error::new(e).context("unexpected Telegram response"),
        })?;

        match envelope {
            ApiResponse {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            ApiResponse { description, .. } => Err(AppError::ProviderResponse {
                provider: NAME,
                status,
                body: description.unwrap_or(raw),
            }),
        }
    }
}

/// The three characters Telegram's HTML parser requires escaped
fn escape_html_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

#[async_trait]
impl ProviderAdapter for TelegramAdapter {
    fn name(&self) -> &'static str {
        NAME
    }

    /// Calls `getMe` to confirm the bot token is accepted
    async fn validate_config(&self) -> AppResult<()> {
        let me: User = self.call(HTTP_CLIENT.get(self.method_url("getMe"))).await?;
        info!(
            bot_username = me.username.as_deref().unwrap_or_default(),
            "Telegram bot token verified"
        );
        Ok(())
    }
}

#[async_trait]
impl NotifyAdapter for TelegramAdapter {
    async fn send(&self, content: &Content) -> AppResult<DeliveryReceipt> {
        let start = Instant::now();
        let body = self.build_request_body(content);

        if self.debug {
            debug!(payload = %body, "Telegram sendMessage request");
        }

        let message: Message = self
            .call(HTTP_CLIENT.post(self.method_url("sendMessage")).json(&body))
            .await?;
        let duration_ms = start.elapsed().as_millis() as u64;

        Ok(DeliveryReceipt::new(
            NAME,
            Some(message.message_id.to_string()),
            duration_ms,
        ))
    }
}
