//! Brevo transactional email adapter.
//!
//! Brevo API Reference: https://developers.brevo.com/reference/sendtransacemail

use std::time::Instant;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use super::EmailAdapter;
use crate::config::BrevoConfig;
use crate::error::AppResult;
use crate::external::HTTP_CLIENT;
use crate::external::response::dispatch;
use crate::models::{DeliveryReceipt, Email};
use crate::services::adapter::{ProviderAdapter, endpoint, require};

const NAME: &str = "brevo";

#[derive(Debug, Default, Deserialize)]
struct SendResponse {
    #[serde(rename = "messageId")]
    message_id: Option<String>,
}

/// Sends email through `POST {base_url}/smtp/email`
#[derive(Debug, Clone)]
pub struct BrevoEmailAdapter {
    api_key: String,
    sender_email: String,
    sender_name: String,
    url: String,
}

impl BrevoEmailAdapter {
    /// Requires `brevo.api_key` and `brevo.sender_email`
    pub fn new(config: &BrevoConfig) -> AppResult<Self> {
        require("brevo.api_key", &config.api_key)?;
        require("brevo.sender_email", &config.sender_email)?;

        Ok(Self {
            api_key: config.api_key.clone(),
            sender_email: config.sender_email.clone(),
            sender_name: config.sender_name.clone(),
            url: endpoint(&config.base_url, "smtp/email"),
        })
    }

    fn build_request_body(&self, email: &Email) -> Value {
        let recipients = |list: &[String]| -> Value {
            list.iter().map(|addr| json!({ "email": addr })).collect()
        };

        let mut sender = json!({ "email": self.sender_email });
        if !self.sender_name.is_empty() {
            sender["name"] = json!(self.sender_name);
        }

        let mut body = json!({
            "sender": sender,
            "to": recipients(email.to.as_slice()),
            "subject": email.subject,
            "textContent": email.body,
        });

        // Brevo rejects empty cc/bcc arrays
        if !email.cc.is_empty() {
            body["cc"] = recipients(email.cc.as_slice());
        }
        if !email.bcc.is_empty() {
            body["bcc"] = recipients(email.bcc.as_slice());
        }
        if let Some(html) = email.html_part() {
            body["htmlContent"] = json!(html);
        }

        body
    }
}

#[async_trait]
impl ProviderAdapter for BrevoEmailAdapter {
    fn name(&self) -> &'static str {
        NAME
    }
}

#[async_trait]
impl EmailAdapter for BrevoEmailAdapter {
    async fn send(&self, email: &Email) -> AppResult<DeliveryReceipt> {
        let start = Instant::now();

        let request = HTTP_CLIENT
            .post(&self.url)
            .header("api-key", &self.api_key)
            .header("accept", "application/json")
            .json(&self.build_request_body(email));

        let response = dispatch(NAME, request).await?;
        let parsed: SendResponse = response.json().await.unwrap_or_default();
        let duration_ms = start.elapsed().as_millis() as u64;

        tracing::debug!(
            message_id = parsed.message_id.as_deref(),
            duration_ms,
            "Brevo accepted email"
        );

        Ok(DeliveryReceipt::new(NAME, parsed.message_id, duration_ms))
    }
}
