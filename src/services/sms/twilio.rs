//! Twilio Programmable Messaging adapter.
//!
//! Twilio API Reference: https://www.twilio.com/docs/messaging/api/message-resource

use std::time::Instant;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;

use super::SmsAdapter;
use crate::config::TwilioConfig;
use crate::error::{AppError, AppResult};
use crate::external::HTTP_CLIENT;
use crate::external::response::dispatch;
use crate::models::{DeliveryReceipt, Sms};
use crate::services::adapter::{ProviderAdapter, endpoint, require};

const NAME: &str = "twilio";

#[derive(Debug, Default, Deserialize)]
struct MessageResource {
    sid: Option<String>,
    status: Option<String>,
}

/// Where Twilio sends the message from
#[derive(Debug, Clone, PartialEq, Eq)]
enum Origin {
    MessagingService(String),
    Number(String),
}

/// Sends SMS through `POST {base_url}/2010-04-01/Accounts/{sid}/Messages.json`
#[derive(Debug, Clone)]
pub struct TwilioAdapter {
    account_sid: String,
    auth_token: String,
    origin: Origin,
    url: String,
}

impl TwilioAdapter {
    /// Requires `account_sid`, `auth_token` and one of `messaging_sid` or
    /// `from_number`; the messaging service wins when both are set
    pub fn new(config: &TwilioConfig) -> AppResult<Self> {
        require("twilio.account_sid", &config.account_sid)?;
        require("twilio.auth_token", &config.auth_token)?;

        let account_sid = config.account_sid.trim();
        if !account_sid.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(AppError::Configuration {
                key: "twilio.account_sid".to_string(),
                source: anyhow::anyhow!("account SID must be alphanumeric"),
            });
        }

        let origin = if !config.messaging_sid.trim().is_empty() {
            Origin::MessagingService(config.messaging_sid.clone())
        } else if !config.from_number.trim().is_empty() {
            Origin::Number(config.from_number.clone())
        } else {
            return Err(AppError::Configuration {
                key: "twilio.messaging_sid".to_string(),
                source: anyhow::anyhow!("either messaging_sid or from_number is required"),
            });
        };

        Ok(Self {
            url: endpoint(
                &config.base_url,
                &format!("2010-04-01/Accounts/{}/Messages.json", account_sid),
            ),
            account_sid: account_sid.to_string(),
            auth_token: config.auth_token.clone(),
            origin,
        })
    }

    fn build_form(&self, sms: &Sms) -> AppResult<String> {
        let origin = match &self.origin {
            Origin::MessagingService(sid) => ("MessagingServiceSid", sid.as_str()),
            Origin::Number(number) => ("From", number.as_str()),
        };
        let fields = [("To", sms.to.as_str()), ("Body", sms.message.as_str()), origin];

        serde_urlencoded::to_string(&fields[..]).map_err(|e| AppError::Internal {
            source: anyhow::Error::new(e).context("failed to encode Twilio form"),
        })
    }
}

#[async_trait]
impl ProviderAdapter for TwilioAdapter {
    fn name(&self) -> &'static str {
        NAME
    }
}

#[async_trait]
impl SmsAdapter for TwilioAdapter {
    async fn send(&self, sms: &Sms) -> AppResult<DeliveryReceipt> {
        let start = Instant::now();

        let request = HTTP_CLIENT
            .post(&self.url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(self.build_form(sms)?);

        let response = dispatch(NAME, request).await?;
        let message: MessageResource = response.json().await.unwrap_or_default();
        let duration_ms = start.elapsed().as_millis() as u64;

        tracing::debug!(
            message_sid = message.sid.as_deref(),
            status = message.status.as_deref(),
            duration_ms,
            "Twilio accepted SMS"
        );

        Ok(DeliveryReceipt::new(NAME, message.sid, duration_ms))
    }
}
