//! Brevo transactional SMS adapter.

use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::SmsAdapter;
use crate::config::BrevoConfig;
use crate::error::AppResult;
use crate::external::HTTP_CLIENT;
use crate::external::response::dispatch;
use crate::models::{DeliveryReceipt, Sms};
use crate::services::adapter::{ProviderAdapter, endpoint, require};

const NAME: &str = "brevo";

#[derive(Debug, Serialize)]
struct SendTransacSms<'a> {
    /// Alphanumeric (max 11 chars) or phone number
    sender: &'a str,
    recipient: &'a str,
    content: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Default, Deserialize)]
struct SendResponse {
    /// Numeric on current API versions
    #[serde(rename = "messageId")]
    message_id: Option<Value>,
}

/// Sends SMS through `POST {base_url}/transactionalSMS/sms`
#[derive(Debug, Clone)]
pub struct BrevoSmsAdapter {
    api_key: String,
    sender: String,
    url: String,
}

impl BrevoSmsAdapter {
    /// Requires `brevo.api_key` and `brevo.sms_sender`
    pub fn new(config: &BrevoConfig) -> AppResult<Self> {
        require("brevo.api_key", &config.api_key)?;
        require("brevo.sms_sender", &config.sms_sender)?;

        Ok(Self {
            api_key: config.api_key.clone(),
            sender: config.sms_sender.clone(),
            url: endpoint(&config.base_url, "transactionalSMS/sms"),
        })
    }
}

#[async_trait]
impl ProviderAdapter for BrevoSmsAdapter {
    fn name(&self) -> &'static str {
        NAME
    }
}

#[async_trait]
impl SmsAdapter for BrevoSmsAdapter {
    async fn send(&self, sms: &Sms) -> AppResult<DeliveryReceipt> {
        let start = Instant::now();

        let payload = SendTransacSms {
            sender: &self.sender,
            recipient: &sms.to,
            content: &sms.message,
            kind: "transactional",
        };
        let request = HTTP_CLIENT
            .post(&self.url)
            .header("api-key", &self.api_key)
            .header("accept", "application/json")
            .json(&payload);

        let response = dispatch(NAME, request).await?;
        let parsed: SendResponse = response.json().await.unwrap_or_default();
        let message_id = parsed.message_id.map(|id| match id {
            Value::String(s) => s,
            other => other.to_string(),
        });
        let duration_ms = start.elapsed().as_millis() as u64;

        tracing::debug!(message_id = message_id.as_deref(), duration_ms, "Brevo accepted SMS");

        Ok(DeliveryReceipt::new(NAME, message_id, duration_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use httpmock::prelude::*;
    use serde_json::json;

    fn config(base_url: String) -> BrevoConfig {
        BrevoConfig {
            api_key: "xkeysib-test".to_string(),
            sms_sender: "SendSen".to_string(),
            base_url,
            ..Default::default()
        }
    }

    #[test]
    fn test_new_requires_sms_sender() {
        let mut cfg = config("http://localhost".to_string());
        cfg.sms_sender.clear();
        let err = BrevoSmsAdapter::new(&cfg).unwrap_err();
        assert!(err.to_string().contains("brevo.sms_sender"));
    }

    #[tokio::test]
    async fn test_send_posts_documented_payload() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/transactionalSMS/sms")
                    .header("api-key", "xkeysib-test")
                    .json_body(json!({
                        "sender": "SendSen",
                        "recipient": "33612345678",
                        "content": "hello",
                        "type": "transactional"
                    }));
                then.status(201)
                    .json_body(json!({ "reference": "ab1cde2fgh3i4jklmno", "messageId": 1511882900176220u64 }));
            })
            .await;

        let adapter = BrevoSmsAdapter::new(&config(server.base_url())).unwrap();
        let receipt = adapter.send(&Sms::new("33612345678", "hello")).await.unwrap();

        mock.assert_async().await;
        assert_eq!(receipt.message_id.as_deref(), Some("1511882900176220"));
    }

    #[tokio::test]
    async fn test_send_maps_rejection() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/transactionalSMS/sms");
                then.status(402).body("{\"code\":\"not_enough_credits\"}");
            })
            .await;

        let adapter = BrevoSmsAdapter::new(&config(server.base_url())).unwrap();
        let err = adapter
            .send(&Sms::new("33612345678", "hello"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::ProviderResponse { provider: "brevo", status: 402, .. }
        ));
    }
}
