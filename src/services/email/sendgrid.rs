//! SendGrid v3 mail send adapter.

use std::time::Instant;

use async_trait::async_trait;
use serde::Serialize;

use super::EmailAdapter;
use crate::config::SendGridConfig;
use crate::error::AppResult;
use crate::external::HTTP_CLIENT;
use crate::external::response::dispatch;
use crate::models::{DeliveryReceipt, Email};
use crate::services::adapter::{ProviderAdapter, endpoint, require};

const NAME: &str = "sendgrid";

#[derive(Debug, Serialize)]
struct Address<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

impl<'a> Address<'a> {
    fn bare(email: &'a str) -> Self {
        Self { email, name: None }
    }
}

#[derive(Debug, Serialize)]
struct Personalization<'a> {
    to: Vec<Address<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    cc: Vec<Address<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    bcc: Vec<Address<'a>>,
}

#[derive(Debug, Serialize)]
struct ContentPart<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    value: &'a str,
}

#[derive(Debug, Serialize)]
struct MailSend<'a> {
    personalizations: [Personalization<'a>; 1],
    from: Address<'a>,
    subject: &'a str,
    /// text/plain must come before text/html
    content: Vec<ContentPart<'a>>,
}

/// Sends email through `POST {base_url}/v3/mail/send`
#[derive(Debug, Clone)]
pub struct SendGridAdapter {
    api_key: String,
    from_email: String,
    from_name: String,
    url: String,
}

impl SendGridAdapter {
    /// Requires `sendgrid.api_key` and `sendgrid.from_email`
    pub fn new(config: &SendGridConfig) -> AppResult<Self> {
        require("sendgrid.api_key", &config.api_key)?;
        require("sendgrid.from_email", &config.from_email)?;

        Ok(Self {
            api_key: config.api_key.clone(),
            from_email: config.from_email.clone(),
            from_name: config.from_name.clone(),
            url: endpoint(&config.base_url, "v3/mail/send"),
        })
    }

    fn build_request_body<'a>(&'a self, email: &'a Email) -> MailSend<'a> {
        let addresses = |list: &'a [String]| -> Vec<Address<'a>> {
            list.iter().map(|a| Address::bare(a)).collect()
        };

        let mut content = vec![ContentPart {
            kind: "text/plain",
            value: &email.body,
        }];
        if let Some(html) = email.html_part() {
            content.push(ContentPart {
                kind: "text/html",
                value: html,
            });
        }

        MailSend {
            personalizations: [Personalization {
                to: addresses(email.to.as_slice()),
                cc: addresses(email.cc.as_slice()),
                bcc: addresses(email.bcc.as_slice()),
            }],
            from: Address {
                email: &self.from_email,
                name: Some(self.from_name.as_str()).filter(|n| !n.is_empty()),
            },
            subject: &email.subject,
            content,
        }
    }
}

#[async_trait]
impl ProviderAdapter for SendGridAdapter {
    fn name(&self) -> &'static str {
        NAME
    }
}

#[async_trait]
impl EmailAdapter for SendGridAdapter {
    async fn send(&self, email: &Email) -> AppResult<DeliveryReceipt> {
        let start = Instant::now();

        let request = HTTP_CLIENT
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&self.build_request_body(email));

        let response = dispatch(NAME, request).await?;
        let message_id = response
            .headers()
            .get("x-message-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let duration_ms = start.elapsed().as_millis() as u64;

        tracing::debug!(
            message_id = message_id.as_deref(),
            duration_ms,
            "SendGrid accepted email"
        );

        Ok(DeliveryReceipt::new(NAME, message_id, duration_ms))
    }
}
