use async_trait::async_trait;
use tracing::info;

use super::EmailAdapter;
use crate::error::AppResult;
use crate::models::{DeliveryReceipt, Email};
use crate::services::adapter::ProviderAdapter;

/// Logs the email instead of sending it
#[derive(Debug, Clone, Copy, Default)]
pub struct MockEmailAdapter;

#[async_trait]
impl ProviderAdapter for MockEmailAdapter {
    fn name(&self) -> &'static str {
        "mock"
    }
}

#[async_trait]
impl EmailAdapter for MockEmailAdapter {
    async fn send(&self, email: &Email) -> AppResult<DeliveryReceipt> {
        info!(
            to = ?email.to,
            cc = ?email.cc,
            bcc = ?email.bcc,
            subject = %email.subject,
            body = %email.body,
            html = email.html_part().is_some(),
            "[mock] email"
        );
        Ok(DeliveryReceipt::new("mock", None, 0))
    }
}
