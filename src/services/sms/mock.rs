use async_trait::async_trait;
use tracing::info;

use super::SmsAdapter;
use crate::error::AppResult;
use crate::models::{DeliveryReceipt, Sms};
use crate::services::adapter::ProviderAdapter;

/// Logs the SMS instead of sending it
#[derive(Debug, Clone, Copy, Default)]
pub struct MockSmsAdapter;

#[async_trait]
impl ProviderAdapter for MockSmsAdapter {
    fn name(&self) -> &'static str {
        "mock"
    }
}

#[async_trait]
impl SmsAdapter for MockSmsAdapter {
    async fn send(&self, sms: &Sms) -> AppResult<DeliveryReceipt> {
        info!(to = %sms.to, message = %sms.message, "[mock] sms");
        Ok(DeliveryReceipt::new("mock", None, 0))
    }
}
