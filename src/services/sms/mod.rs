//! SMS channel: adapter trait, provider adapters and the service.

mod brevo;
mod mock;
mod service;
mod twilio;

pub use brevo::BrevoSmsAdapter;
pub use mock::MockSmsAdapter;
pub use service::SmsService;
pub use twilio::TwilioAdapter;

use async_trait::async_trait;

use super::adapter::ProviderAdapter;
use crate::error::AppResult;
use crate::models::{DeliveryReceipt, Sms};

/// An SMS provider
#[async_trait]
pub trait SmsAdapter: ProviderAdapter {
    async fn send(&self, sms: &Sms) -> AppResult<DeliveryReceipt>;
}
