//! Chat notification channel: adapter trait, Telegram and the service.

mod mock;
mod service;
mod telegram;

pub use mock::MockNotifyAdapter;
pub use service::NotifyService;
pub use telegram::TelegramAdapter;

use async_trait::async_trait;

use super::adapter::ProviderAdapter;
use crate::error::AppResult;
use crate::models::{Content, DeliveryReceipt};

/// A chat notification provider
#[async_trait]
pub trait NotifyAdapter: ProviderAdapter {
    async fn send(&self, content: &Content) -> AppResult<DeliveryReceipt>;
}
