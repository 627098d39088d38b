use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};
use validator::Validate;

use super::{MockNotifyAdapter, NotifyAdapter, TelegramAdapter};
use crate::config::{NotifyProvider, Settings};
use crate::error::AppResult;
use crate::models::{Channel, Content, DeliveryReceipt, Level};
use crate::services::adapter::deliver;
use crate::services::selector::{self, Candidate};

/// Validates chat notifications and hands them to the configured provider
#[derive(Clone)]
pub struct NotifyService {
    provider: NotifyProvider,
    adapter: Arc<dyn NotifyAdapter>,
}

impl NotifyService {
    /// Builds the adapter selected by `adapter.notify`
    ///
    /// Telegram is verified with `getMe` before it is accepted. `slack` has
    /// no adapter and always resolves to the mock (or an error when strict).
    pub async fn new(settings: &Settings, cancel: &CancellationToken) -> AppResult<Self> {
        let provider = settings.adapter.notify;
        let candidate = match provider {
            NotifyProvider::Mock => Candidate::Mock,
            NotifyProvider::Telegram => Candidate::Built(
                TelegramAdapter::new(&settings.telegram)
                    .map(|a| Arc::new(a) as Arc<dyn NotifyAdapter>),
            ),
            NotifyProvider::Slack => Candidate::Unsupported,
        };

        let adapter = selector::select(
            Channel::Notify,
            provider.as_str(),
            candidate,
            || Arc::new(MockNotifyAdapter) as Arc<dyn NotifyAdapter>,
            settings.adapter.strict,
            cancel,
        )
        .await?;

        Ok(Self { provider, adapter })
    }

    pub fn with_adapter(provider: NotifyProvider, adapter: Arc<dyn NotifyAdapter>) -> Self {
        Self { provider, adapter }
    }

    pub fn service_name(&self) -> &'static str {
        self.provider.as_str()
    }

    pub fn adapter_name(&self) -> &'static str {
        self.adapter.name()
    }

    #[instrument(skip_all, fields(provider = self.service_name(), level = content.level.as_str()))]
    pub async fn send(
        &self,
        cancel: &CancellationToken,
        content: &Content,
    ) -> AppResult<DeliveryReceipt> {
        content.validate()?;

        let receipt = deliver(Channel::Notify, cancel, self.adapter.send(content)).await?;
        info!(
            adapter = receipt.provider,
            message_id = receipt.message_id.as_deref(),
            duration_ms = receipt.duration_ms,
            "Notification sent"
        );
        Ok(receipt)
    }

    /// Sends at [`Level::Error`]
    pub async fn alert(
        &self,
        cancel: &CancellationToken,
        subject: &str,
        message: &str,
    ) -> AppResult<DeliveryReceipt> {
        self.notify(cancel, subject, message, Level::Error).await
    }

    /// Sends at [`Level::Info`]
    pub async fn info(
        &self,
        cancel: &CancellationToken,
        subject: &str,
        message: &str,
    ) -> AppResult<DeliveryReceipt> {
        self.notify(cancel, subject, message, Level::Info).await
    }

    pub async fn notify(
        &self,
        cancel: &CancellationToken,
        subject: &str,
        message: &str,
        level: Level,
    ) -> AppResult<DeliveryReceipt> {
        let content = Content::new(message)
            .with_subject(subject)
            .with_level(level);
        self.send(cancel, &content).await
    }
}
