//! Email channel: adapter trait, provider adapters and the service.

mod brevo;
mod mock;
mod sendgrid;
mod service;
mod templates;

pub use brevo::BrevoEmailAdapter;
pub use mock::MockEmailAdapter;
pub use sendgrid::SendGridAdapter;
pub use service::EmailService;

use async_trait::async_trait;

use super::adapter::ProviderAdapter;
use crate::error::AppResult;
use crate::models::{DeliveryReceipt, Email};

/// An email provider
///
/// Implementations map an [`Email`] onto one provider request. The message
/// has already been validated by [`EmailService`].
#[async_trait]
pub trait EmailAdapter: ProviderAdapter {
    async fn send(&self, email: &Email) -> AppResult<DeliveryReceipt>;
}
