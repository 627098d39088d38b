//! Message services and their provider adapters.
//!
//! Each channel exposes a service that validates a message, then hands it
//! to exactly one adapter chosen from configuration at startup.

pub mod adapter;
pub mod email;
pub mod notify;
pub(crate) mod selector;
pub mod sms;

pub use adapter::ProviderAdapter;
pub use email::{EmailAdapter, EmailService};
pub use notify::{NotifyAdapter, NotifyService};
pub use sms::{SmsAdapter, SmsService};

use tokio_util::sync::CancellationToken;

use crate::config::Settings;
use crate::error::AppResult;

/// Aggregates all services for convenient access.
///
/// Cloning is cheap since adapters are shared behind `Arc`.
#[derive(Clone)]
pub struct Services {
    pub email: EmailService,
    pub sms: SmsService,
    pub notify: NotifyService,
}

impl Services {
    /// Builds every channel from `settings`, selecting adapters concurrently
    ///
    /// Cancelling `cancel` aborts any provider verification still running.
    pub async fn new(settings: &Settings, cancel: &CancellationToken) -> AppResult<Self> {
        let (email, sms, notify) = tokio::try_join!(
            EmailService::new(settings, cancel),
            SmsService::new(settings, cancel),
            NotifyService::new(settings, cancel),
        )?;

        Ok(Self { email, sms, notify })
    }
}
