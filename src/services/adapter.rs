//! Behaviour shared by every provider adapter.

use std::future::Future;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::{AppError, AppResult};
use crate::models::Channel;

/// Common surface of email, SMS and chat adapters.
///
/// Channel traits (`EmailAdapter`, `SmsAdapter`, `NotifyAdapter`) extend this
/// with their `send` method. Adapters must be `Send + Sync` so a single
/// instance can be shared behind an `Arc` by every caller.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Returns the provider name for logging/debugging
    ///
    /// # Returns
    /// Static string identifying the adapter (e.g., "brevo", "mock")
    fn name(&self) -> &'static str;

    /// Verifies the adapter can talk to its provider (optional, default no-op)
    ///
    /// Called once by the provider selector right after construction. A
    /// failure makes the selector fall back to the mock adapter.
    async fn validate_config(&self) -> AppResult<()> {
        Ok(())
    }
}

/// Fails with a configuration error when a required credential is blank.
pub(crate) fn require(key: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::Configuration {
            key: key.to_string(),
            source: anyhow::anyhow!("value is required"),
        });
    }
    Ok(())
}

/// Joins `base` and `path` without doubling the slash.
pub(crate) fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Races an adapter call against `cancel`.
///
/// Dropping the losing future aborts the in-flight HTTP request. Adapter
/// errors are wrapped with the channel; cancellation is returned as-is.
pub(crate) async fn deliver<T, F>(
    channel: Channel,
    cancel: &CancellationToken,
    send: F,
) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(AppError::Cancelled),
        result = send => result.map_err(|e| AppError::delivery(channel, e)),
    }
}
