//! Picks the adapter a service will use, degrading to the mock on failure.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use super::adapter::ProviderAdapter;
use crate::error::{AppError, AppResult};
use crate::models::Channel;

/// What the service factory could produce for the configured provider
pub(crate) enum Candidate<A: ?Sized> {
    /// `mock` was configured (or the key was absent)
    Mock,
    /// The provider name is accepted but has no adapter
    Unsupported,
    /// Result of constructing the real adapter
    Built(AppResult<Arc<A>>),
}

/// Resolves a `Candidate` into the adapter a service should hold.
///
/// A built adapter gets its `validate_config` hook run once. Construction or
/// verification failure falls back to `mock()` unless `strict` is set, in
/// which case the error is returned. Cancelling `cancel` while the hook is
/// running returns [`AppError::Cancelled`] in either mode.
pub(crate) async fn select<A, M>(
    channel: Channel,
    provider: &str,
    candidate: Candidate<A>,
    mock: M,
    strict: bool,
    cancel: &CancellationToken,
) -> AppResult<Arc<A>>
where
    A: ProviderAdapter + ?Sized,
    M: FnOnce() -> Arc<A>,
{
    let adapter = match candidate {
        Candidate::Mock => {
            info!(channel = channel.as_str(), "No provider configured, using mock adapter");
            return Ok(mock());
        }
        Candidate::Unsupported => {
            let err = AppError::Configuration {
                key: format!("adapter.{}", channel.as_str()),
                source: anyhow::anyhow!("provider '{}' has no adapter", provider),
            };
            if strict {
                return Err(err);
            }
            warn!(
                channel = channel.as_str(),
                provider,
                "Provider has no adapter, using mock adapter"
            );
            return Ok(mock());
        }
        Candidate::Built(Err(e)) => return fall_back(channel, provider, e, mock, strict),
        Candidate::Built(Ok(adapter)) => adapter,
    };

    let verified = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            warn!(channel = channel.as_str(), provider, "Adapter verification cancelled");
            return Err(AppError::Cancelled);
        }
        result = adapter.validate_config() => result,
    };
    if let Err(e) = verified {
        return fall_back(channel, provider, e, mock, strict);
    }

    info!(
        channel = channel.as_str(),
        adapter = adapter.name(),
        "Provider adapter ready"
    );
    Ok(adapter)
}

fn fall_back<A, M>(
    channel: Channel,
    provider: &str,
    err: AppError,
    mock: M,
    strict: bool,
) -> AppResult<Arc<A>>
where
    A: ?Sized,
    M: FnOnce() -> Arc<A>,
{
    error!(
        channel = channel.as_str(),
        provider,
        error = %err,
        strict,
        "Failed to initialise provider adapter"
    );
    if strict {
        return Err(err);
    }

    info!(channel = channel.as_str(), "Falling back to mock adapter");
    Ok(mock())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::time::{Duration, Instant};

    struct Named(&'static str, bool);

    #[async_trait]
    impl ProviderAdapter for Named {
        fn name(&self) -> &'static str {
            self.0
        }

        async fn validate_config(&self) -> AppResult<()> {
            if self.1 {
                Ok(())
            } else {
                Err(AppError::validation("token", "rejected by provider"))
            }
        }
    }

    struct Stalled;

    #[async_trait]
    impl ProviderAdapter for Stalled {
        fn name(&self) -> &'static str {
            "stalled"
        }

        async fn validate_config(&self) -> AppResult<()> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(())
        }
    }

    fn mock() -> Arc<dyn ProviderAdapter> {
        Arc::new(Named("mock", true))
    }

    fn built(name: &'static str, healthy: bool) -> Candidate<dyn ProviderAdapter> {
        Candidate::Built(Ok(Arc::new(Named(name, healthy)) as Arc<dyn ProviderAdapter>))
    }

    async fn pick(
        channel: Channel,
        provider: &str,
        candidate: Candidate<dyn ProviderAdapter>,
        strict: bool,
    ) -> AppResult<Arc<dyn ProviderAdapter>> {
        select(channel, provider, candidate, mock, strict, &CancellationToken::new()).await
    }

    #[tokio::test]
    async fn test_mock_candidate() {
        let adapter = pick(Channel::Email, "mock", Candidate::Mock, true).await.unwrap();
        assert_eq!(adapter.name(), "mock");
    }

    #[tokio::test]
    async fn test_healthy_adapter_is_kept() {
        let adapter = pick(Channel::Sms, "twilio", built("twilio", true), false)
            .await
            .unwrap();
        assert_eq!(adapter.name(), "twilio");
    }

    #[tokio::test]
    async fn test_construction_failure_falls_back() {
        let candidate = Candidate::Built(Err(AppError::Configuration {
            key: "brevo.api_key".to_string(),
            source: anyhow::anyhow!("value is required"),
        }));
        let adapter = pick(Channel::Email, "brevo", candidate, false).await.unwrap();
        assert_eq!(adapter.name(), "mock");
    }

    #[tokio::test]
    async fn test_verification_failure_falls_back() {
        let adapter = pick(Channel::Notify, "telegram", built("telegram", false), false)
            .await
            .unwrap();
        assert_eq!(adapter.name(), "mock");
    }

    #[tokio::test]
    async fn test_strict_propagates_failure() {
        let result = pick(Channel::Notify, "telegram", built("telegram", false), true).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_cancel_interrupts_verification() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let candidate = Candidate::Built(Ok(Arc::new(Stalled) as Arc<dyn ProviderAdapter>));
        let started = Instant::now();
        let result = select(Channel::Notify, "telegram", candidate, mock, false, &cancel).await;

        assert!(matches!(result, Err(AppError::Cancelled)));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_unsupported_provider() {
        let adapter = pick(Channel::Notify, "slack", Candidate::Unsupported, false)
            .await
            .unwrap();
        assert_eq!(adapter.name(), "mock");

        let err = pick(Channel::Notify, "slack", Candidate::Unsupported, true)
            .await
            .err()
            .unwrap();
        assert!(err.to_string().contains("adapter.notify"));
    }
}
