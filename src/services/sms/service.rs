use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};
use validator::Validate;

use super::{BrevoSmsAdapter, MockSmsAdapter, SmsAdapter, TwilioAdapter};
use crate::config::{Settings, SmsProvider};
use crate::error::AppResult;
use crate::models::{Channel, DeliveryReceipt, Sms};
use crate::services::adapter::deliver;
use crate::services::selector::{self, Candidate};

/// Validates SMS messages and hands them to the configured provider
#[derive(Clone)]
pub struct SmsService {
    provider: SmsProvider,
    adapter: Arc<dyn SmsAdapter>,
}

impl SmsService {
    pub async fn new(settings: &Settings, cancel: &CancellationToken) -> AppResult<Self> {
        let provider = settings.adapter.sms;
        let candidate = match provider {
            SmsProvider::Mock => Candidate::Mock,
            SmsProvider::Brevo => Candidate::Built(
                BrevoSmsAdapter::new(&settings.brevo).map(|a| Arc::new(a) as Arc<dyn SmsAdapter>),
            ),
            SmsProvider::Twilio => Candidate::Built(
                TwilioAdapter::new(&settings.twilio).map(|a| Arc::new(a) as Arc<dyn SmsAdapter>),
            ),
        };

        let adapter = selector::select(
            Channel::Sms,
            provider.as_str(),
            candidate,
            || Arc::new(MockSmsAdapter) as Arc<dyn SmsAdapter>,
            settings.adapter.strict,
            cancel,
        )
        .await?;

        Ok(Self { provider, adapter })
    }

    pub fn with_adapter(provider: SmsProvider, adapter: Arc<dyn SmsAdapter>) -> Self {
        Self { provider, adapter }
    }

    pub fn service_name(&self) -> &'static str {
        self.provider.as_str()
    }

    pub fn adapter_name(&self) -> &'static str {
        self.adapter.name()
    }

    #[instrument(skip_all, fields(provider = self.service_name()))]
    pub async fn send_sms(&self, cancel: &CancellationToken, sms: &Sms) -> AppResult<DeliveryReceipt> {
        sms.validate()?;

        let receipt = deliver(Channel::Sms, cancel, self.adapter.send(sms)).await?;
        info!(
            adapter = receipt.provider,
            message_id = receipt.message_id.as_deref(),
            duration_ms = receipt.duration_ms,
            "SMS sent"
        );
        Ok(receipt)
    }

    /// Sends a one-time code that expires in 10 minutes
    pub async fn send_code(
        &self,
        cancel: &CancellationToken,
        to: &str,
        code: &str,
    ) -> AppResult<DeliveryReceipt> {
        let message = format!(
            "Your verification code is: {}. This code will expire in 10 minutes.",
            code
        );
        self.send_sms(cancel, &Sms::new(to, message)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::services::adapter::ProviderAdapter;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
        last: std::sync::Mutex<Option<Sms>>,
        delay: Option<Duration>,
    }

    #[async_trait]
    impl ProviderAdapter for Counting {
        fn name(&self) -> &'static str {
            "counting"
        }
    }

    #[async_trait]
    impl SmsAdapter for Counting {
        async fn send(&self, sms: &Sms) -> AppResult<DeliveryReceipt> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some(sms.clone());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            Ok(DeliveryReceipt::new("counting", None, 0))
        }
    }

    #[tokio::test]
    async fn test_empty_recipient_rejected_before_dispatch() {
        let adapter = Arc::new(Counting::default());
        let service = SmsService::with_adapter(SmsProvider::Twilio, adapter.clone());

        let err = service
            .send_sms(&CancellationToken::new(), &Sms::new("", "hello"))
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("recipient"));
        assert_eq!(adapter.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_message_rejected() {
        let adapter = Arc::new(Counting::default());
        let service = SmsService::with_adapter(SmsProvider::Twilio, adapter.clone());

        let err = service
            .send_sms(&CancellationToken::new(), &Sms::new("+15550100", ""))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("sms message cannot be empty"));
        assert_eq!(adapter.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_send_code_message() {
        let adapter = Arc::new(Counting::default());
        let service = SmsService::with_adapter(SmsProvider::Brevo, adapter.clone());

        service
            .send_code(&CancellationToken::new(), "+15550100", "824193")
            .await
            .unwrap();

        let last = adapter.last.lock().unwrap().clone().unwrap();
        assert_eq!(last.to, "+15550100");
        assert_eq!(
            last.message,
            "Your verification code is: 824193. This code will expire in 10 minutes."
        );
    }

    #[tokio::test]
    async fn test_cancel_aborts_slow_provider() {
        let adapter = Arc::new(Counting {
            delay: Some(Duration::from_secs(30)),
            ..Default::default()
        });
        let service = SmsService::with_adapter(SmsProvider::Twilio, adapter.clone());
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let err = service
            .send_sms(&cancel, &Sms::new("+15550100", "hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Cancelled));
        assert_eq!(adapter.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_twilio_without_origin_falls_back() {
        let mut settings = Settings::default();
        settings.adapter.sms = SmsProvider::Twilio;
        settings.twilio.account_sid = "AC123".to_string();
        settings.twilio.auth_token = "secret".to_string();

        let service = SmsService::new(&settings, &CancellationToken::new()).await.unwrap();
        assert_eq!(service.service_name(), "twilio");
        assert_eq!(service.adapter_name(), "mock");

        let receipt = service
            .send_sms(&CancellationToken::new(), &Sms::new("+15550100", "hello"))
            .await
            .unwrap();
        assert_eq!(receipt.provider, "mock");
    }
}
