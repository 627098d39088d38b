use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};
use validator::Validate;

use super::templates;
use super::{BrevoEmailAdapter, EmailAdapter, MockEmailAdapter, SendGridAdapter};
use crate::config::{EmailProvider, Settings};
use crate::error::AppResult;
use crate::models::{Channel, DeliveryReceipt, Email};
use crate::services::adapter::deliver;
use crate::services::selector::{self, Candidate};

/// Validates emails and hands them to the configured provider
#[derive(Clone)]
pub struct EmailService {
    provider: EmailProvider,
    adapter: Arc<dyn EmailAdapter>,
}

impl EmailService {
    /// Builds the adapter selected by `adapter.email`
    ///
    /// Falls back to [`MockEmailAdapter`] when the provider cannot be built,
    /// unless `adapter.strict` is set.
    pub async fn new(settings: &Settings, cancel: &CancellationToken) -> AppResult<Self> {
        let provider = settings.adapter.email;
        let candidate = match provider {
            EmailProvider::Mock => Candidate::Mock,
            EmailProvider::Brevo => Candidate::Built(
                BrevoEmailAdapter::new(&settings.brevo)
                    .map(|a| Arc::new(a) as Arc<dyn EmailAdapter>),
            ),
            EmailProvider::SendGrid => Candidate::Built(
                SendGridAdapter::new(&settings.sendgrid)
                    .map(|a| Arc::new(a) as Arc<dyn EmailAdapter>),
            ),
        };

        let adapter = selector::select(
            Channel::Email,
            provider.as_str(),
            candidate,
            || Arc::new(MockEmailAdapter) as Arc<dyn EmailAdapter>,
            settings.adapter.strict,
            cancel,
        )
        .await?;

        Ok(Self { provider, adapter })
    }

    /// Uses `adapter` as-is, skipping provider selection
    pub fn with_adapter(provider: EmailProvider, adapter: Arc<dyn EmailAdapter>) -> Self {
        Self { provider, adapter }
    }

    /// The configured provider, even when the mock was substituted
    pub fn service_name(&self) -> &'static str {
        self.provider.as_str()
    }

    /// The adapter that actually delivers
    pub fn adapter_name(&self) -> &'static str {
        self.adapter.name()
    }

    #[instrument(
        skip_all,
        fields(provider = self.service_name(), recipients = email.to.len())
    )]
    pub async fn send_email(
        &self,
        cancel: &CancellationToken,
        email: &Email,
    ) -> AppResult<DeliveryReceipt> {
        email.validate()?;

        let receipt = deliver(Channel::Email, cancel, self.adapter.send(email)).await?;
        info!(
            adapter = receipt.provider,
            message_id = receipt.message_id.as_deref(),
            duration_ms = receipt.duration_ms,
            "Email sent"
        );
        Ok(receipt)
    }

    pub async fn send_password_reset(
        &self,
        cancel: &CancellationToken,
        to: &str,
        link: &str,
    ) -> AppResult<DeliveryReceipt> {
        let email = Email::new(
            to,
            "Password Reset Request",
            format!(
                "You have requested to reset your password. Click the link to continue: {}",
                link
            ),
        )
        .with_html(templates::render(templates::PASSWORD_RESET, &[("link", link)]));

        self.send_email(cancel, &email).await
    }

    pub async fn send_verification_code(
        &self,
        cancel: &CancellationToken,
        to: &str,
        code: &str,
    ) -> AppResult<DeliveryReceipt> {
        let email = Email::new(
            to,
            "Your Verification Code",
            format!(
                "Your verification code is: {}. This code will expire in 10 minutes.",
                code
            ),
        )
        .with_html(templates::render(templates::VERIFICATION_CODE, &[("code", code)]));

        self.send_email(cancel, &email).await
    }

    pub async fn send_welcome(
        &self,
        cancel: &CancellationToken,
        to: &str,
        name: &str,
    ) -> AppResult<DeliveryReceipt> {
        let email = Email::new(
            to,
            "Welcome to MyService!",
            format!(
                "Hello {}, Welcome to MyService! Explore our amazing features right now.",
                name
            ),
        )
        .with_html(templates::render(templates::WELCOME, &[("name", name)]));

        self.send_email(cancel, &email).await
    }

    /// Security notice for a login from an unfamiliar location
    pub async fn send_warning_login(
        &self,
        cancel: &CancellationToken,
        to: &str,
        location: &str,
        time: &str,
    ) -> AppResult<DeliveryReceipt> {
        let email = Email::new(
            to,
            "Security Alert: New Login Detected",
            format!(
                "We detected a new login to your account from {} at {}. \
                 If this wasn't you, please secure your account immediately.",
                location, time
            ),
        )
        .with_html(templates::render(
            templates::WARNING_LOGIN,
            &[("location", location), ("time", time)],
        ));

        self.send_email(cancel, &email).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::services::adapter::ProviderAdapter;
    use async_trait::async_trait;
    use proptest::prelude::*;
    use std::sync::Mutex;

    /// Records every email it is asked to send
    #[derive(Default)]
    struct Recording {
        sent: Mutex<Vec<Email>>,
        fail: bool,
    }

    #[async_trait]
    impl ProviderAdapter for Recording {
        fn name(&self) -> &'static str {
            "recording"
        }
    }

    #[async_trait]
    impl EmailAdapter for Recording {
        async fn send(&self, email: &Email) -> AppResult<DeliveryReceipt> {
            self.sent.lock().unwrap().push(email.clone());
            if self.fail {
                return Err(AppError::ProviderResponse {
                    provider: "recording",
                    status: 500,
                    body: "boom".to_string(),
                });
            }
            Ok(DeliveryReceipt::new("recording", Some("id-1".to_string()), 1))
        }
    }

    fn service(adapter: Arc<Recording>) -> EmailService {
        EmailService::with_adapter(EmailProvider::Brevo, adapter)
    }

    #[tokio::test]
    async fn test_mock_when_no_provider_configured() {
        let service = EmailService::new(&Settings::default(), &CancellationToken::new())
            .await
            .unwrap();
        let email = Email::new("a@b.com", "Hi", "x");

        let receipt = service
            .send_email(&CancellationToken::new(), &email)
            .await
            .unwrap();
        assert_eq!(receipt.provider, "mock");
        assert_eq!(service.service_name(), "mock");
    }

    #[tokio::test]
    async fn test_service_name_survives_fallback() {
        let mut settings = Settings::default();
        settings.adapter.email = EmailProvider::SendGrid;

        let service = EmailService::new(&settings, &CancellationToken::new()).await.unwrap();
        assert_eq!(service.service_name(), "sendgrid");
        assert_eq!(service.adapter_name(), "mock");
    }

    #[tokio::test]
    async fn test_strict_mode_rejects_missing_credentials() {
        let mut settings = Settings::default();
        settings.adapter.email = EmailProvider::Brevo;
        settings.adapter.strict = true;

        let err = EmailService::new(&settings, &CancellationToken::new()).await.err().unwrap();
        assert!(matches!(err, AppError::Configuration { .. }));
    }

    #[tokio::test]
    async fn test_configured_provider_is_used() {
        let mut settings = Settings::default();
        settings.adapter.email = EmailProvider::Brevo;
        settings.brevo.api_key = "k".to_string();
        settings.brevo.sender_email = "noreply@example.com".to_string();

        let service = EmailService::new(&settings, &CancellationToken::new()).await.unwrap();
        assert_eq!(service.adapter_name(), "brevo");
    }

    #[tokio::test]
    async fn test_empty_recipients_never_reach_adapter() {
        let adapter = Arc::new(Recording::default());
        let service = service(adapter.clone());
        let email = Email {
            subject: "Hi".to_string(),
            body: "x".to_string(),
            ..Default::default()
        };

        let err = service
            .send_email(&CancellationToken::new(), &email)
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("email must have at least one recipient"));
        assert!(adapter.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_subject_and_body_reported() {
        let adapter = Arc::new(Recording::default());
        let service = service(adapter.clone());
        let email = Email::new("a@b.com", "", "");

        let message = service
            .send_email(&CancellationToken::new(), &email)
            .await
            .unwrap_err()
            .to_string();
        assert!(message.contains("email subject cannot be empty"));
        assert!(message.contains("email body cannot be empty"));
        assert!(adapter.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_address_rejected() {
        let adapter = Arc::new(Recording::default());
        let err = service(adapter.clone())
            .send_email(&CancellationToken::new(), &Email::new("nope", "Hi", "x"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("invalid recipient address"));
        assert!(adapter.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_adapter_error_is_wrapped() {
        let adapter = Arc::new(Recording {
            fail: true,
            ..Default::default()
        });
        let err = service(adapter)
            .send_email(&CancellationToken::new(), &Email::new("a@b.com", "Hi", "x"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Delivery { channel: Channel::Email, .. }));
        assert!(err.to_string().starts_with("failed to send email via adapter"));
    }

    #[tokio::test]
    async fn test_cancelled_token_short_circuits() {
        let adapter = Arc::new(Recording::default());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = service(adapter)
            .send_email(&cancel, &Email::new("a@b.com", "Hi", "x"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Cancelled));
    }

    #[tokio::test]
    async fn test_password_reset_escapes_link_in_html() {
        let adapter = Arc::new(Recording::default());
        service(adapter.clone())
            .send_password_reset(
                &CancellationToken::new(),
                "a@b.com",
                "https://x.test/reset?t=1&u=2",
            )
            .await
            .unwrap();

        let sent = adapter.sent.lock().unwrap();
        assert_eq!(sent[0].subject, "Password Reset Request");
        assert!(sent[0].body.ends_with("https://x.test/reset?t=1&u=2"));
        assert!(sent[0].html.as_deref().unwrap().contains("t=1&amp;u=2"));
    }

    #[tokio::test]
    async fn test_convenience_subjects() {
        let adapter = Arc::new(Recording::default());
        let service = service(adapter.clone());
        let cancel = CancellationToken::new();

        service
            .send_verification_code(&cancel, "a@b.com", "123456")
            .await
            .unwrap();
        service.send_welcome(&cancel, "a@b.com", "Ada").await.unwrap();
        service
            .send_warning_login(&cancel, "a@b.com", "Hanoi", "2024-10-19 08:00 UTC")
            .await
            .unwrap();

        let sent = adapter.sent.lock().unwrap();
        let subjects: Vec<&str> = sent.iter().map(|e| e.subject.as_str()).collect();
        assert_eq!(
            subjects,
            [
                "Your Verification Code",
                "Welcome to MyService!",
                "Security Alert: New Login Detected"
            ]
        );
        assert_eq!(
            sent[0].body,
            "Your verification code is: 123456. This code will expire in 10 minutes."
        );
        assert!(sent[2].html.as_deref().unwrap().contains("Hanoi"));
    }

    proptest! {
        #[test]
        fn blank_subject_never_dispatched(to in "[a-z]{1,8}@[a-z]{1,8}\\.com", body in ".{1,40}") {
            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let adapter = Arc::new(Recording::default());
            let service = service(adapter.clone());

            let result = rt.block_on(service.send_email(
                &CancellationToken::new(),
                &Email::new(to, "", body),
            ));

            prop_assert!(result.is_err());
            prop_assert!(adapter.sent.lock().unwrap().is_empty());
        }
    }
}
