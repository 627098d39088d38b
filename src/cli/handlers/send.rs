//! Send command handler
//!
//! Turns the `email`, `sms` and `notify` subcommands into service calls and
//! prints the resulting receipt as a single JSON line on stdout.

use tokio_util::sync::CancellationToken;

use crate::cli::parser::{Commands, EmailAction, EmailArgs, NotifyArgs, SmsAction};
use crate::error::{AppError, AppResult};
use crate::models::{Content, DeliveryReceipt, Email, Sms};
use crate::services::Services;

/// Handler for the message-sending commands
pub struct SendCommandHandler {
    services: Services,
}

impl SendCommandHandler {
    pub fn new(services: Services) -> Self {
        Self { services }
    }

    /// Send the message described by `command` and print its receipt
    ///
    /// # Errors
    /// - Validation errors for malformed messages
    /// - Delivery errors from the selected adapter
    /// - [`AppError::Cancelled`] when `cancel` fires first
    pub async fn execute(&self, cancel: &CancellationToken, command: &Commands) -> AppResult<()> {
        let receipt = self.dispatch(cancel, command).await?;
        println!("{}", render_receipt(&receipt)?);
        Ok(())
    }

    async fn dispatch(
        &self,
        cancel: &CancellationToken,
        command: &Commands,
    ) -> AppResult<DeliveryReceipt> {
        match command {
            Commands::Email { action } => self.email(cancel, action).await,
            Commands::Sms { action } => self.sms(cancel, action).await,
            Commands::Notify(args) => self.notify(cancel, args).await,
            Commands::Check => Err(AppError::validation(
                "command",
                "check does not send a message",
            )),
        }
    }

    async fn email(
        &self,
        cancel: &CancellationToken,
        action: &EmailAction,
    ) -> AppResult<DeliveryReceipt> {
        let email = &self.services.email;
        match action {
            EmailAction::Send(args) => email.send_email(cancel, &build_email(args)).await,
            EmailAction::PasswordReset { to, link } => {
                email.send_password_reset(cancel, to, link).await
            }
            EmailAction::VerificationCode { to, code } => {
                email.send_verification_code(cancel, to, code).await
            }
            EmailAction::Welcome { to, name } => email.send_welcome(cancel, to, name).await,
            EmailAction::LoginWarning { to, location, time } => {
                email.send_warning_login(cancel, to, location, time).await
            }
        }
    }

    async fn sms(&self, cancel: &CancellationToken, action: &SmsAction) -> AppResult<DeliveryReceipt> {
        match action {
            SmsAction::Send { to, message } => {
                self.services
                    .sms
                    .send_sms(cancel, &Sms::new(to.as_str(), message.as_str()))
                    .await
            }
            SmsAction::Code { to, code } => self.services.sms.send_code(cancel, to, code).await,
        }
    }

    async fn notify(&self, cancel: &CancellationToken, args: &NotifyArgs) -> AppResult<DeliveryReceipt> {
        self.services.notify.send(cancel, &build_content(args)).await
    }
}

fn build_email(args: &EmailArgs) -> Email {
    Email {
        to: args.to.clone(),
        cc: args.cc.clone(),
        bcc: args.bcc.clone(),
        subject: args.subject.clone(),
        body: args.body.clone(),
        html: args.html.clone(),
    }
}

fn build_content(args: &NotifyArgs) -> Content {
    let mut content = Content::new(args.message.as_str()).with_level(args.level.into());
    if let Some(ref subject) = args.subject {
        content = content.with_subject(subject.as_str());
    }
    if let Some(mode) = args.parse_mode {
        content = content.with_parse_mode(mode.into());
    }
    content
}

fn render_receipt(receipt: &DeliveryReceipt) -> AppResult<String> {
    serde_json::to_string(receipt)
        .map_err(|e| anyhow::Error::new(e).context("failed to encode receipt").into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::parser::Cli;
    use crate::config::Settings;
    use crate::models::{Level, ParseMode};
    use clap::Parser;

    async fn handler() -> SendCommandHandler {
        SendCommandHandler::new(Services::new(&Settings::default(), &CancellationToken::new())
            .await
            .unwrap())
    }

    fn parse(args: &[&str]) -> Commands {
        Cli::try_parse_from(args).unwrap().command
    }

    #[tokio::test]
    async fn test_email_send_through_mock() {
        let command = parse(&[
            "send-sen", "email", "send", "--to", "ada@example.com", "--cc", "bob@example.com",
            "-s", "Hi", "-b", "Hello",
        ]);

        let receipt = handler()
            .await
            .dispatch(&CancellationToken::new(), &command)
            .await
            .unwrap();
        assert_eq!(receipt.provider, "mock");
    }

    #[tokio::test]
    async fn test_invalid_recipient_is_validation_error() {
        let command = parse(&[
            "send-sen", "email", "send", "--to", "not-an-address", "-s", "Hi", "-b", "Hello",
        ]);

        let err = handler()
            .await
            .dispatch(&CancellationToken::new(), &command)
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_convenience_commands_dispatch() {
        let handler = handler().await;
        let cancel = CancellationToken::new();

        let cases: [&[&str]; 5] = [
            &["send-sen", "email", "welcome", "--to", "ada@example.com", "--name", "Ada"],
            &["send-sen", "email", "verification-code", "--to", "ada@example.com", "--code", "42"],
            &["send-sen", "sms", "code", "--to", "+15550100", "--code", "824193"],
            &["send-sen", "sms", "send", "--to", "+15550100", "-m", "hello"],
            &["send-sen", "notify", "-l", "error", "-s", "db", "replica lag"],
        ];

        for args in cases {
            let receipt = handler.dispatch(&cancel, &parse(args)).await.unwrap();
            assert_eq!(receipt.provider, "mock", "{args:?}");
        }
    }

    #[tokio::test]
    async fn test_check_is_not_a_send() {
        let err = handler()
            .await
            .dispatch(&CancellationToken::new(), &Commands::Check)
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_cancelled_before_send() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let command = parse(&["send-sen", "sms", "send", "--to", "+15550100", "-m", "hi"]);

        let err = handler().await.dispatch(&cancel, &command).await.unwrap_err();
        assert!(matches!(err, AppError::Cancelled));
    }

    #[test]
    fn test_build_content_from_args() {
        let Commands::Notify(args) =
            parse(&["send-sen", "notify", "-s", "disk", "-l", "warning", "--parse-mode", "markdown", "85%"])
        else {
            panic!("Expected notify");
        };

        let content = build_content(&args);
        assert_eq!(content.message, "85%");
        assert_eq!(content.subject(), Some("disk"));
        assert_eq!(content.level, Level::Warning);
        assert_eq!(content.parse_mode, Some(ParseMode::Markdown));
    }

    #[test]
    fn test_render_receipt_json() {
        let receipt = DeliveryReceipt::new("brevo", Some("<id@smtp>".to_string()), 12);
        let json = render_receipt(&receipt).unwrap();
        assert_eq!(
            json,
            r#"{"provider":"brevo","message_id":"<id@smtp>","duration_ms":12}"#
        );
    }
}
