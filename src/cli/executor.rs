//! Command executor for dispatching CLI commands
//!
//! This module provides the main entry point for executing CLI commands
//! after parsing and configuration loading.

use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::handlers::{CheckCommandHandler, SendCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::Settings;
use crate::error::AppResult;
use crate::services::Services;

/// Execute a CLI command with the given settings
///
/// Services are built once from `settings`; in strict mode a provider that
/// fails to initialise aborts here before any command runs. `cancel` covers
/// both provider verification and the send itself.
///
/// # Errors
/// Returns errors from service construction or the command handler
pub async fn execute_command(
    cli: &Cli,
    settings: &Settings,
    cancel: &CancellationToken,
) -> AppResult<()> {
    let services = Services::new(settings, cancel).await?;
    debug!(
        email = services.email.adapter_name(),
        sms = services.sms.adapter_name(),
        notify = services.notify.adapter_name(),
        "Services ready"
    );

    match &cli.command {
        Commands::Check => {
            CheckCommandHandler::new(services).execute();
            Ok(())
        }
        command => SendCommandHandler::new(services).execute(cancel, command).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NotifyProvider;
    use crate::error::AppError;
    use clap::Parser;

    #[tokio::test]
    async fn test_execute_check() {
        let cli = Cli::try_parse_from(["send-sen", "check"]).unwrap();
        let result = execute_command(&cli, &Settings::default(), &CancellationToken::new()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_execute_notify_via_mock() {
        let cli = Cli::try_parse_from(["send-sen", "notify", "deploy finished"]).unwrap();
        let result = execute_command(&cli, &Settings::default(), &CancellationToken::new()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_cancelled_token_stops_startup_verification() {
        let mut settings = Settings::default();
        settings.adapter.notify = NotifyProvider::Telegram;
        settings.telegram.bot_token = "1:abc".to_string();
        settings.telegram.chat_id = "42".to_string();
        settings.telegram.api_url = "http://127.0.0.1:9".to_string();

        let cancel = CancellationToken::new();
        cancel.cancel();

        let cli = Cli::try_parse_from(["send-sen", "check"]).unwrap();
        let err = execute_command(&cli, &settings, &cancel).await.unwrap_err();
        assert!(matches!(err, AppError::Cancelled));
    }

    #[tokio::test]
    async fn test_strict_unsupported_provider_fails_before_send() {
        let mut settings = Settings::default();
        settings.adapter.notify = NotifyProvider::Slack;
        settings.adapter.strict = true;

        let cli = Cli::try_parse_from(["send-sen", "check"]).unwrap();
        let err = execute_command(&cli, &settings, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Configuration { ref key, .. } if key == "adapter.notify"));
    }
}
