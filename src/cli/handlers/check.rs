//! Check command handler
//!
//! Reports which adapter each channel resolved to without sending anything.

use crate::models::Channel;
use crate::services::Services;

/// One line of the `check` report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelStatus {
    pub channel: Channel,
    /// Provider named in configuration
    pub provider: &'static str,
    /// Adapter actually in use
    pub adapter: &'static str,
}

impl ChannelStatus {
    /// True when a configured real provider was replaced by the mock
    pub fn degraded(&self) -> bool {
        self.provider != self.adapter
    }
}

impl std::fmt::Display for ChannelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mark = if self.degraded() { "!" } else { "✓" };
        write!(
            f,
            "{} {:<7} provider={} adapter={}",
            mark,
            self.channel.as_str(),
            self.provider,
            self.adapter
        )
    }
}

/// Handler for the check command
pub struct CheckCommandHandler {
    services: Services,
}

impl CheckCommandHandler {
    pub fn new(services: Services) -> Self {
        Self { services }
    }

    pub fn report(&self) -> Vec<ChannelStatus> {
        let Services { email, sms, notify } = &self.services;
        vec![
            ChannelStatus {
                channel: Channel::Email,
                provider: email.service_name(),
                adapter: email.adapter_name(),
            },
            ChannelStatus {
                channel: Channel::Sms,
                provider: sms.service_name(),
                adapter: sms.adapter_name(),
            },
            ChannelStatus {
                channel: Channel::Notify,
                provider: notify.service_name(),
                adapter: notify.adapter_name(),
            },
        ]
    }

    pub fn execute(&self) {
        let report = self.report();
        for status in &report {
            println!("{}", status);
        }

        let degraded = report.iter().filter(|s| s.degraded()).count();
        if degraded > 0 {
            println!("{} channel(s) fell back to the mock adapter", degraded);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Settings, SmsProvider};
    use tokio_util::sync::CancellationToken;

    #[tokio::test]
    async fn test_default_report_is_all_mock() {
        let services = Services::new(&Settings::default(), &CancellationToken::new())
            .await
            .unwrap();
        let report = CheckCommandHandler::new(services).report();

        assert_eq!(report.len(), 3);
        assert!(report.iter().all(|s| s.adapter == "mock" && !s.degraded()));
    }

    #[tokio::test]
    async fn test_unconfigured_provider_reported_as_degraded() {
        let mut settings = Settings::default();
        settings.adapter.sms = SmsProvider::Twilio;

        let services = Services::new(&settings, &CancellationToken::new())
            .await
            .unwrap();
        let report = CheckCommandHandler::new(services).report();

        let sms = &report[1];
        assert_eq!(sms.channel, Channel::Sms);
        assert_eq!(sms.provider, "twilio");
        assert_eq!(sms.adapter, "mock");
        assert!(sms.degraded());
        assert!(sms.to_string().starts_with("! sms"));
    }
}
