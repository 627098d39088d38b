use serde::{Deserialize, Serialize};

/// Delivery channel served by one message service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Email,
    Sms,
    Notify,
}

impl Channel {
    /// Configuration key for this channel (`adapter.<key>`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Email => "email",
            Channel::Sms => "sms",
            Channel::Notify => "notify",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let noun = match self {
            Channel::Email => "email",
            Channel::Sms => "SMS",
            Channel::Notify => "notification",
        };
        f.write_str(noun)
    }
}
