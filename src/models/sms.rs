use serde::{Deserialize, Serialize};
use validator::Validate;

/// SMS message handed to an [`SmsService`](crate::services::SmsService)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Sms {
    /// Recipient phone number (E.164 recommended)
    #[validate(length(min = 1, message = "sms recipient ('To' phone number) cannot be empty"))]
    pub to: String,

    #[validate(length(min = 1, message = "sms message cannot be empty"))]
    pub message: String,
}

impl Sms {
    pub fn new(to: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            message: message.into(),
        }
    }
}
