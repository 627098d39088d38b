use serde::{Deserialize, Serialize};
use validator::{Validate, ValidateEmail, ValidationError};

/// Email message handed to an [`EmailService`](crate::services::EmailService)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Email {
    /// Primary recipients (at least one)
    #[validate(
        length(min = 1, message = "email must have at least one recipient"),
        custom(function = "validate_addresses")
    )]
    pub to: Vec<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_addresses"))]
    pub cc: Vec<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_addresses"))]
    pub bcc: Vec<String>,

    #[validate(length(min = 1, message = "email subject cannot be empty"))]
    pub subject: String,

    /// Plain-text body
    #[validate(length(min = 1, message = "email body cannot be empty"))]
    pub body: String,

    /// Optional HTML alternative of `body`
    #[serde(default)]
    pub html: Option<String>,
}

impl Email {
    /// Creates a plain-text email to a single recipient
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: vec![to.into()],
            subject: subject.into(),
            body: body.into(),
            ..Default::default()
        }
    }

    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    pub fn with_cc(mut self, cc: impl Into<String>) -> Self {
        self.cc.push(cc.into());
        self
    }

    pub fn with_bcc(mut self, bcc: impl Into<String>) -> Self {
        self.bcc.push(bcc.into());
        self
    }

    /// HTML part, ignoring an empty string
    pub fn html_part(&self) -> Option<&str> {
        self.html.as_deref().filter(|h| !h.is_empty())
    }
}

fn validate_addresses(addresses: &[String]) -> Result<(), ValidationError> {
    match addresses.iter().find(|addr| !addr.validate_email()) {
        Some(bad) => {
            let mut err = ValidationError::new("recipient");
            err.message = Some(format!("invalid recipient address '{}'", bad).into());
            Err(err)
        }
        None => Ok(()),
    }
}
