use crate::models::Channel;
use thiserror::Error;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFieldError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationFieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Application-wide error type that represents all possible errors in the system.
///
/// Validation failures are raised before any provider is contacted. Provider
/// failures keep the provider name and, where available, the HTTP status and
/// response body so callers can decide what to do with them.
#[derive(Error, Debug)]
pub enum AppError {
    /// Validation error with field-specific details
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Multiple validation errors collected from a `validator` derive
    #[error("Validation failed: {}", join_field_errors(errors))]
    ValidationErrors { errors: Vec<ValidationFieldError> },

    /// Configuration error with key information
    #[error("Configuration error: {key}: {source}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// The provider answered with a non-success status
    #[error("{provider} API returned status {status}: {body}")]
    ProviderResponse {
        provider: &'static str,
        status: u16,
        body: String,
    },

    /// The request never produced a response (DNS, TLS, timeout, ...)
    #[error("{provider} request failed: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// Adapter failure wrapped by a message service
    #[error("failed to send {channel} via adapter: {source}")]
    Delivery {
        channel: Channel,
        #[source]
        source: Box<AppError>,
    },

    /// The caller cancelled the send before the provider answered
    #[error("Send cancelled")]
    Cancelled,

    /// Internal error for unexpected failures
    #[error("Internal error: {source}")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    /// Shorthand for a single-field validation error.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Wraps an adapter error with the channel it was sent on.
    pub fn delivery(channel: Channel, source: AppError) -> Self {
        AppError::Delivery {
            channel,
            source: Box::new(source),
        }
    }

    /// True for errors raised before the adapter was invoked.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AppError::Validation { .. } | AppError::ValidationErrors { .. }
        )
    }
}

fn join_field_errors(errors: &[ValidationFieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut collected: Vec<ValidationFieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| ValidationFieldError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                })
            })
            .collect();
        collected.sort_by(|a, b| a.field.cmp(&b.field));

        AppError::ValidationErrors { errors: collected }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;
