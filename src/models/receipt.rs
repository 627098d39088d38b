use serde::Serialize;

/// Outcome of a successful provider call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryReceipt {
    /// Adapter that handled the message (e.g. "brevo", "mock")
    pub provider: &'static str,
    /// Provider-assigned message identifier, when the API returns one
    pub message_id: Option<String>,
    /// Time spent in the provider call in milliseconds
    pub duration_ms: u64,
}

impl DeliveryReceipt {
    pub fn new(provider: &'static str, message_id: Option<String>, duration_ms: u64) -> Self {
        Self {
            provider,
            message_id,
            duration_ms,
        }
    }
}
