use std::sync::LazyLock;
use std::time::Duration;

/// Request timeout applied to every provider call
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// TCP/TLS connect timeout
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

fn user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

/// Global HTTP client shared by all provider adapters
///
/// Initialized lazily on first access so connection pools are reused across
/// services. Timeouts: 30s per request, 10s to connect.
///
/// # Example
/// ```ignore
/// use crate::external::client::HTTP_CLIENT;
///
/// let response = HTTP_CLIENT
///     .post("https://api.brevo.com/v3/smtp/email")
///     .json(&payload)
///     .send()
///     .await?;
/// ```
pub static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .connect_timeout(CONNECT_TIMEOUT)
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        .gzip(true)
        .user_agent(user_agent())
        .build()
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to build tuned HTTP client, using defaults");
            reqwest::Client::new()
        })
});
