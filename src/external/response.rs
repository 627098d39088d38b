//! Maps raw provider responses onto `AppError`

use reqwest::{RequestBuilder, Response};

use crate::error::{AppError, AppResult};

/// Sends `request` and returns the response only when the status is 2xx
///
/// Transport failures become `AppError::Transport`; any other status becomes
/// `AppError::ProviderResponse` carrying the response body.
pub async fn dispatch(provider: &'static str, request: RequestBuilder) -> AppResult<Response> {
    let response = request
        .send()
        .await
        .map_err(|source| AppError::Transport { provider, source })?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::warn!(provider, status = status.as_u16(), %body, "Provider rejected request");

    Err(AppError::ProviderResponse {
        provider,
        status: status.as_u16(),
        body,
    })
}
