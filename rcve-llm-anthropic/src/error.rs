//! Mapping HTTP/transport failures onto [`ProviderError`].

use rcve_llm::ProviderError;
use reqwest::StatusCode;

/// Map a `reqwest` transport error onto a [`ProviderError`].
pub fn map_reqwest_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::RequestFailed(format!("timeout: {err}"))
    } else {
        ProviderError::RequestFailed(err.to_string())
    }
}

/// Map an Anthropic API HTTP error response onto a [`ProviderError`].
pub fn map_http_status(status: StatusCode, body: &str) -> ProviderError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ProviderError::AuthFailed(body.to_string())
        }
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited,
        _ => ProviderError::RequestFailed(format!("http {status}: {body}")),
    }
}
