//! Translation between [`CompletionRequest`]/[`CompletionResponse`] and the
//! Anthropic Messages API's JSON shape.

use rcve_llm::{CompletionRequest, CompletionResponse, ProviderError, StopReason, TokenUsage};
use serde_json::json;

/// Build an Anthropic Messages API request body.
pub fn to_api_request(request: &CompletionRequest, default_model: &str) -> serde_json::Value {
    json!({
        "model": request.model.clone().unwrap_or_else(|| default_model.to_string()),
        "system": request.system,
        "max_tokens": request.max_tokens.unwrap_or(4096),
        "temperature": request.temperature,
        "messages": [
            { "role": "user", "content": request.user }
        ],
    })
}

fn map_stop_reason(raw: Option<&str>) -> StopReason {
    match raw {
        Some("max_tokens") => StopReason::MaxTokens,
        Some("refusal") => StopReason::ContentFilter,
        _ => StopReason::EndTurn,
    }
}

/// Parse an Anthropic Messages API response body.
pub fn from_api_response(json: &serde_json::Value) -> Result<CompletionResponse, ProviderError> {
    let text = json["content"]
        .as_array()
        .and_then(|blocks| blocks.iter().find(|b| b["type"] == "text"))
        .and_then(|b| b["text"].as_str())
        .ok_or_else(|| ProviderError::InvalidResponse("no text content block".into()))?
        .to_string();

    let model = json["model"]
        .as_str()
        .unwrap_or_default()
        .to_string();

    let usage = TokenUsage {
        input_tokens: json["usage"]["input_tokens"].as_u64().unwrap_or(0),
        output_tokens: json["usage"]["output_tokens"].as_u64().unwrap_or(0),
    };

    Ok(CompletionResponse {
        text,
        stop_reason: map_stop_reason(json["stop_reason"].as_str()),
        usage,
        model,
        cost: None,
    })
}
