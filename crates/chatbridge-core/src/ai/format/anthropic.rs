//! Anthropic API format handler
//!
//! Request shape and response extraction for the Messages API.

use serde_json::Value;

use super::token_count;
use crate::ai::types::{ChatMessage, GenerationResult, Role};

/// Messages endpoint path
pub const ENDPOINT: &str = "/v1/messages";

/// Convert domain messages to Anthropic `{role, content}` objects
///
/// The API rejects empty text content, so empty turns are dropped.
pub fn convert_messages(messages: &[ChatMessage]) -> Vec<Value> {
    messages
        .iter()
        .filter(|m| !m.content.is_empty())
        .map(|m| {
            let role = match m.role {
                Role::User => "user",
                Role::Assistant => "assistant",
            };
            serde_json::json!({
                "role": role,
                "content": m.content
            })
        })
        .collect()
}

/// Build the complete request body (temperature is not part of this path)
pub fn build_request_body(model: &str, messages: Vec<Value>, max_tokens: u32) -> Value {
    serde_json::json!({
        "model": model,
        "max_tokens": max_tokens,
        "messages": messages,
    })
}

/// Concatenate text blocks and sum input and output usage
pub fn extract_message(response: &Value) -> GenerationResult {
    let content = response
        .get("content")
        .and_then(|c| c.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|block| {
                    if block.get("type").and_then(|t| t.as_str()) == Some("text") {
                        block.get("text").and_then(|t| t.as_str())
                    } else {
                        None
                    }
                })
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    let tokens = token_count(response, "/usage/input_tokens")
        + token_count(response, "/usage/output_tokens");

    GenerationResult { content, tokens }
}
