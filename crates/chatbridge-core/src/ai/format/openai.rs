//! OpenAI API format handler
//!
//! Handles conversion to the chat/completions request shape and extraction
//! of text and usage from its responses (whole and streamed).

use serde_json::Value;

use super::token_count;
use crate::ai::types::{ChatMessage, GenerationResult, Role};

/// Chat completions endpoint path
pub const ENDPOINT: &str = "/v1/chat/completions";

/// Convert domain messages to OpenAI `{role, content}` objects, order preserved
pub fn convert_messages(messages: &[ChatMessage]) -> Vec<Value> {
    messages
        .iter()
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

/// Build the complete request body
pub fn build_request_body(
    model: &str,
    messages: Vec<Value>,
    max_tokens: u32,
    temperature: f32,
    streaming: bool,
) -> Value {
    let mut body = serde_json::json!({
        "model": model,
        "messages": messages,
        "max_tokens": max_tokens,
        "temperature": temperature,
    });

    if streaming {
        body["stream"] = serde_json::json!(true);
    }

    body
}

/// Extract the first choice's text and total token usage
pub fn extract_completion(response: &Value) -> GenerationResult {
    let content = response
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|arr| arr.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|msg| msg.get("content"))
        .and_then(|t| t.as_str())
        .unwrap_or("")
        .to_string();

    GenerationResult {
        content,
        tokens: token_count(response, "/usage/total_tokens"),
    }
}

/// Extract the incremental text of a streamed chunk, if it carries any
pub fn extract_stream_delta(chunk: &Value) -> Option<String> {
    chunk
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|arr| arr.first())
        .and_then(|choice| choice.get("delta"))
        .and_then(|delta| delta.get("content"))
        .and_then(|t| t.as_str())
        .filter(|text| !text.is_empty())
        .map(String::from)
}
