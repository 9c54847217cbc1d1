//! API format handling
//!
//! Converts between the router's domain types and the request/response
//! shapes of each provider (OpenAI chat completions, Anthropic Messages,
//! Google generateContent).

pub mod anthropic;
pub mod google;
pub mod openai;

use serde_json::Value;

/// Read an unsigned integer by JSON pointer, 0 when absent or not a number
pub(crate) fn token_count(response: &Value, pointer: &str) -> u64 {
    response
        .pointer(pointer)
        .and_then(|t| t.as_u64())
        .unwrap_or(0)
}
