//! Provider adapters
//!
//! Each adapter wraps one external API. The router depends on the traits
//! below rather than the concrete adapters, so tests can swap in fakes.

pub mod claude;
pub mod google;
pub mod openai;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;

use super::format::google::GoogleContent;
use super::providers::ProviderTag;
use super::stream::TextStream;
use super::types::{ChatMessage, GenerationResult};
use crate::error::{AiError, Result};

pub use claude::ClaudeAdapter;
pub use google::GoogleAdapter;
pub use openai::OpenAiAdapter;

/// OpenAI chat completions surface
#[async_trait]
pub trait OpenAiProvider: Send + Sync {
    async fn generate_response(
        &self,
        messages: &[ChatMessage],
        model: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<GenerationResult>;

    async fn generate_stream_response(
        &self,
        messages: &[ChatMessage],
        model: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<TextStream>;

    /// Static model id list, no network call
    fn available_models(&self) -> Vec<String>;
}

/// Anthropic Messages surface (no temperature on this path)
#[async_trait]
pub trait ClaudeProvider: Send + Sync {
    async fn generate_response(
        &self,
        messages: &[ChatMessage],
        model: &str,
        max_tokens: u32,
    ) -> Result<GenerationResult>;

    fn available_models(&self) -> Vec<String>;
}

/// Gemini surface. Generation parameters are adapter-level, not per call.
#[async_trait]
pub trait GoogleProvider: Send + Sync {
    async fn generate_text_response(
        &self,
        model: &str,
        messages: &[GoogleContent],
        system_prompt: Option<&str>,
    ) -> Result<GenerationResult>;

    async fn generate_multimodal_response(
        &self,
        model: &str,
        messages: &[GoogleContent],
        system_prompt: Option<&str>,
    ) -> Result<GenerationResult>;

    fn available_models(&self) -> Vec<GoogleModelInfo>;
}

/// The Google adapter's own catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleModelInfo {
    pub id: String,
    pub name: String,
    pub supports_images: bool,
    pub supports_text: bool,
}

/// Send a JSON request and return the parsed JSON body
///
/// Full diagnostics are logged here; the returned error only carries the
/// coarse provider-call message.
pub(crate) async fn send_json(
    provider: ProviderTag,
    request: reqwest::RequestBuilder,
    body: &Value,
) -> Result<Value> {
    let response = send(provider, request, body).await?;
    response.json::<Value>().await.map_err(|e| {
        error!(provider = %provider, "Failed to decode response body: {}", e);
        AiError::provider_call(provider, "malformed response")
    })
}

/// Send a JSON request and return the successful response, unread
pub(crate) async fn send(
    provider: ProviderTag,
    request: reqwest::RequestBuilder,
    body: &Value,
) -> Result<reqwest::Response> {
    let response = request.json(body).send().await.map_err(|e| {
        error!(provider = %provider, "Request failed: {}", e);
        AiError::provider_call(provider, transport_summary(&e))
    })?;
    handle_error_response(provider, response).await
}

/// Turn a non-success response into a provider-call error
pub(crate) async fn handle_error_response(
    provider: ProviderTag,
    response: reqwest::Response,
) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_text = response.text().await.unwrap_or_default();
    error!(provider = %provider, "API error response: {} - {}", status, error_text);
    Err(AiError::provider_call(provider, format!("API error: {}", status)))
}

fn transport_summary(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "request timed out".to_string()
    } else if e.is_connect() {
        "connection failed".to_string()
    } else {
        e.to_string()
    }
}
