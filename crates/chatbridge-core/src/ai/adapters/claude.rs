//! Anthropic Claude adapter
//!
//! Non-streaming Messages API calls. Without a key every call reports
//! `ProviderNotConfigured` instead of inventing a reply.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};

use super::{send_json, ClaudeProvider};
use crate::ai::format::anthropic;
use crate::ai::providers::ProviderTag;
use crate::ai::types::{ChatMessage, GenerationResult};
use crate::config::AiConfig;
use crate::constants;
use crate::error::{AiError, Result};

pub const CLAUDE_MODELS: &[&str] = &[
    "claude-3-opus-20240229",
    "claude-3-sonnet-20240229",
    "claude-3-haiku-20240307",
];

pub struct ClaudeAdapter {
    http: Client,
    api_key: Option<String>,
    base_url: String,
}

impl ClaudeAdapter {
    pub fn new(config: &AiConfig) -> Self {
        let api_key = config.api_key(ProviderTag::Claude).map(String::from);
        if api_key.is_none() {
            warn!("No Anthropic API key configured; Claude models will be unavailable");
        }
        Self {
            http: config.http_client(),
            api_key,
            base_url: config.base_url(ProviderTag::Claude).to_string(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl ClaudeProvider for ClaudeAdapter {
    async fn generate_response(
        &self,
        messages: &[ChatMessage],
        model: &str,
        max_tokens: u32,
    ) -> Result<GenerationResult> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(AiError::ProviderNotConfigured {
                provider: ProviderTag::Claude,
            })?;

        let body = anthropic::build_request_body(
            model,
            anthropic::convert_messages(messages),
            max_tokens,
        );
        debug!("Claude call: model={}, {} messages", model, messages.len());

        let request = self
            .http
            .post(format!("{}{}", self.base_url, anthropic::ENDPOINT))
            .header("x-api-key", api_key)
            .header("anthropic-version", constants::endpoints::ANTHROPIC_API_VERSION)
            .header("content-type", "application/json");

        let json = send_json(ProviderTag::Claude, request, &body).await?;
        let result = anthropic::extract_message(&json);
        info!("Claude response: model={}, tokens={}", model, result.tokens);
        Ok(result)
    }

    fn available_models(&self) -> Vec<String> {
        CLAUDE_MODELS.iter().map(|m| m.to_string()).collect()
    }
}
