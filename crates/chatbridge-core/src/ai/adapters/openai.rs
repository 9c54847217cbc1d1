//! OpenAI adapter
//!
//! Chat completions, whole and streamed, behind `OpenAiProvider`.

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use reqwest::Client;
use tracing::{debug, error, info};

use super::{handle_error_response, send, send_json, OpenAiProvider};
use crate::ai::format::openai;
use crate::ai::providers::ProviderTag;
use crate::ai::sse::{OpenAIParser, SseStreamProcessor, StreamFlow};
use crate::ai::stream::{TextSink, TextStream};
use crate::ai::types::{ChatMessage, GenerationResult};
use crate::config::AiConfig;
use crate::constants;
use crate::error::{AiError, Result};

/// Models offered through this adapter
pub const OPENAI_MODELS: &[&str] = &["gpt-4", "gpt-4-turbo", "gpt-3.5-turbo"];

pub struct OpenAiAdapter {
    http: Client,
    api_key: Option<String>,
    base_url: String,
}

impl OpenAiAdapter {
    pub fn new(config: &AiConfig) -> Self {
        Self {
            http: config.http_client(),
            api_key: config.api_key(ProviderTag::OpenAI).map(String::from),
            base_url: config.base_url(ProviderTag::OpenAI).to_string(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Build a request with bearer authentication
    fn build_request(&self) -> Result<reqwest::RequestBuilder> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(AiError::ProviderNotConfigured {
                provider: ProviderTag::OpenAI,
            })?;
        let url = format!("{}{}", self.base_url, openai::ENDPOINT);
        Ok(self
            .http
            .post(url)
            .header("authorization", format!("Bearer {}", api_key))
            .header("content-type", "application/json"))
    }
}

#[async_trait]
impl OpenAiProvider for OpenAiAdapter {
    async fn generate_response(
        &self,
        messages: &[ChatMessage],
        model: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<GenerationResult> {
        let body = openai::build_request_body(
            model,
            openai::convert_messages(messages),
            max_tokens,
            temperature,
            false,
        );
        debug!("OpenAI call: model={}, {} messages", model, messages.len());

        let json = send_json(ProviderTag::OpenAI, self.build_request()?, &body).await?;
        let result = openai::extract_completion(&json);
        info!("OpenAI response: model={}, tokens={}", model, result.tokens);
        Ok(result)
    }

    async fn generate_stream_response(
        &self,
        messages: &[ChatMessage],
        model: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<TextStream> {
        let body = openai::build_request_body(
            model,
            openai::convert_messages(messages),
            max_tokens,
            temperature,
            true,
        );
        debug!("OpenAI stream: model={}, {} messages", model, messages.len());

        let request = self.build_request()?.header("accept", "text/event-stream");
        let response = send(ProviderTag::OpenAI, request, &body).await?;
        let response = handle_error_response(ProviderTag::OpenAI, response).await?;

        let (sink, stream) = TextStream::channel(model, constants::ai::STREAM_CHANNEL_CAPACITY);
        let model = model.to_string();

        tokio::spawn(async move {
            forward_sse(response.bytes_stream(), sink, &model).await;
        });

        Ok(stream)
    }

    fn available_models(&self) -> Vec<String> {
        OPENAI_MODELS.iter().map(|m| m.to_string()).collect()
    }
}

/// Read SSE bytes into `sink` until the provider or the consumer stops
async fn forward_sse<S, B, E>(bytes: S, sink: TextSink, model: &str)
where
    S: Stream<Item = std::result::Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    let mut bytes = std::pin::pin!(bytes);
    let mut processor = SseStreamProcessor::new();
    let parser = OpenAIParser;

    while let Some(chunk) = bytes.next().await {
        if sink.is_closed() {
            debug!("Stream consumer dropped, closing OpenAI connection");
            return;
        }
        match chunk {
            Ok(chunk) => match processor.process_chunk(chunk.as_ref(), &parser, &sink).await {
                StreamFlow::Continue => {}
                StreamFlow::Done | StreamFlow::Closed => return,
            },
            Err(e) => {
                error!(model = %model, "OpenAI stream broke: {}", e);
                sink.fail(AiError::provider_call(ProviderTag::OpenAI, e)).await;
                return;
            }
        }
    }

    processor.finish(&parser, &sink).await;
}
