//! Google Gemini adapter
//!
//! Each call replays the prior conversation as chat history and sends the
//! final message as the current turn. Text and multimodal calls share one
//! generation configuration; they differ only in the parts they carry.

use async_trait::async_trait;
use base64::Engine;
use futures::StreamExt;
use reqwest::Client;
use tracing::{debug, error, info};

use super::{send_json, GoogleModelInfo, GoogleProvider};
use crate::ai::format::google::{self, ChatSession, GoogleContent, Part};
use crate::ai::images::validate_image;
use crate::ai::providers::ProviderTag;
use crate::ai::types::{GenerationResult, ImageAttachment};
use crate::config::{AiConfig, GoogleGenerationConfig, ImageLimits};
use crate::constants;
use crate::error::{AiError, Result};

pub use crate::ai::format::google::{convert_image_to_part, create_message};

/// (id, display name) of the models this adapter serves
pub const GOOGLE_MODELS: &[(&str, &str)] = &[
    ("gemini-1.5-flash", "Gemini 1.5 Flash"),
    ("gemini-1.5-pro", "Gemini 1.5 Pro"),
];

pub struct GoogleAdapter {
    http: Client,
    api_key: String,
    base_url: String,
    generation: GoogleGenerationConfig,
    image_limits: ImageLimits,
}

impl std::fmt::Debug for GoogleAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleAdapter")
            .field("base_url", &self.base_url)
            .field("generation", &self.generation)
            .field("image_limits", &self.image_limits)
            .finish_non_exhaustive()
    }
}

impl GoogleAdapter {
    /// Create the adapter. Refuses to start without an API key.
    pub fn new(config: &AiConfig) -> Result<Self> {
        let api_key = config.api_key(ProviderTag::Google).ok_or_else(|| {
            AiError::Configuration(
                "Google API key is required (set GOOGLE_API_KEY or GEMINI_API_KEY)".to_string(),
            )
        })?;

        Ok(Self {
            http: config.http_client(),
            api_key: api_key.to_string(),
            base_url: config.base_url(ProviderTag::Google).to_string(),
            generation: config.google_generation,
            image_limits: config.image_limits,
        })
    }

    /// Download an image and wrap it as an attachment
    ///
    /// MIME type: the explicit argument, then the response's content type,
    /// then `image/jpeg`. Bodies larger than the configured image limit are
    /// rejected without being read in full, and the result goes through
    /// [`validate_image`].
    pub async fn fetch_image_attachment(
        &self,
        url: &str,
        mime_type: Option<&str>,
    ) -> Result<ImageAttachment> {
        let parsed = url::Url::parse(url)
            .map_err(|e| AiError::InvalidImage(format!("invalid image URL {}: {}", url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AiError::InvalidImage(format!(
                "unsupported image URL scheme: {}",
                parsed.scheme()
            )));
        }

        let response = self.http.get(parsed).send().await.map_err(|e| {
            error!("Image fetch failed for {}: {}", url, e);
            AiError::InvalidImage(format!("failed to fetch image from {}: {}", url, e))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AiError::InvalidImage(format!(
                "failed to fetch image from {}: HTTP {}",
                url, status
            )));
        }

        let declared = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let mime = mime_type
            .map(String::from)
            .or(declared)
            .unwrap_or_else(|| constants::images::DEFAULT_MIME_TYPE.to_string());

        let max_bytes = self.image_limits.max_bytes;
        if let Some(declared_len) = response.content_length() {
            if declared_len > max_bytes as u64 {
                return Err(AiError::InvalidImage(format!(
                    "image at {} is {} bytes, limit is {}",
                    url, declared_len, max_bytes
                )));
            }
        }

        let mut body = Vec::new();
        let mut chunks = std::pin::pin!(response.bytes_stream());
        while let Some(chunk) = chunks.next().await {
            let chunk = chunk.map_err(|e| {
                AiError::InvalidImage(format!("failed to read image body from {}: {}", url, e))
            })?;
            if body.len() + chunk.len() > max_bytes {
                return Err(AiError::InvalidImage(format!(
                    "image at {} exceeds {} bytes",
                    url, max_bytes
                )));
            }
            body.extend_from_slice(&chunk);
        }
        debug!("Fetched image {} ({} bytes, {})", url, body.len(), mime);

        let image = ImageAttachment::new(
            base64::engine::general_purpose::STANDARD.encode(&body),
            mime,
        );
        validate_image(&image, &self.image_limits)?;
        Ok(image)
    }

    /// Download an image and embed it as an inline data part
    pub async fn fetch_image_url_to_part(
        &self,
        url: &str,
        mime_type: Option<&str>,
    ) -> Result<Part> {
        let image = self.fetch_image_attachment(url, mime_type).await?;
        Ok(convert_image_to_part(&image.data, &image.mime_type))
    }

    async fn send_chat(
        &self,
        model: &str,
        messages: &[GoogleContent],
        system_prompt: Option<&str>,
    ) -> Result<GenerationResult> {
        let model = if model.is_empty() {
            constants::ai::DEFAULT_GOOGLE_MODEL
        } else {
            model
        };

        let (session, current) = ChatSession::start(messages, system_prompt)
            .ok_or_else(|| AiError::provider_call(ProviderTag::Google, "no message to send"))?;
        let body = session.request_body(&current.parts, &self.generation);
        debug!(
            "Gemini call: model={}, history={}, parts={}",
            model,
            session.history.len(),
            current.parts.len()
        );

        let url = google::endpoint_url(&self.base_url, model)?;
        let request = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json");

        let json = send_json(ProviderTag::Google, request, &body).await?;
        let result = google::extract_response(&json);
        info!("Gemini response: model={}, tokens={}", model, result.tokens);
        Ok(result)
    }
}

#[async_trait]
impl GoogleProvider for GoogleAdapter {
    async fn generate_text_response(
        &self,
        model: &str,
        messages: &[GoogleContent],
        system_prompt: Option<&str>,
    ) -> Result<GenerationResult> {
        self.send_chat(model, messages, system_prompt).await
    }

    async fn generate_multimodal_response(
        &self,
        model: &str,
        messages: &[GoogleContent],
        system_prompt: Option<&str>,
    ) -> Result<GenerationResult> {
        let images: usize = messages
            .iter()
            .map(|m| m.parts.iter().filter(|p| p.is_image()).count())
            .sum();
        debug!("Gemini multimodal call with {} image parts", images);
        self.send_chat(model, messages, system_prompt).await
    }

    fn available_models(&self) -> Vec<GoogleModelInfo> {
        GOOGLE_MODELS
            .iter()
            .map(|(id, name)| GoogleModelInfo {
                id: id.to_string(),
                name: name.to_string(),
                supports_images: true,
                supports_text: true,
            })
            .collect()
    }
}
