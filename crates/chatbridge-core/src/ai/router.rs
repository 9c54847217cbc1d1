//! AI router
//!
//! Classifies a model identifier to its provider and delegates to that
//! provider's adapter. The router owns the cross-cutting concerns: request
//! timeouts, image validation and usage accounting.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::adapters::{
    ClaudeAdapter, ClaudeProvider, GoogleAdapter, GoogleProvider, OpenAiAdapter, OpenAiProvider,
};
use super::format::google::{convert_messages, convert_multimodal_messages};
use super::images::validate_image;
use super::models::build_catalog;
use super::providers::{self, ProviderTag};
use super::stream::TextStream;
use super::types::{ChatMessage, GenerationResult, ModelDescriptor, MultimodalMessage};
use super::usage::{UsageMonitor, UsageRecord};
use crate::config::{AiConfig, ImageLimits};
use crate::constants;
use crate::error::{AiError, Result};

/// Per-call generation parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationOptions {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            max_tokens: constants::ai::DEFAULT_MAX_TOKENS,
            temperature: constants::ai::DEFAULT_TEMPERATURE,
        }
    }
}

impl GenerationOptions {
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Routes generation requests to the provider behind each model id
pub struct AiRouter {
    openai: Option<Arc<dyn OpenAiProvider>>,
    claude: Option<Arc<dyn ClaudeProvider>>,
    google: Option<Arc<dyn GoogleProvider>>,
    usage: Arc<UsageMonitor>,
    request_timeout: Duration,
    image_limits: ImageLimits,
}

/// Assembles a router from individual adapters
#[derive(Default)]
pub struct AiRouterBuilder {
    openai: Option<Arc<dyn OpenAiProvider>>,
    claude: Option<Arc<dyn ClaudeProvider>>,
    google: Option<Arc<dyn GoogleProvider>>,
    usage: Option<Arc<UsageMonitor>>,
    request_timeout: Option<Duration>,
    image_limits: Option<ImageLimits>,
}

impl AiRouterBuilder {
    pub fn openai(mut self, adapter: Arc<dyn OpenAiProvider>) -> Self {
        self.openai = Some(adapter);
        self
    }

    pub fn claude(mut self, adapter: Arc<dyn ClaudeProvider>) -> Self {
        self.claude = Some(adapter);
        self
    }

    pub fn google(mut self, adapter: Arc<dyn GoogleProvider>) -> Self {
        self.google = Some(adapter);
        self
    }

    /// Share a usage monitor with other routers
    pub fn usage_monitor(mut self, usage: Arc<UsageMonitor>) -> Self {
        self.usage = Some(usage);
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn image_limits(mut self, limits: ImageLimits) -> Self {
        self.image_limits = Some(limits);
        self
    }

    pub fn build(self) -> AiRouter {
        AiRouter {
            openai: self.openai,
            claude: self.claude,
            google: self.google,
            usage: self.usage.unwrap_or_default(),
            request_timeout: self
                .request_timeout
                .unwrap_or(constants::http::REQUEST_TIMEOUT),
            image_limits: self.image_limits.unwrap_or_default(),
        }
    }
}

impl AiRouter {
    pub fn builder() -> AiRouterBuilder {
        AiRouterBuilder::default()
    }

    /// Build the router with all three HTTP adapters
    ///
    /// Fails when the Google API key is missing. A missing OpenAI or
    /// Anthropic key only fails the calls that need it.
    pub fn from_config(config: &AiConfig) -> Result<Self> {
        let google = GoogleAdapter::new(config)?;
        let openai = OpenAiAdapter::new(config);
        let claude = ClaudeAdapter::new(config);

        if !openai.is_configured() {
            warn!("No OpenAI API key configured; OpenAI models will be unavailable");
        }

        Ok(Self::builder()
            .openai(Arc::new(openai))
            .claude(Arc::new(claude))
            .google(Arc::new(google))
            .request_timeout(config.request_timeout)
            .image_limits(config.image_limits)
            .build())
    }

    /// Map a model identifier to its provider
    pub fn classify_provider(&self, model: &str) -> Result<ProviderTag> {
        providers::classify_provider(model)
    }

    /// Generate a complete reply from a text conversation
    pub async fn generate_response(
        &self,
        messages: &[ChatMessage],
        model: &str,
        options: GenerationOptions,
    ) -> Result<GenerationResult> {
        let provider = self.classify_provider(model)?;
        debug!("Routing {} to {}", model, provider);

        let result = match provider {
            ProviderTag::OpenAI => {
                let adapter = self.openai_adapter()?;
                self.with_timeout(
                    provider,
                    adapter.generate_response(
                        messages,
                        model,
                        options.max_tokens,
                        options.temperature,
                    ),
                )
                .await
            }
            // Temperature is not part of the Claude adapter surface
            ProviderTag::Claude => {
                let adapter = self.claude_adapter()?;
                self.with_timeout(
                    provider,
                    adapter.generate_response(messages, model, options.max_tokens),
                )
                .await
            }
            // Gemini uses adapter-level generation settings
            ProviderTag::Google => {
                let adapter = self.google_adapter()?;
                let contents = convert_messages(messages);
                self.with_timeout(
                    provider,
                    adapter.generate_text_response(model, &contents, None),
                )
                .await
            }
        };

        self.record(provider, model, &result);
        result
    }

    /// Generate a reply from messages that may carry images
    ///
    /// Only Gemini sees the images. For other providers they are dropped and
    /// the call is the same as `generate_response` on the text.
    pub async fn generate_multimodal_response(
        &self,
        messages: &[MultimodalMessage],
        model: &str,
        options: GenerationOptions,
    ) -> Result<GenerationResult> {
        let provider = self.classify_provider(model)?;

        if !provider.supports_images() {
            let dropped: usize = messages.iter().map(|m| m.images.len()).sum();
            if dropped > 0 {
                debug!(
                    "{} does not accept images; dropping {} attachment(s) for {}",
                    provider, dropped, model
                );
            }
            let text: Vec<ChatMessage> = messages.iter().map(|m| m.to_text_message()).collect();
            return self.generate_response(&text, model, options).await;
        }

        let adapter = self.google_adapter()?;
        for image in messages.iter().flat_map(|m| &m.images) {
            validate_image(image, &self.image_limits)?;
        }

        let contents = convert_multimodal_messages(messages);
        let result = self
            .with_timeout(
                provider,
                adapter.generate_multimodal_response(model, &contents, None),
            )
            .await;

        self.record(provider, model, &result);
        result
    }

    /// Open a stream of text fragments
    ///
    /// Only OpenAI streams. The timeout covers opening the stream, not
    /// reading it.
    pub async fn generate_stream_response(
        &self,
        messages: &[ChatMessage],
        model: &str,
        options: GenerationOptions,
    ) -> Result<TextStream> {
        let provider = self.classify_provider(model)?;
        if !provider.supports_streaming() {
            return Err(AiError::UnsupportedCapability {
                model: model.to_string(),
                capability: "streaming".to_string(),
            });
        }

        let adapter = self.openai_adapter()?;
        let result = self
            .with_timeout(
                provider,
                adapter.generate_stream_response(
                    messages,
                    model,
                    options.max_tokens,
                    options.temperature,
                ),
            )
            .await;

        match &result {
            Ok(_) => self.usage.record_success(provider, model, 0),
            Err(_) => self.usage.record_failure(provider, model),
        }
        result
    }

    /// The model catalog: OpenAI, then Claude, then Gemini
    pub fn available_models(&self) -> Vec<ModelDescriptor> {
        let openai = self
            .openai
            .as_ref()
            .map(|a| a.available_models())
            .unwrap_or_default();
        let claude = self
            .claude
            .as_ref()
            .map(|a| a.available_models())
            .unwrap_or_default();
        let gemini = self
            .google
            .as_ref()
            .map(|a| a.available_models())
            .unwrap_or_default();

        build_catalog(&openai, &claude, &gemini)
    }

    /// Usage counters recorded so far
    pub fn usage_snapshot(&self) -> Vec<UsageRecord> {
        self.usage.snapshot()
    }

    pub fn usage_monitor(&self) -> &Arc<UsageMonitor> {
        &self.usage
    }

    fn openai_adapter(&self) -> Result<&Arc<dyn OpenAiProvider>> {
        self.openai
            .as_ref()
            .ok_or(AiError::UnhandledProvider(ProviderTag::OpenAI))
    }

    fn claude_adapter(&self) -> Result<&Arc<dyn ClaudeProvider>> {
        self.claude
            .as_ref()
            .ok_or(AiError::UnhandledProvider(ProviderTag::Claude))
    }

    fn google_adapter(&self) -> Result<&Arc<dyn GoogleProvider>> {
        self.google
            .as_ref()
            .ok_or(AiError::UnhandledProvider(ProviderTag::Google))
    }

    async fn with_timeout<T, F>(&self, provider: ProviderTag, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match tokio::time::timeout(self.request_timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    "{} call timed out after {:?}",
                    provider, self.request_timeout
                );
                Err(AiError::Timeout {
                    provider,
                    after: self.request_timeout,
                })
            }
        }
    }

    fn record(&self, provider: ProviderTag, model: &str, result: &Result<GenerationResult>) {
        match result {
            Ok(r) => self.usage.record_success(provider, model, r.tokens),
            Err(_) => self.usage.record_failure(provider, model),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::adapters::GoogleModelInfo;
    use crate::ai::format::google::{GoogleContent, GoogleRole, Part};
    use crate::ai::types::{ImageAttachment, Role};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const PIXEL: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    #[derive(Default)]
    struct FakeOpenAi {
        calls: AtomicUsize,
        stream_calls: AtomicUsize,
        last: Mutex<Option<(Vec<ChatMessage>, String, u32, f32)>>,
        delay: Option<Duration>,
    }

    #[async_trait]
    impl OpenAiProvider for FakeOpenAi {
        async fn generate_response(
            &self,
            messages: &[ChatMessage],
            model: &str,
            max_tokens: u32,
            temperature: f32,
        ) -> Result<GenerationResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock() =
                Some((messages.to_vec(), model.to_string(), max_tokens, temperature));
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            Ok(GenerationResult::new("hello", 5))
        }

        async fn generate_stream_response(
            &self,
            _messages: &[ChatMessage],
            model: &str,
            _max_tokens: u32,
            _temperature: f32,
        ) -> Result<TextStream> {
            self.stream_calls.fetch_add(1, Ordering::SeqCst);
            Ok(TextStream::from_items(
                model,
                vec![Ok("hel".to_string()), Ok("lo".to_string())],
            ))
        }

        fn available_models(&self) -> Vec<String> {
            vec!["gpt-4".to_string(), "gpt-3.5-turbo".to_string()]
        }
    }

    #[derive(Default)]
    struct FakeClaude {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ClaudeProvider for FakeClaude {
        async fn generate_response(
            &self,
            _messages: &[ChatMessage],
            _model: &str,
            _max_tokens: u32,
        ) -> Result<GenerationResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(GenerationResult::new("claude says hi", 3))
        }

        fn available_models(&self) -> Vec<String> {
            vec![
                "claude-3-opus-20240229".to_string(),
                "claude-3-sonnet-20240229".to_string(),
                "claude-3-haiku-20240307".to_string(),
            ]
        }
    }

    #[derive(Default)]
    struct FakeGoogle {
        text_calls: AtomicUsize,
        multimodal_calls: AtomicUsize,
        last: Mutex<Vec<GoogleContent>>,
    }

    #[async_trait]
    impl GoogleProvider for FakeGoogle {
        async fn generate_text_response(
            &self,
            _model: &str,
            messages: &[GoogleContent],
            _system_prompt: Option<&str>,
        ) -> Result<GenerationResult> {
            self.text_calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock() = messages.to_vec();
            Ok(GenerationResult::new("gemini text", 9))
        }

        async fn generate_multimodal_response(
            &self,
            _model: &str,
            messages: &[GoogleContent],
            _system_prompt: Option<&str>,
        ) -> Result<GenerationResult> {
            self.multimodal_calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock() = messages.to_vec();
            Ok(GenerationResult::new("gemini sees", 12))
        }

        fn available_models(&self) -> Vec<GoogleModelInfo> {
            ["gemini-1.5-flash", "gemini-1.5-pro"]
                .iter()
                .map(|id| GoogleModelInfo {
                    id: id.to_string(),
                    name: id.to_string(),
                    supports_images: true,
                    supports_text: true,
                })
                .collect()
        }
    }

    struct Fakes {
        openai: Arc<FakeOpenAi>,
        claude: Arc<FakeClaude>,
        google: Arc<FakeGoogle>,
    }

    impl Fakes {
        fn new() -> Self {
            Self {
                openai: Arc::new(FakeOpenAi::default()),
                claude: Arc::new(FakeClaude::default()),
                google: Arc::new(FakeGoogle::default()),
            }
        }

        fn router(&self) -> AiRouter {
            AiRouter::builder()
                .openai(self.openai.clone())
                .claude(self.claude.clone())
                .google(self.google.clone())
                .build()
        }

        fn total_calls(&self) -> usize {
            self.openai.calls.load(Ordering::SeqCst)
                + self.openai.stream_calls.load(Ordering::SeqCst)
                + self.claude.calls.load(Ordering::SeqCst)
                + self.google.text_calls.load(Ordering::SeqCst)
                + self.google.multimodal_calls.load(Ordering::SeqCst)
        }
    }

    #[tokio::test]
    async fn test_openai_dispatch_passes_result_through() {
        let fakes = Fakes::new();
        let router = fakes.router();

        let result = router
            .generate_response(&[ChatMessage::user("hi")], "gpt-4", GenerationOptions::default())
            .await
            .unwrap();
        assert_eq!(result, GenerationResult::new("hello", 5));

        let last = fakes.openai.last.lock().clone().unwrap();
        assert_eq!(last.1, "gpt-4");
        assert_eq!(last.2, 1000);
        assert_eq!(last.3, 0.7);
    }

    #[tokio::test]
    async fn test_text_prefix_routes_to_openai() {
        let fakes = Fakes::new();
        let options = GenerationOptions::default()
            .with_max_tokens(64)
            .with_temperature(0.1);
        fakes
            .router()
            .generate_response(&[ChatMessage::user("hi")], "text-davinci-003", options)
            .await
            .unwrap();
        assert_eq!(fakes.openai.calls.load(Ordering::SeqCst), 1);
        let last = fakes.openai.last.lock().clone().unwrap();
        assert_eq!((last.2, last.3), (64, 0.1));
    }

    #[tokio::test]
    async fn test_unknown_model_contacts_no_adapter() {
        let fakes = Fakes::new();
        let router = fakes.router();

        let err = router
            .generate_response(
                &[ChatMessage::user("hi")],
                "unknown-model-x",
                GenerationOptions::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AiError::UnknownProvider { ref model } if model == "unknown-model-x"
        ));

        let multimodal = [MultimodalMessage::new(Role::User, "hi")];
        assert!(router
            .generate_multimodal_response(&multimodal, "llama-3", GenerationOptions::default())
            .await
            .is_err());
        assert!(router
            .generate_stream_response(
                &[ChatMessage::user("hi")],
                "mistral",
                GenerationOptions::default(),
            )
            .await
            .is_err());

        assert_eq!(fakes.total_calls(), 0);
        assert!(router.usage_snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_google_history_translation() {
        let fakes = Fakes::new();
        let messages = vec![
            ChatMessage::user("one"),
            ChatMessage::assistant("two"),
            ChatMessage::user("three"),
            ChatMessage::assistant("four"),
            ChatMessage::user("five"),
        ];

        let result = fakes
            .router()
            .generate_response(&messages, "gemini-1.5-flash", GenerationOptions::default())
            .await
            .unwrap();
        assert_eq!(result.tokens, 9);

        let sent = fakes.google.last.lock().clone();
        assert_eq!(sent.len(), messages.len());
        let (current, history) = sent.split_last().unwrap();
        assert_eq!(history.len(), messages.len() - 1);
        for (content, original) in history.iter().zip(&messages) {
            assert_eq!(content.role, GoogleRole::from(original.role));
            assert_eq!(content.parts, vec![Part::text(original.content.clone())]);
        }
        assert_eq!(history[1].role, GoogleRole::Model);
        assert_eq!(current.parts, vec![Part::text("five")]);
    }

    #[tokio::test]
    async fn test_claude_dispatch() {
        let fakes = Fakes::new();
        let result = fakes
            .router()
            .generate_response(
                &[ChatMessage::user("hi")],
                "claude-3-opus-20240229",
                GenerationOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(result.content, "claude says hi");
        assert_eq!(fakes.claude.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_claude_streaming_is_unsupported() {
        let fakes = Fakes::new();
        let err = fakes
            .router()
            .generate_stream_response(
                &[ChatMessage::user("hi")],
                "claude-3-opus-20240229",
                GenerationOptions::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AiError::UnsupportedCapability { ref model, .. } if model == "claude-3-opus-20240229"
        ));
        assert_eq!(fakes.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_openai_streaming() {
        let fakes = Fakes::new();
        let stream = fakes
            .router()
            .generate_stream_response(
                &[ChatMessage::user("hi")],
                "gpt-4",
                GenerationOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(stream.model(), "gpt-4");
        assert_eq!(stream.collect_text().await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_multimodal_non_google_drops_images() {
        let fakes = Fakes::new();
        let router = fakes.router();

        let multimodal = [MultimodalMessage::new(Role::User, "describe")
            .with_image(ImageAttachment::new(PIXEL, "image/png"))];
        let degraded = router
            .generate_multimodal_response(&multimodal, "gpt-4", GenerationOptions::default())
            .await
            .unwrap();
        let sent_multimodal = fakes.openai.last.lock().clone().unwrap();

        let plain = router
            .generate_response(
                &[ChatMessage::user("describe")],
                "gpt-4",
                GenerationOptions::default(),
            )
            .await
            .unwrap();
        let sent_plain = fakes.openai.last.lock().clone().unwrap();

        assert_eq!(degraded, plain);
        assert_eq!(sent_multimodal, sent_plain);
        assert_eq!(fakes.google.multimodal_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_multimodal_google_parts() {
        let fakes = Fakes::new();
        let image = ImageAttachment::new(format!("data:image/png;base64,{}", PIXEL), "image/png");
        let multimodal = [MultimodalMessage::new(Role::User, "what is this?").with_image(image)];

        let result = fakes
            .router()
            .generate_multimodal_response(
                &multimodal,
                "gemini-1.5-pro",
                GenerationOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(result.content, "gemini sees");

        let sent = fakes.google.last.lock().clone();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].parts[0], Part::text("what is this?"));
        assert!(sent[0].parts[1].is_image());
    }

    #[tokio::test]
    async fn test_multimodal_google_rejects_invalid_image() {
        let fakes = Fakes::new();
        let multimodal = [MultimodalMessage::new(Role::User, "hm")
            .with_image(ImageAttachment::new(PIXEL, "application/pdf"))];

        let err = fakes
            .router()
            .generate_multimodal_response(
                &multimodal,
                "gemini-1.5-pro",
                GenerationOptions::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::InvalidImage(_)));
        assert_eq!(fakes.total_calls(), 0);
    }

    #[test]
    fn test_catalog() {
        let fakes = Fakes::new();
        let catalog = fakes.router().available_models();

        let openai_len = fakes.openai.available_models().len();
        let claude_len = fakes.claude.available_models().len();
        assert_eq!(catalog.len(), openai_len + claude_len + 2);

        assert!(catalog
            .iter()
            .filter(|m| m.provider == ProviderTag::OpenAI)
            .all(|m| !m.supports_images));
        assert!(catalog
            .iter()
            .filter(|m| m.provider == ProviderTag::Google)
            .all(|m| m.supports_images));
        assert_eq!(catalog[0].id, "gpt-4");
        assert_eq!(catalog[openai_len].provider, ProviderTag::Claude);
    }

    #[tokio::test]
    async fn test_timeout() {
        let fakes = Fakes {
            openai: Arc::new(FakeOpenAi {
                delay: Some(Duration::from_secs(10)),
                ..Default::default()
            }),
            claude: Arc::new(FakeClaude::default()),
            google: Arc::new(FakeGoogle::default()),
        };
        let router = AiRouter::builder()
            .openai(fakes.openai.clone())
            .request_timeout(Duration::from_millis(50))
            .build();

        let err = router
            .generate_response(&[ChatMessage::user("hi")], "gpt-4", GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AiError::Timeout {
                provider: ProviderTag::OpenAI,
                ..
            }
        ));
        assert_eq!(router.usage_snapshot()[0].failures, 1);
    }

    #[tokio::test]
    async fn test_missing_adapter_fails_closed() {
        let router = AiRouter::builder().build();
        let err = router
            .generate_response(
                &[ChatMessage::user("hi")],
                "gemini-1.5-flash",
                GenerationOptions::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::UnhandledProvider(ProviderTag::Google)));
        assert!(router.available_models().is_empty());
    }

    #[tokio::test]
    async fn test_usage_is_recorded() {
        let fakes = Fakes::new();
        let router = fakes.router();
        for _ in 0..2 {
            router
                .generate_response(
                    &[ChatMessage::user("hi")],
                    "gpt-4",
                    GenerationOptions::default(),
                )
                .await
                .unwrap();
        }
        router
            .generate_response(
                &[ChatMessage::user("hi")],
                "gemini-1.5-flash",
                GenerationOptions::default(),
            )
            .await
            .unwrap();

        let snapshot = router.usage_snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].model, "gpt-4");
        assert_eq!(snapshot[0].requests, 2);
        assert_eq!(snapshot[0].tokens, 10);
        assert_eq!(router.usage_monitor().total_tokens(ProviderTag::Google), 9);
    }

    #[test]
    fn test_from_config_requires_google_key() {
        let err = AiRouter::from_config(&AiConfig::default()).err().unwrap();
        assert!(matches!(err, AiError::Configuration(_)));

        let config = AiConfig {
            google_api_key: Some("g-key".to_string()),
            ..Default::default()
        };
        let router = AiRouter::from_config(&config).unwrap();
        assert_eq!(router.available_models().len(), 3 + 3 + 2);
        assert_eq!(router.classify_provider("gemini-1.5-pro").unwrap(), ProviderTag::Google);
    }

    #[tokio::test]
    async fn test_from_config_without_openai_key() {
        let config = AiConfig {
            google_api_key: Some("g-key".to_string()),
            ..Default::default()
        };
        let router = AiRouter::from_config(&config).unwrap();
        let err = router
            .generate_response(&[ChatMessage::user("hi")], "gpt-4", GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AiError::ProviderNotConfigured {
                provider: ProviderTag::OpenAI
            }
        ));
    }
}
