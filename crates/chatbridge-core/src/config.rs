//! Provider credentials and router settings
//!
//! Resolution order, lowest to highest: built-in defaults, TOML file,
//! environment variables. Empty values count as absent.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::ai::providers::ProviderTag;
use crate::constants;
use crate::paths;

/// Generation parameters applied to every Gemini request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleGenerationConfig {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl Default for GoogleGenerationConfig {
    fn default() -> Self {
        Self {
            temperature: constants::google::TEMPERATURE,
            top_k: constants::google::TOP_K,
            top_p: constants::google::TOP_P,
            max_output_tokens: constants::google::MAX_OUTPUT_TOKENS,
        }
    }
}

/// Limits applied to inline image attachments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageLimits {
    pub max_bytes: usize,
}

impl Default for ImageLimits {
    fn default() -> Self {
        Self {
            max_bytes: constants::images::MAX_IMAGE_BYTES,
        }
    }
}

/// Everything the router and adapters need, passed explicitly at construction
#[derive(Clone)]
pub struct AiConfig {
    pub openai_api_key: Option<String>,
    pub claude_api_key: Option<String>,
    pub google_api_key: Option<String>,
    pub openai_base_url: String,
    pub anthropic_base_url: String,
    pub google_base_url: String,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub google_generation: GoogleGenerationConfig,
    pub image_limits: ImageLimits,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            claude_api_key: None,
            google_api_key: None,
            openai_base_url: constants::endpoints::OPENAI_BASE_URL.to_string(),
            anthropic_base_url: constants::endpoints::ANTHROPIC_BASE_URL.to_string(),
            google_base_url: constants::endpoints::GOOGLE_BASE_URL.to_string(),
            request_timeout: constants::http::REQUEST_TIMEOUT,
            connect_timeout: constants::http::CONNECT_TIMEOUT,
            google_generation: GoogleGenerationConfig::default(),
            image_limits: ImageLimits::default(),
        }
    }
}

// Keys stay out of Debug output so configs can be logged.
impl std::fmt::Debug for AiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiConfig")
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| "***"))
            .field("claude_api_key", &self.claude_api_key.as_ref().map(|_| "***"))
            .field("google_api_key", &self.google_api_key.as_ref().map(|_| "***"))
            .field("openai_base_url", &self.openai_base_url)
            .field("anthropic_base_url", &self.anthropic_base_url)
            .field("google_base_url", &self.google_base_url)
            .field("request_timeout", &self.request_timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("google_generation", &self.google_generation)
            .field("image_limits", &self.image_limits)
            .finish()
    }
}

/// On-disk layout of `config.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub openai: ProviderSection,
    pub claude: ProviderSection,
    pub google: GoogleSection,
    pub request_timeout_secs: Option<u64>,
    pub connect_timeout_secs: Option<u64>,
    pub max_image_bytes: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSection {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleSection {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub temperature: Option<f32>,
    pub top_k: Option<u32>,
    pub top_p: Option<f32>,
    pub max_output_tokens: Option<u32>,
}

impl AiConfig {
    /// Load from the default config file (if present) and the process environment
    pub fn load() -> Result<Self> {
        Self::load_from_path(&paths::config_file())
    }

    /// Load from a specific config file (if present) and the process environment
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = Self::default();
        if path.exists() {
            let file = ConfigFile::read(path)?;
            config.apply_file(file);
            tracing::debug!("Loaded config file {:?}", path);
        }
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Overlay values from a parsed config file
    pub fn apply_file(&mut self, file: ConfigFile) {
        set_if_present(&mut self.openai_api_key, file.openai.api_key);
        set_if_present(&mut self.claude_api_key, file.claude.api_key);
        set_if_present(&mut self.google_api_key, file.google.api_key);

        if let Some(url) = non_empty(file.openai.base_url) {
            self.openai_base_url = url;
        }
        if let Some(url) = non_empty(file.claude.base_url) {
            self.anthropic_base_url = url;
        }
        if let Some(url) = non_empty(file.google.base_url) {
            self.google_base_url = url;
        }

        if let Some(secs) = file.request_timeout_secs {
            self.request_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = file.connect_timeout_secs {
            self.connect_timeout = Duration::from_secs(secs);
        }
        if let Some(max) = file.max_image_bytes {
            self.image_limits.max_bytes = max;
        }

        let generation = &mut self.google_generation;
        if let Some(t) = file.google.temperature {
            generation.temperature = t;
        }
        if let Some(k) = file.google.top_k {
            generation.top_k = k;
        }
        if let Some(p) = file.google.top_p {
            generation.top_p = p;
        }
        if let Some(m) = file.google.max_output_tokens {
            generation.max_output_tokens = m;
        }
    }

    /// Overlay values from environment-style lookups
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let first = |names: &[&str]| names.iter().find_map(|&n| non_empty(lookup(n)));

        set_if_present(&mut self.openai_api_key, first(&["OPENAI_API_KEY"]));
        set_if_present(
            &mut self.claude_api_key,
            first(&["ANTHROPIC_API_KEY", "CLAUDE_API_KEY"]),
        );
        set_if_present(
            &mut self.google_api_key,
            first(&["GOOGLE_API_KEY", "GEMINI_API_KEY"]),
        );

        if let Some(url) = first(&["CHATBRIDGE_OPENAI_BASE_URL"]) {
            self.openai_base_url = url;
        }
        if let Some(url) = first(&["CHATBRIDGE_ANTHROPIC_BASE_URL"]) {
            self.anthropic_base_url = url;
        }
        if let Some(url) = first(&["CHATBRIDGE_GOOGLE_BASE_URL"]) {
            self.google_base_url = url;
        }
        if let Some(raw) = first(&["CHATBRIDGE_TIMEOUT_SECS"]) {
            match raw.trim().parse::<u64>() {
                Ok(secs) => self.request_timeout = Duration::from_secs(secs),
                Err(_) => tracing::warn!("Ignoring invalid CHATBRIDGE_TIMEOUT_SECS: {}", raw),
            }
        }
    }

    /// API key configured for a provider
    pub fn api_key(&self, provider: ProviderTag) -> Option<&str> {
        match provider {
            ProviderTag::OpenAI => self.openai_api_key.as_deref(),
            ProviderTag::Claude => self.claude_api_key.as_deref(),
            ProviderTag::Google => self.google_api_key.as_deref(),
        }
    }

    /// Base URL for a provider, without trailing slash
    pub fn base_url(&self, provider: ProviderTag) -> &str {
        let url = match provider {
            ProviderTag::OpenAI => &self.openai_base_url,
            ProviderTag::Claude => &self.anthropic_base_url,
            ProviderTag::Google => &self.google_base_url,
        };
        url.trim_end_matches('/')
    }

    /// Build the HTTP client shared by one adapter
    pub(crate) fn http_client(&self) -> reqwest::Client {
        reqwest::Client::builder()
            .user_agent(constants::http::USER_AGENT)
            .connect_timeout(self.connect_timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::error!("Failed to build HTTP client: {}. Using default client.", e);
                reqwest::Client::new()
            })
    }
}

impl ConfigFile {
    /// Parse a TOML config file
    pub fn read(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let file: ConfigFile = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(file)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn set_if_present(slot: &mut Option<String>, value: Option<String>) {
    if let Some(v) = non_empty(value) {
        *slot = Some(v);
    }
}
