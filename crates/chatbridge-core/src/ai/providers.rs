//! AI provider classification
//!
//! Maps a model identifier to exactly one provider by prefix. The table is
//! checked in order and no identifier may match more than one rule.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{AiError, Result};

/// Unique identifier for each supported provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderTag {
    #[serde(rename = "openai")]
    OpenAI,
    Claude,
    Google,
}

/// Prefix rules, checked in this order
pub const PREFIX_RULES: &[(&str, ProviderTag)] = &[
    ("gpt-", ProviderTag::OpenAI),
    ("text-", ProviderTag::OpenAI),
    ("claude-", ProviderTag::Claude),
    ("gemini-", ProviderTag::Google),
];

impl ProviderTag {
    /// Stable lowercase key (used in config files and usage records)
    pub fn storage_key(&self) -> &'static str {
        match self {
            ProviderTag::OpenAI => "openai",
            ProviderTag::Claude => "claude",
            ProviderTag::Google => "google",
        }
    }

    /// Whether the provider can stream incremental text
    pub fn supports_streaming(&self) -> bool {
        matches!(self, ProviderTag::OpenAI)
    }

    /// Whether the provider accepts inline images
    pub fn supports_images(&self) -> bool {
        matches!(self, ProviderTag::Google)
    }
}

impl fmt::Display for ProviderTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderTag::OpenAI => write!(f, "OpenAI"),
            ProviderTag::Claude => write!(f, "Claude"),
            ProviderTag::Google => write!(f, "Google"),
        }
    }
}

/// Classify a model identifier to its provider
pub fn classify_provider(model_id: &str) -> Result<ProviderTag> {
    PREFIX_RULES
        .iter()
        .find(|(prefix, _)| model_id.starts_with(prefix))
        .map(|(_, tag)| *tag)
        .ok_or_else(|| AiError::UnknownProvider {
            model: model_id.to_string(),
        })
}
