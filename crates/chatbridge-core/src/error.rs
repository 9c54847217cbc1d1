//! Error types for the AI routing layer

use std::time::Duration;

use thiserror::Error;

use crate::ai::providers::ProviderTag;

/// Result alias used across the library
pub type Result<T> = std::result::Result<T, AiError>;

/// Errors surfaced by the router and the provider adapters
#[derive(Debug, Error)]
pub enum AiError {
    /// Model identifier matches no provider prefix rule
    #[error("unknown provider for model: {model}")]
    UnknownProvider { model: String },

    /// The provider behind this model cannot perform the requested operation
    #[error("{capability} is not supported for model: {model}")]
    UnsupportedCapability { model: String, capability: String },

    /// Upstream call failed (transport, auth, quota, malformed response)
    #[error("{message}")]
    ProviderCall {
        provider: ProviderTag,
        message: String,
    },

    /// Mandatory configuration is missing or invalid
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The adapter exists but has no credential to talk to its provider
    #[error("{provider} is not configured (missing API key)")]
    ProviderNotConfigured { provider: ProviderTag },

    /// Attached image failed validation
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// Provider did not answer within the configured request timeout
    #[error("{provider} request timed out after {after:?}")]
    Timeout { provider: ProviderTag, after: Duration },

    /// A provider tag reached dispatch without a matching branch
    #[error("no dispatch branch for provider: {0}")]
    UnhandledProvider(ProviderTag),
}

impl AiError {
    /// Build the coarse, caller-safe error for a failed provider call
    pub fn provider_call(provider: ProviderTag, detail: impl std::fmt::Display) -> Self {
        AiError::ProviderCall {
            provider,
            message: format!("{} generation failed: {}", provider, detail),
        }
    }

    /// The provider this error is attributed to, when there is one
    pub fn provider(&self) -> Option<ProviderTag> {
        match self {
            AiError::ProviderCall { provider, .. }
            | AiError::ProviderNotConfigured { provider }
            | AiError::Timeout { provider, .. } => Some(*provider),
            AiError::UnhandledProvider(provider) => Some(*provider),
            _ => None,
        }
    }
}
