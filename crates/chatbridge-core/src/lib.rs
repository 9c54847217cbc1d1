//! Chatbridge Core - multi-provider AI message routing
//!
//! This crate provides:
//! - Model id classification to OpenAI, Claude or Gemini
//! - One adapter per provider behind injectable traits
//! - Message normalization, including Gemini's multimodal parts
//! - Incremental text streaming for OpenAI models
//! - Configuration from a TOML file and the environment

pub mod ai;
pub mod config;
pub mod constants;
pub mod error;
pub mod paths;

// Re-exports for convenience
pub use ai::router::{AiRouter, GenerationOptions};
pub use ai::stream::TextStream;
pub use ai::types::{
    ChatMessage, GenerationResult, ImageAttachment, ModelDescriptor, MultimodalMessage, Role,
};
pub use ai::usage::{UsageMonitor, UsageRecord};
pub use config::AiConfig;
pub use error::{AiError, Result};
