//! AI provider layer
//!
//! Routes chat requests to OpenAI, Anthropic Claude or Google Gemini by
//! model identifier and normalizes their replies.

// Provider surfaces
pub mod adapters;
pub mod format;
pub mod providers;

// Routing and catalog
pub mod models;
pub mod router;

// Shared infrastructure
pub mod images;
pub mod sse;
pub mod stream;
pub mod types;
pub mod usage;

pub use providers::{classify_provider, ProviderTag};
pub use router::{AiRouter, AiRouterBuilder, GenerationOptions};
pub use stream::TextStream;
