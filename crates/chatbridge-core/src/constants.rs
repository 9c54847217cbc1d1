//! Application constants and configuration defaults
//!
//! Centralized location for magic numbers and default values

use std::time::Duration;

/// HTTP client configuration
pub mod http {
    use super::*;

    /// Connection timeout for HTTP requests
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Upper bound for a whole provider call (opening the stream, for streaming calls)
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

    /// User agent sent to providers
    pub const USER_AGENT: &str = concat!("chatbridge/", env!("CARGO_PKG_VERSION"));
}

/// Router defaults
pub mod ai {
    /// Default output token cap per call
    pub const DEFAULT_MAX_TOKENS: u32 = 1000;

    /// Default sampling temperature
    pub const DEFAULT_TEMPERATURE: f32 = 0.7;

    /// Default OpenAI model when an adapter is called directly
    pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4";

    /// Default Gemini model when an adapter is called directly
    pub const DEFAULT_GOOGLE_MODEL: &str = "gemini-1.5-flash";

    /// Capacity of the channel behind a text stream
    pub const STREAM_CHANNEL_CAPACITY: usize = 32;
}

/// Google generation defaults (adapter-level, not per request)
pub mod google {
    pub const TEMPERATURE: f32 = 0.7;
    pub const TOP_K: u32 = 40;
    pub const TOP_P: f32 = 0.95;
    pub const MAX_OUTPUT_TOKENS: u32 = 8192;
}

/// Provider endpoints
pub mod endpoints {
    pub const OPENAI_BASE_URL: &str = "https://api.openai.com";
    pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
    pub const GOOGLE_BASE_URL: &str = "https://generativelanguage.googleapis.com";

    /// API version header for Anthropic
    pub const ANTHROPIC_API_VERSION: &str = "2023-06-01";
}

/// Image attachment limits
pub mod images {
    /// Largest decoded image accepted (matches Gemini's inline data cap)
    pub const MAX_IMAGE_BYTES: usize = 20 * 1024 * 1024;

    /// Fallback MIME type for fetched images with no declared type
    pub const DEFAULT_MIME_TYPE: &str = "image/jpeg";
}

/// Config file locations
pub mod config {
    /// Config directory name
    pub const CONFIG_DIR_NAME: &str = ".chatbridge";

    /// Config file name inside the config directory
    pub const CONFIG_FILE_NAME: &str = "config.toml";

    /// Log directory name inside the config directory
    pub const LOGS_DIR_NAME: &str = "logs";
}
