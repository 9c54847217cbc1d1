//! Provider-agnostic domain types
//!
//! Everything here is transient: built per call, never persisted by this crate.

use serde::{Deserialize, Serialize};

use super::providers::ProviderTag;

/// Message role at the router boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single conversation turn. Sequences are ordered oldest to newest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Inline image: base64 payload (raw or `data:<mime>;base64,` prefixed) plus MIME type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAttachment {
    pub data: String,
    pub mime_type: String,
}

impl ImageAttachment {
    pub fn new(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }
}

/// A message that may carry images alongside its text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultimodalMessage {
    pub role: Role,
    pub content: String,
    #[serde(default)]
    pub images: Vec<ImageAttachment>,
}

impl MultimodalMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            images: Vec::new(),
        }
    }

    /// Builder: attach an image
    pub fn with_image(mut self, image: ImageAttachment) -> Self {
        self.images.push(image);
        self
    }

    /// Drop images, keeping role and text
    pub fn to_text_message(&self) -> ChatMessage {
        ChatMessage::new(self.role, self.content.clone())
    }
}

impl From<ChatMessage> for MultimodalMessage {
    fn from(message: ChatMessage) -> Self {
        Self {
            role: message.role,
            content: message.content,
            images: Vec::new(),
        }
    }
}

/// Normalized output of every generation call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub content: String,
    /// Best-effort usage count; 0 when the provider does not report it
    pub tokens: u64,
}

impl GenerationResult {
    pub fn new(content: impl Into<String>, tokens: u64) -> Self {
        Self {
            content: content.into(),
            tokens,
        }
    }
}

/// Read-only catalog entry, rebuilt on every catalog request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDescriptor {
    pub id: String,
    pub name: String,
    pub provider: ProviderTag,
    pub max_tokens: u32,
    pub cost_per_token: f64,
    pub supports_images: bool,
    pub supports_text: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            "\"assistant\""
        );
    }

    #[test]
    fn test_multimodal_to_text_drops_images() {
        let msg = MultimodalMessage::new(Role::User, "what is this?")
            .with_image(ImageAttachment::new("aGVsbG8=", "image/png"));
        assert_eq!(msg.images.len(), 1);
        assert_eq!(msg.to_text_message(), ChatMessage::user("what is this?"));
    }

    #[test]
    fn test_model_descriptor_wire_names() {
        let descriptor = ModelDescriptor {
            id: "gpt-4".to_string(),
            name: "gpt-4".to_string(),
            provider: ProviderTag::OpenAI,
            max_tokens: 4000,
            cost_per_token: 0.00003,
            supports_images: false,
            supports_text: true,
        };
        let json = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(json["maxTokens"], 4000);
        assert_eq!(json["costPerToken"], 0.00003);
        assert_eq!(json["supportsImages"], false);
        assert_eq!(json["supportsText"], true);
        assert_eq!(json["provider"], "openai");
    }

    #[test]
    fn test_multimodal_message_images_default() {
        let msg: MultimodalMessage =
            serde_json::from_str(r#"{"role":"user","content":"hi"}"#).unwrap();
        assert!(msg.images.is_empty());
    }
}
