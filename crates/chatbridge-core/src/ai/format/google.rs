//! Google/Gemini API format handler
//!
//! Handles conversion to Google AI `contents`/`parts`, the chat-session split
//! of history vs. current turn, and inline image parts.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use super::token_count;
use crate::ai::types::{ChatMessage, GenerationResult, ImageAttachment, MultimodalMessage, Role};
use crate::config::GoogleGenerationConfig;
use crate::error::{AiError, Result};

/// Role at the Google boundary (`model` is its only non-user role)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoogleRole {
    User,
    Model,
}

impl From<Role> for GoogleRole {
    fn from(role: Role) -> Self {
        match role {
            Role::Assistant => GoogleRole::Model,
            Role::User => GoogleRole::User,
        }
    }
}

/// Raw base64 bytes with their MIME type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    pub mime_type: String,
    pub data: String,
}

/// One element of a content's `parts`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: Blob,
    },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, Part::InlineData { .. })
    }
}

/// A Google message: role plus ordered parts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoogleContent {
    pub role: GoogleRole,
    pub parts: Vec<Part>,
}

/// Strip an optional `data:<mime>;base64,` prefix, leaving the raw payload
pub fn strip_data_url(data: &str) -> &str {
    data.strip_prefix("data:")
        .and_then(|rest| rest.find(";base64,").map(|idx| &rest[idx + ";base64,".len()..]))
        .unwrap_or(data)
}

/// Embed base64 image bytes (raw or data-URL prefixed) as an inline data part
pub fn convert_image_to_part(base64_image: &str, mime_type: &str) -> Part {
    Part::InlineData {
        inline_data: Blob {
            mime_type: mime_type.to_string(),
            data: strip_data_url(base64_image).to_string(),
        },
    }
}

/// Build a message: text part first (when non-empty), then images in input order
pub fn create_message(
    role: GoogleRole,
    content: &str,
    images: &[ImageAttachment],
) -> GoogleContent {
    let mut parts = Vec::with_capacity(images.len() + 1);
    if !content.is_empty() {
        parts.push(Part::text(content));
    }
    parts.extend(
        images
            .iter()
            .map(|image| convert_image_to_part(&image.data, &image.mime_type)),
    );
    GoogleContent { role, parts }
}

/// Text-only translation: `assistant` becomes `model`, content becomes one text part
pub fn convert_messages(messages: &[ChatMessage]) -> Vec<GoogleContent> {
    messages
        .iter()
        .map(|m| GoogleContent {
            role: m.role.into(),
            parts: vec![Part::text(m.content.clone())],
        })
        .collect()
}

/// Multimodal translation: text part (if any) followed by image parts
pub fn convert_multimodal_messages(messages: &[MultimodalMessage]) -> Vec<GoogleContent> {
    messages
        .iter()
        .map(|m| create_message(m.role.into(), &m.content, &m.images))
        .collect()
}

/// A chat context seeded with prior history, answering one more turn
#[derive(Debug, Clone)]
pub struct ChatSession<'a> {
    pub history: &'a [GoogleContent],
    pub system_instruction: Option<&'a str>,
}

impl<'a> ChatSession<'a> {
    /// Split messages into history (all but the last) and the current turn
    pub fn start(
        messages: &'a [GoogleContent],
        system_instruction: Option<&'a str>,
    ) -> Option<(Self, &'a GoogleContent)> {
        let (current, history) = messages.split_last()?;
        Some((
            Self {
                history,
                system_instruction,
            },
            current,
        ))
    }

    /// Request body for sending `current_parts` as the next user turn
    pub fn request_body(
        &self,
        current_parts: &[Part],
        generation: &GoogleGenerationConfig,
    ) -> Value {
        let mut contents: Vec<Value> = self
            .history
            .iter()
            .map(|c| serde_json::to_value(c).unwrap_or(Value::Null))
            .collect();
        contents.push(serde_json::json!({
            "role": GoogleRole::User,
            "parts": current_parts,
        }));

        let mut body = serde_json::json!({
            "contents": contents,
            "generationConfig": generation,
        });

        if let Some(system) = self.system_instruction {
            body["systemInstruction"] = serde_json::json!({
                "parts": [{"text": system}]
            });
        }

        body
    }
}

/// URL of a non-streaming generateContent call
///
/// The model id becomes a single percent-encoded segment under `models/`.
pub fn endpoint_url(base_url: &str, model: &str) -> Result<Url> {
    let mut url = Url::parse(base_url).map_err(|e| {
        AiError::Configuration(format!("invalid Google base URL {}: {}", base_url, e))
    })?;
    url.path_segments_mut()
        .map_err(|_| AiError::Configuration(format!("Google base URL has no path: {}", base_url)))?
        .pop_if_empty()
        .extend(["v1beta", "models"])
        .push(&format!("{}:generateContent", model));
    Ok(url)
}

/// Concatenate the first candidate's text parts and read total usage
pub fn extract_response(response: &Value) -> GenerationResult {
    let content = response
        .get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|arr| arr.first())
        .and_then(|candidate| candidate.get("content"))
        .and_then(|content| content.get("parts"))
        .and_then(|parts| parts.as_array())
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    GenerationResult {
        content,
        tokens: token_count(response, "/usageMetadata/totalTokenCount"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PIXEL: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    #[test]
    fn test_role_translation() {
        let messages = vec![
            ChatMessage::user("a"),
            ChatMessage::assistant("b"),
            ChatMessage::user("c"),
        ];
        let contents = convert_messages(&messages);
        let roles: Vec<GoogleRole> = contents.iter().map(|c| c.role).collect();
        assert_eq!(roles, vec![GoogleRole::User, GoogleRole::Model, GoogleRole::User]);
        assert_eq!(contents[1].parts, vec![Part::text("b")]);
    }

    #[test]
    fn test_part_wire_shape() {
        let text = serde_json::to_value(Part::text("hi")).unwrap();
        assert_eq!(text, serde_json::json!({"text": "hi"}));

        let image = serde_json::to_value(convert_image_to_part("AAAA", "image/png")).unwrap();
        assert_eq!(
            image,
            serde_json::json!({"inlineData": {"mimeType": "image/png", "data": "AAAA"}})
        );
    }

    #[test]
    fn test_convert_image_to_part_strips_data_url() {
        let prefixed = format!("data:image/png;base64,{}", PIXEL);
        assert_eq!(
            convert_image_to_part(&prefixed, "image/png"),
            convert_image_to_part(PIXEL, "image/png")
        );
    }

    #[test]
    fn test_strip_data_url_is_idempotent() {
        let prefixed = format!("data:image/jpeg;base64,{}", PIXEL);
        let once = strip_data_url(&prefixed);
        assert_eq!(once, PIXEL);
        assert_eq!(strip_data_url(once), PIXEL);
        // Padding survives untouched
        assert!(strip_data_url(PIXEL).ends_with("=="));
    }

    #[test]
    fn test_strip_data_url_without_base64_marker() {
        assert_eq!(strip_data_url("data:text/plain,hello"), "data:text/plain,hello");
    }

    #[test]
    fn test_create_message_orders_text_before_images() {
        let images = vec![
            ImageAttachment::new("AAAA", "image/png"),
            ImageAttachment::new("BBBB", "image/jpeg"),
        ];
        let message = create_message(GoogleRole::User, "look", &images);
        assert_eq!(message.parts.len(), 3);
        assert_eq!(message.parts[0], Part::text("look"));
        assert_eq!(message.parts[1], convert_image_to_part("AAAA", "image/png"));
        assert_eq!(message.parts[2], convert_image_to_part("BBBB", "image/jpeg"));
    }

    #[test]
    fn test_create_message_empty_text() {
        let images = vec![ImageAttachment::new("AAAA", "image/png")];
        let message = create_message(GoogleRole::User, "", &images);
        assert_eq!(message.parts.len(), 1);
        assert!(message.parts[0].is_image());
    }

    #[test]
    fn test_chat_session_split() {
        let contents = convert_messages(&[
            ChatMessage::user("first"),
            ChatMessage::assistant("reply"),
            ChatMessage::user("second"),
        ]);
        let (session, current) = ChatSession::start(&contents, Some("be brief")).unwrap();
        assert_eq!(session.history.len(), 2);
        assert_eq!(session.history[1].role, GoogleRole::Model);
        assert_eq!(current.parts, vec![Part::text("second")]);

        let body = session.request_body(&current.parts, &GoogleGenerationConfig::default());
        let sent = body["contents"].as_array().unwrap();
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[1]["role"], "model");
        assert_eq!(sent[2]["role"], "user");
        assert_eq!(sent[2]["parts"][0]["text"], "second");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "be brief");
        assert_eq!(body["generationConfig"]["topK"], 40);
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 8192);
    }

    #[test]
    fn test_chat_session_empty() {
        assert!(ChatSession::start(&[], None).is_none());
    }

    #[test]
    fn test_extract_response() {
        let response = serde_json::json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Hi"}, {"text": " there"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {
                "promptTokenCount": 3,
                "candidatesTokenCount": 2,
                "totalTokenCount": 5
            }
        });
        assert_eq!(extract_response(&response), GenerationResult::new("Hi there", 5));
        assert_eq!(extract_response(&serde_json::json!({})), GenerationResult::default());
    }

    #[test]
    fn test_endpoint_url() {
        let url = endpoint_url("https://generativelanguage.googleapis.com", "gemini-1.5-pro")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-pro:generateContent"
        );

        let proxied = endpoint_url("http://proxy.local/google/", "gemini-1.5-flash").unwrap();
        assert_eq!(
            proxied.path(),
            "/google/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn test_endpoint_url_keeps_model_in_one_segment() {
        let url = endpoint_url("http://localhost:8080", "gemini-x/../../admin?k=1#frag").unwrap();
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
        assert!(url.path().starts_with("/v1beta/models/gemini-x%2F"));
        assert!(!url.path().contains("/admin"));
        assert_eq!(url.path_segments().unwrap().count(), 3);

        assert!(matches!(
            endpoint_url("not a url", "gemini-1.5-pro"),
            Err(AiError::Configuration(_))
        ));
    }
}
