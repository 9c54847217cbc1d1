//! Image attachment validation and loading

use base64::Engine;
use std::path::Path;

use super::format::google::strip_data_url;
use super::types::ImageAttachment;
use crate::config::ImageLimits;
use crate::error::{AiError, Result};

/// MIME types accepted as inline image data
pub const SUPPORTED_MIME_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/webp",
    "image/gif",
    "image/heic",
    "image/heif",
];

/// Check MIME type, base64 well-formedness and decoded size
pub fn validate_image(image: &ImageAttachment, limits: &ImageLimits) -> Result<()> {
    let mime = image.mime_type.trim().to_ascii_lowercase();
    if !SUPPORTED_MIME_TYPES.contains(&mime.as_str()) {
        return Err(AiError::InvalidImage(format!(
            "unsupported MIME type: {}",
            image.mime_type
        )));
    }

    let payload = strip_data_url(&image.data);
    if payload.is_empty() {
        return Err(AiError::InvalidImage("empty image payload".to_string()));
    }

    // Cheap upper bound before decoding
    let estimated = payload.len() / 4 * 3;
    if estimated > limits.max_bytes + 3 {
        return Err(AiError::InvalidImage(format!(
            "image exceeds {} bytes",
            limits.max_bytes
        )));
    }

    let decoded = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| AiError::InvalidImage(format!("invalid base64: {}", e)))?;

    if decoded.len() > limits.max_bytes {
        return Err(AiError::InvalidImage(format!(
            "image is {} bytes, limit is {}",
            decoded.len(),
            limits.max_bytes
        )));
    }

    Ok(())
}

/// Guess an image MIME type from a file extension
pub fn mime_type_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        _ => None,
    }
}

/// Read an image file into a base64 attachment
pub fn image_attachment_from_path(path: &Path) -> Result<ImageAttachment> {
    let mime = mime_type_for_path(path).ok_or_else(|| {
        AiError::InvalidImage(format!("unrecognized image extension: {}", path.display()))
    })?;
    let bytes = std::fs::read(path)
        .map_err(|e| AiError::InvalidImage(format!("failed to read {}: {}", path.display(), e)))?;
    Ok(ImageAttachment::new(
        base64::engine::general_purpose::STANDARD.encode(bytes),
        mime,
    ))
}
