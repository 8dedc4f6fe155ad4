//! Image payload decoding for the image audit.

use std::sync::LazyLock;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use regex::Regex;

use crate::errors::AppError;
use crate::llm_client::InlineImage;

const DEFAULT_MIME_TYPE: &str = "image/png";

static DATA_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^data:(image/[A-Za-z0-9.+-]+);base64,").expect("valid data-url regex")
});

/// Accepts a data URL or raw base64 and returns the model's inline image part.
pub fn parse_image_payload(payload: &str) -> Result<InlineImage, AppError> {
    let payload = payload.trim();
    let (mime_type, data) = match DATA_URL_RE.captures(payload) {
        Some(caps) => {
            let prefix_len = caps.get(0).map_or(0, |m| m.end());
            let mime = caps.get(1).map_or(DEFAULT_MIME_TYPE, |m| m.as_str());
            (mime.to_ascii_lowercase(), &payload[prefix_len..])
        }
        None => (DEFAULT_MIME_TYPE.to_string(), payload),
    };

    if data.is_empty() {
        return Err(AppError::Validation("No image data found".to_string()));
    }

    // Some encoders wrap lines; the model API wants one unbroken string.
    let data: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD
        .decode(&data)
        .map_err(|_| AppError::Validation("Image data is not valid base64".to_string()))?;

    Ok(InlineImage { mime_type, data })
}
