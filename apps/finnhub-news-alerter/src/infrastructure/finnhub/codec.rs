//! Feed Codec
//!
//! JSON encoding and decoding for Finnhub frames. Decode failures are
//! per-message: the session drops the offending frame and keeps the
//! connection open.

use serde::Serialize;

use super::messages::FeedMessage;

/// Codec errors.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// JSON encoding/decoding failed.
    #[error("JSON codec error: {0}")]
    Json(#[from] serde_json::Error),

    /// Payload is not a JSON object.
    #[error("invalid frame format: {0}")]
    InvalidFormat(String),
}

/// JSON codec for the news feed.
#[derive(Debug, Default, Clone)]
pub struct JsonCodec;

impl JsonCodec {
    /// Create a new JSON codec.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Decode one inbound frame.
    ///
    /// Unknown `type` values decode to [`FeedMessage::Other`]; only
    /// structurally invalid payloads fail.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError`] if the payload is not a JSON object or
    /// does not match the frame schema.
    pub fn decode(&self, text: &str) -> Result<FeedMessage, CodecError> {
        let trimmed = text.trim();

        if !trimmed.starts_with('{') {
            let preview: String = trimmed.chars().take(40).collect();
            return Err(CodecError::InvalidFormat(format!(
                "expected JSON object, got: {preview}"
            )));
        }

        Ok(serde_json::from_str(trimmed)?)
    }

    /// Encode an outbound frame.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError`] if serialization fails.
    pub fn encode<T: Serialize>(&self, frame: &T) -> Result<String, CodecError> {
        Ok(serde_json::to_string(frame)?)
    }
}
