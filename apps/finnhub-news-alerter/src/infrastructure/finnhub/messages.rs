//! Finnhub Wire Messages
//!
//! Frame types for the Finnhub news WebSocket. All frames are JSON
//! objects discriminated by a `type` field.
//!
//! # Outbound
//!
//! ```json
//! {"type":"auth","token":"<key>"}
//! {"type":"subscribe","symbol":"AAPL"}
//! ```
//!
//! # Inbound
//!
//! ```json
//! {"type":"news","data":[{"headline":"...","summary":"...","url":"...","datetime":1712345678}]}
//! {"type":"ping"}
//! ```
//!
//! Any other inbound `type` is tolerated and ignored so that new
//! server-side message kinds never break a running client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Outbound Frames
// =============================================================================

/// Authentication frame carrying the API credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthRequest {
    /// Frame discriminator, always `"auth"`.
    #[serde(rename = "type")]
    pub msg_type: String,
    /// API token.
    pub token: String,
}

impl AuthRequest {
    /// Build an auth frame for the given token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            msg_type: "auth".to_string(),
            token: token.into(),
        }
    }
}

/// Subscription frame for one feed topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscribeRequest {
    /// Frame discriminator, always `"subscribe"`.
    #[serde(rename = "type")]
    pub msg_type: String,
    /// Topic to subscribe to (ticker symbol or `general`).
    pub symbol: String,
}

impl SubscribeRequest {
    /// Build a subscribe frame for the given topic.
    #[must_use]
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            msg_type: "subscribe".to_string(),
            symbol: symbol.into(),
        }
    }
}

// =============================================================================
// Inbound Frames
// =============================================================================

/// Inbound frame, discriminated by `type`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FeedMessage {
    /// A batch of news articles.
    News(NewsMessage),
    /// Server keepalive.
    Ping,
    /// Any other message type; ignored for forward compatibility.
    #[serde(other)]
    Other,
}

/// Payload of a `news` frame.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NewsMessage {
    /// Articles in feed order.
    #[serde(default)]
    pub data: Vec<WireArticle>,
}

/// One article as carried on the wire.
///
/// Fields the pipeline does not use (`category`, `id`, `image`,
/// `related`, `source`) are ignored during deserialization.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WireArticle {
    /// Headline text.
    #[serde(default)]
    pub headline: String,
    /// Article summary; may be absent or empty.
    #[serde(default)]
    pub summary: Option<String>,
    /// Link to the full story.
    #[serde(default)]
    pub url: String,
    /// Publication time as epoch seconds.
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub datetime: Option<DateTime<Utc>>,
}

impl From<WireArticle> for crate::domain::article::Article {
    fn from(wire: WireArticle) -> Self {
        Self::new(wire.headline, wire.summary, wire.url, wire.datetime)
    }
}
