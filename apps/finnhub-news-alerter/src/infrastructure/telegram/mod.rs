//! Telegram Notifier
//!
//! Delivers alerts through the Telegram Bot API `sendMessage` method.
//! Messages are formatted as HTML with a bold title and a "Read more"
//! link; link previews are disabled so the chat stays compact.
//!
//! # Request Shape
//!
//! ```json
//! POST https://api.telegram.org/bot<token>/sendMessage
//! {"chat_id":"...","text":"...","parse_mode":"HTML","disable_web_page_preview":true}
//! ```

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::application::ports::{DeliveryError, Notifier};

/// Default Telegram API host.
const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Request timeout for one delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// `sendMessage` request body.
#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
    disable_web_page_preview: bool,
}

/// Subset of the Bot API response envelope we care about.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Notifier adapter for the Telegram Bot API.
pub struct TelegramNotifier {
    client: reqwest::Client,
    send_message_url: String,
    chat_id: String,
}

impl TelegramNotifier {
    /// Create a notifier for the given bot token and chat.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::Transport`] if the HTTP client cannot
    /// be constructed.
    pub fn new(bot_token: &str, chat_id: impl Into<String>) -> Result<Self, DeliveryError> {
        Self::with_api_base(DEFAULT_API_BASE, bot_token, chat_id)
    }

    /// Create a notifier against a custom API host (used in tests).
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::Transport`] if the HTTP client cannot
    /// be constructed.
    pub fn with_api_base(
        api_base: &str,
        bot_token: &str,
        chat_id: impl Into<String>,
    ) -> Result<Self, DeliveryError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            send_message_url: format!("{api_base}/bot{bot_token}/sendMessage"),
            chat_id: chat_id.into(),
        })
    }

    /// Render the alert text as Telegram HTML.
    fn format_message(title: &str, body: &str, link: &str) -> String {
        format!(
            "\u{1f4f0} <b>{}</b>\n\n{}\n\u{1f517} <a href=\"{}\">Read more</a>",
            escape_html(title),
            escape_html(body),
            escape_html(link),
        )
    }
}

/// Escape text for Telegram's HTML parse mode.
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, title: &str, body: &str, link: &str) -> Result<(), DeliveryError> {
        let text = Self::format_message(title, body, link);
        let request = SendMessageRequest {
            chat_id: &self.chat_id,
            text: &text,
            parse_mode: "HTML",
            disable_web_page_preview: true,
        };

        let response = self
            .client
            .post(&self.send_message_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let status = response.status();
        let api: ApiResponse = response
            .json()
            .await
            .unwrap_or_else(|_| ApiResponse {
                ok: status.is_success(),
                description: None,
            });

        if status.is_success() && api.ok {
            Ok(())
        } else {
            Err(DeliveryError::Rejected {
                status: status.as_u16(),
                message: api
                    .description
                    .unwrap_or_else(|| "no description".to_string()),
            })
        }
    }
}
