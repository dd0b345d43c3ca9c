//! Alerter Configuration Settings
//!
//! Three secrets are required and validated before any connection
//! attempt; everything else has a default and can be tuned through the
//! environment.
//!
//! # Required
//! - `FINNHUB_API_KEY`
//! - `TELEGRAM_BOT_TOKEN`
//! - `TELEGRAM_CHAT_ID`
//!
//! # Optional
//! - `NEWS_ALERTER_FEED_URL`: WebSocket endpoint (default: `wss://ws.finnhub.io`)
//! - `NEWS_ALERTER_SYMBOLS`: comma-separated topic list
//! - `NEWS_ALERTER_KEYWORDS`: comma-separated keyword list
//! - `NEWS_ALERTER_SUMMARY_PLACEHOLDER`: body text for articles without a summary
//! - `NEWS_ALERTER_DEDUPE_CAPACITY`: bounded dedupe size (0 = unbounded)
//! - `NEWS_ALERTER_RECONNECT_DELAY_SECS`: backoff delay (default 5)
//! - `NEWS_ALERTER_RECONNECT_DELAY_MAX_SECS`: backoff cap (default 5)
//! - `NEWS_ALERTER_RECONNECT_MULTIPLIER`: backoff growth (default 1.0)
//! - `NEWS_ALERTER_RECONNECT_JITTER`: backoff jitter fraction (default 0.0)
//! - `NEWS_ALERTER_MAX_RECONNECT_ATTEMPTS`: attempt limit (default 0 = unlimited)

use std::time::Duration;

use crate::infrastructure::finnhub::BackoffConfig;

/// Default feed WebSocket endpoint.
const DEFAULT_FEED_URL: &str = "wss://ws.finnhub.io";

/// Default subscription topics: the general channel plus the index
/// heavyweights.
pub const DEFAULT_TOPICS: &[&str] = &[
    "general", "AAPL", "MSFT", "GOOGL", "AMZN", "TSLA", "NVDA", "META", "QQQ", "NQ=F",
];

/// Default relevance keywords.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "NASDAQ",
    "NQ=F",
    "QQQ",
    "tech sector",
    "rate hike",
    "Federal Reserve",
    "FOMC",
    "inflation",
    "interest rate",
    "recession",
    "CPI",
    "PPI",
    "unemployment",
    "Treasury yield",
    "AI bubble",
    "chip shortage",
    "semiconductor",
    "earnings",
    "Apple",
    "Tesla",
    "Microsoft",
    "Nvidia",
    "Amazon",
    "Meta",
    "Google",
    "Alphabet",
    "FAANG",
    "Big Tech",
    "SPAC",
    "IPO",
    "jobless claims",
];

/// Default body text for articles without a summary.
const DEFAULT_SUMMARY_PLACEHOLDER: &str = "No summary available.";

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    /// Environment variable has empty value.
    #[error("environment variable {0} cannot be empty")]
    EmptyValue(String),
}

/// Required credentials.
#[derive(Clone)]
pub struct Secrets {
    /// Finnhub API key.
    pub finnhub_api_key: String,
    /// Telegram bot token.
    pub telegram_bot_token: String,
    /// Telegram destination chat id.
    pub telegram_chat_id: String,
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("finnhub_api_key", &"[REDACTED]")
            .field("telegram_bot_token", &"[REDACTED]")
            .field("telegram_chat_id", &"[REDACTED]")
            .finish()
    }
}

/// Filtering settings.
#[derive(Debug, Clone)]
pub struct FilterSettings {
    /// Relevance keywords.
    pub keywords: Vec<String>,
    /// Body text substituted when an article has no summary.
    pub summary_placeholder: String,
    /// Dedupe cache capacity; 0 keeps every headline.
    pub dedupe_capacity: usize,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            keywords: DEFAULT_KEYWORDS.iter().map(ToString::to_string).collect(),
            summary_placeholder: DEFAULT_SUMMARY_PLACEHOLDER.to_string(),
            dedupe_capacity: 0,
        }
    }
}

/// Reconnection settings.
#[derive(Debug, Clone)]
pub struct ReconnectSettings {
    /// Delay before each reconnect attempt.
    pub delay_initial: Duration,
    /// Upper bound on the delay.
    pub delay_max: Duration,
    /// Growth factor per attempt (1.0 = fixed delay).
    pub multiplier: f64,
    /// Jitter fraction (0.0 = none).
    pub jitter_factor: f64,
    /// Attempt limit (0 = unlimited).
    pub max_attempts: u32,
}

impl Default for ReconnectSettings {
    fn default() -> Self {
        Self {
            delay_initial: Duration::from_secs(5),
            delay_max: Duration::from_secs(5),
            multiplier: 1.0,
            jitter_factor: 0.0,
            max_attempts: 0,
        }
    }
}

impl From<&ReconnectSettings> for BackoffConfig {
    fn from(settings: &ReconnectSettings) -> Self {
        Self {
            initial_delay: settings.delay_initial,
            max_delay: settings.delay_max.max(settings.delay_initial),
            multiplier: settings.multiplier.max(1.0),
            jitter_factor: settings.jitter_factor.clamp(0.0, 1.0),
            max_attempts: settings.max_attempts,
        }
    }
}

/// Complete alerter configuration.
#[derive(Debug, Clone)]
pub struct AlerterConfig {
    /// Required credentials.
    pub secrets: Secrets,
    /// Feed WebSocket endpoint (without the token parameter).
    pub feed_endpoint: String,
    /// Subscription topics, in subscribe order.
    pub topics: Vec<String>,
    /// Filtering settings.
    pub filter: FilterSettings,
    /// Reconnection settings.
    pub reconnect: ReconnectSettings,
}

impl AlerterConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any required secret is missing or
    /// empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        let secrets = Secrets {
            finnhub_api_key: require_env("FINNHUB_API_KEY")?,
            telegram_bot_token: require_env("TELEGRAM_BOT_TOKEN")?,
            telegram_chat_id: require_env("TELEGRAM_CHAT_ID")?,
        };

        let feed_endpoint = std::env::var("NEWS_ALERTER_FEED_URL")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_FEED_URL.to_string());

        let topics = parse_env_list("NEWS_ALERTER_SYMBOLS")
            .unwrap_or_else(|| DEFAULT_TOPICS.iter().map(ToString::to_string).collect());

        let filter_defaults = FilterSettings::default();
        let filter = FilterSettings {
            keywords: parse_env_list("NEWS_ALERTER_KEYWORDS")
                .unwrap_or(filter_defaults.keywords),
            summary_placeholder: std::env::var("NEWS_ALERTER_SUMMARY_PLACEHOLDER")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(filter_defaults.summary_placeholder),
            dedupe_capacity: parse_env_usize(
                "NEWS_ALERTER_DEDUPE_CAPACITY",
                filter_defaults.dedupe_capacity,
            ),
        };

        let reconnect_defaults = ReconnectSettings::default();
        let reconnect = ReconnectSettings {
            delay_initial: parse_env_duration_secs(
                "NEWS_ALERTER_RECONNECT_DELAY_SECS",
                reconnect_defaults.delay_initial,
            ),
            delay_max: parse_env_duration_secs(
                "NEWS_ALERTER_RECONNECT_DELAY_MAX_SECS",
                reconnect_defaults.delay_max,
            ),
            multiplier: parse_env_f64(
                "NEWS_ALERTER_RECONNECT_MULTIPLIER",
                reconnect_defaults.multiplier,
            ),
            jitter_factor: parse_env_f64(
                "NEWS_ALERTER_RECONNECT_JITTER",
                reconnect_defaults.jitter_factor,
            ),
            max_attempts: parse_env_u32(
                "NEWS_ALERTER_MAX_RECONNECT_ATTEMPTS",
                reconnect_defaults.max_attempts,
            ),
        };

        Ok(Self {
            secrets,
            feed_endpoint,
            topics,
            filter,
            reconnect,
        })
    }

    /// Feed URL with the auth token as a query parameter.
    #[must_use]
    pub fn feed_url(&self) -> String {
        format!(
            "{}/?token={}",
            self.feed_endpoint, self.secrets.finnhub_api_key
        )
    }
}

fn require_env(key: &str) -> Result<String, ConfigError> {
    let value =
        std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))?;
    if value.is_empty() {
        return Err(ConfigError::EmptyValue(key.to_string()));
    }
    Ok(value)
}

/// Comma-separated list, entries trimmed, blanks dropped. `None` when
/// the variable is unset or contains no entries.
fn parse_env_list(key: &str) -> Option<Vec<String>> {
    let raw = std::env::var(key).ok()?;
    let entries: Vec<String> = raw
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if entries.is_empty() { None } else { Some(entries) }
}

fn parse_env_u32(key: &str, default: u32) -> u32 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn parse_env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn parse_env_f64(key: &str, default: f64) -> f64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn parse_env_duration_secs(key: &str, default: Duration) -> Duration {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map_or(default, Duration::from_secs)
}
