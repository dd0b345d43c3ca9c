#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Finnhub News Alerter - Market News Filter & Notifier
//!
//! Maintains a single persistent WebSocket connection to Finnhub's
//! streaming news feed, filters each incoming article against a
//! keyword set, deduplicates headlines, and pushes matching alerts to
//! a Telegram chat.
//!
//! # Layers (inside → outside)
//!
//! - **Domain**: pure filtering logic
//!   - `article`: article type and normalization
//!   - `relevance`: keyword matching
//!   - `dedupe`: seen-headline tracking
//!
//! - **Application**: use cases and port definitions
//!   - `ports`: the Notifier delivery contract
//!   - `services`: the ingestion pipeline
//!
//! - **Infrastructure**: adapters and external integrations
//!   - `finnhub`: WebSocket session, reconnect policy, supervision
//!   - `telegram`: Bot API notifier adapter
//!   - `config`: environment-sourced settings
//!   - `telemetry`: tracing setup
//!
//! # Data Flow
//!
//! ```text
//! Finnhub WS ──► FeedSession ──► IngestionPipeline ──► TelegramNotifier
//!                    ▲           (match + dedupe)
//!                    │
//!             FeedSupervisor (reconnect forever)
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Module Declarations
// =============================================================================

/// Domain layer - pure filtering logic with no external dependencies.
pub mod domain;

/// Application layer - use cases and port definitions.
pub mod application;

/// Infrastructure layer - adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Re-exports
// =============================================================================

// Domain types
pub use domain::article::Article;
pub use domain::dedupe::DedupeCache;
pub use domain::relevance::KeywordSet;

// Application
pub use application::ports::{DeliveryError, Notifier};
pub use application::services::IngestionPipeline;

// Infrastructure config
pub use infrastructure::config::{
    AlerterConfig, ConfigError, FilterSettings, ReconnectSettings, Secrets, DEFAULT_KEYWORDS,
    DEFAULT_TOPICS,
};

// Feed client
pub use infrastructure::finnhub::{
    BackoffConfig, BackoffPolicy, CodecError, ConnectionState, FeedMessage, FeedSession,
    FeedSupervisor, JsonCodec, SessionError, SessionMachine, SupervisorError, WireArticle,
};

// Telegram adapter
pub use infrastructure::telegram::TelegramNotifier;

// Telemetry
pub use infrastructure::telemetry::init as init_telemetry;
