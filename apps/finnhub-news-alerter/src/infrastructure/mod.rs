//! Infrastructure Layer
//!
//! Adapters and external integrations.

/// Configuration loaded from the environment.
pub mod config;

/// Finnhub streaming feed client.
pub mod finnhub;

/// Telegram Bot API notifier adapter.
pub mod telegram;

/// Tracing initialization.
pub mod telemetry;
