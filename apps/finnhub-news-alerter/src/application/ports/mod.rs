//! Port Interfaces
//!
//! Contracts that infrastructure adapters must implement, following the
//! Hexagonal Architecture pattern.
//!
//! ## Driven Ports (Outbound)
//!
//! - [`Notifier`]: alert delivery to the notification channel

use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by a notification sink.
///
/// Delivery failures are always recoverable from the pipeline's point
/// of view: the alert is logged and dropped, never retried.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Transport-level failure reaching the sink.
    #[error("notification transport failed: {0}")]
    Transport(String),

    /// The sink accepted the request but rejected the message.
    #[error("notification rejected ({status}): {message}")]
    Rejected {
        /// HTTP status (or sink-specific code) of the rejection.
        status: u16,
        /// Description reported by the sink.
        message: String,
    },
}

/// Outbound alert-delivery port.
///
/// Implementations format and deliver one alert per call. Callers own
/// the failure policy; implementations must not retry internally.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one alert with a title, body text, and article link.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError`] if the sink could not be reached or
    /// rejected the message.
    async fn send(&self, title: &str, body: &str, link: &str) -> Result<(), DeliveryError>;
}
