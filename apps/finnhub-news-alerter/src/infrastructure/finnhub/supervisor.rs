//! Feed Supervisor
//!
//! Owns the feed session lifecycle. Sessions never restart themselves;
//! they run to termination and the supervisor decides what happens
//! next: sleep out the backoff delay and dial again, forever by
//! default. A session that reached the receive loop resets the backoff
//! so a long-lived connection that drops is retried promptly.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::application::services::IngestionPipeline;

use super::reconnect::{BackoffConfig, BackoffPolicy};
use super::session::FeedSession;

/// Errors ending supervision.
#[derive(Debug, thiserror::Error)]
pub enum SupervisorError {
    /// The configured attempt limit was exhausted.
    #[error("reconnect attempts exhausted after {0} tries")]
    RetriesExhausted(u32),
}

/// Keeps the feed connected across transient failures.
pub struct FeedSupervisor {
    url: String,
    token: String,
    topics: Vec<String>,
    backoff: BackoffConfig,
    pipeline: Arc<IngestionPipeline>,
    cancel: CancellationToken,
}

impl FeedSupervisor {
    /// Create a supervisor for the given feed endpoint.
    #[must_use]
    pub fn new(
        url: String,
        token: impl Into<String>,
        topics: Vec<String>,
        backoff: BackoffConfig,
        pipeline: Arc<IngestionPipeline>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            url,
            token: token.into(),
            topics,
            backoff,
            pipeline,
            cancel,
        }
    }

    /// Run sessions until cancelled.
    ///
    /// Each iteration runs one session to termination, then sleeps the
    /// policy's next delay before dialing again. With the default
    /// unlimited attempt budget this method only returns on
    /// cancellation.
    ///
    /// # Errors
    ///
    /// Returns [`SupervisorError::RetriesExhausted`] when a configured
    /// attempt limit runs out.
    pub async fn run(&self) -> Result<(), SupervisorError> {
        let mut policy = BackoffPolicy::new(self.backoff.clone());

        loop {
            if self.cancel.is_cancelled() {
                return Ok(());
            }

            let mut session = FeedSession::new(
                self.url.clone(),
                self.token.clone(),
                self.topics.clone(),
                Arc::clone(&self.pipeline),
                self.cancel.clone(),
            );

            match session.run().await {
                Ok(()) => {
                    // Only cancellation ends a session cleanly.
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Feed session ended");

                    if session.reached_streaming() {
                        policy.reset();
                    }

                    let Some(delay) = policy.next_delay() else {
                        return Err(SupervisorError::RetriesExhausted(policy.attempt_count()));
                    };

                    tracing::info!(
                        attempt = policy.attempt_count(),
                        delay_ms = delay.as_millis(),
                        "Reconnecting to news feed"
                    );

                    tokio::select! {
                        () = self.cancel.cancelled() => {
                            tracing::info!("Supervisor cancelled during backoff");
                            return Ok(());
                        }
                        () = tokio::time::sleep(delay) => {}
                    }
                }
            }
        }
    }
}
