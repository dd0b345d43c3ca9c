//! Application Services
//!
//! [`IngestionPipeline`] wires the domain filters between the feed and
//! the notification port: normalize, dedupe-gate, match, deliver.

use std::sync::Arc;

use crate::application::ports::Notifier;
use crate::domain::article::Article;
use crate::domain::dedupe::DedupeCache;
use crate::domain::relevance::KeywordSet;

/// Processes decoded articles into outbound alerts.
///
/// Articles flow through in arrival order, one at a time:
///
/// 1. normalize whitespace
/// 2. discard if the headline was already alerted (silent)
/// 3. discard if no keyword matches, without recording the headline;
///    a non-matching headline is re-evaluated on every occurrence
/// 4. atomically record the headline and deliver the alert
///
/// Recording happens through the cache's atomic check-and-insert on the
/// deliver branch, so a concurrent duplicate can never double-send.
/// Delivery failures are logged and swallowed.
pub struct IngestionPipeline {
    keywords: KeywordSet,
    dedupe: DedupeCache,
    notifier: Arc<dyn Notifier>,
    summary_placeholder: String,
}

impl IngestionPipeline {
    /// Create a pipeline over the given filters and sink.
    #[must_use]
    pub fn new(
        keywords: KeywordSet,
        dedupe: DedupeCache,
        notifier: Arc<dyn Notifier>,
        summary_placeholder: impl Into<String>,
    ) -> Self {
        Self {
            keywords,
            dedupe,
            notifier,
            summary_placeholder: summary_placeholder.into(),
        }
    }

    /// Handle one article from the feed.
    pub async fn handle(&self, article: Article) {
        let article = article.normalized();

        if self.dedupe.is_seen(&article.headline) {
            return;
        }

        if !self.keywords.matches(&article) {
            tracing::trace!(headline = %article.headline, "No keyword match");
            return;
        }

        if !self.dedupe.should_process(&article.headline) {
            // A concurrent duplicate won the insert.
            return;
        }

        let body = article
            .summary
            .as_deref()
            .unwrap_or(&self.summary_placeholder);

        match self
            .notifier
            .send(&article.headline, body, &article.url)
            .await
        {
            Ok(()) => {
                tracing::info!(headline = %article.headline, "Alert sent");
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    headline = %article.headline,
                    "Alert delivery failed; dropping"
                );
            }
        }
    }

    /// Number of headlines recorded as alerted.
    #[must_use]
    pub fn seen_count(&self) -> usize {
        self.dedupe.len()
    }
}
