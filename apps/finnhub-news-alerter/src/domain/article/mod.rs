//! Article Types
//!
//! Canonical internal representation of a news article, independent of
//! any feed's wire format. The headline is the article's identity for
//! deduplication purposes: exact string, case-sensitive, post-trim.

use chrono::{DateTime, Utc};

/// A single news article.
///
/// Immutable once parsed. Two articles with the same headline are the
/// same article as far as deduplication is concerned, regardless of
/// summary, URL, or publication time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    /// Headline text; the deduplication identity key.
    pub headline: String,
    /// Article summary, if the feed provided one.
    pub summary: Option<String>,
    /// Link to the full story.
    pub url: String,
    /// Publication time reported by the feed.
    pub published_at: Option<DateTime<Utc>>,
}

impl Article {
    /// Create an article from raw field values.
    #[must_use]
    pub fn new(
        headline: impl Into<String>,
        summary: Option<String>,
        url: impl Into<String>,
        published_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            headline: headline.into(),
            summary,
            url: url.into(),
            published_at,
        }
    }

    /// Normalize whitespace on headline and summary.
    ///
    /// Trims both fields; a summary that is empty or whitespace-only
    /// collapses to `None` so downstream formatting can substitute a
    /// placeholder.
    #[must_use]
    pub fn normalized(self) -> Self {
        let summary = self
            .summary
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Self {
            headline: self.headline.trim().to_string(),
            summary,
            url: self.url,
            published_at: self.published_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_trims_headline_and_summary() {
        let article = Article::new(
            "  Fed hints at rate hike \n",
            Some("  markets react  ".to_string()),
            "http://x",
            None,
        )
        .normalized();

        assert_eq!(article.headline, "Fed hints at rate hike");
        assert_eq!(article.summary.as_deref(), Some("markets react"));
    }

    #[test]
    fn normalized_collapses_blank_summary_to_none() {
        let article =
            Article::new("Headline", Some("   ".to_string()), "http://x", None).normalized();
        assert!(article.summary.is_none());
    }

    #[test]
    fn normalized_keeps_missing_summary_missing() {
        let article = Article::new("Headline", None, "http://x", None).normalized();
        assert!(article.summary.is_none());
    }

    #[test]
    fn normalized_preserves_url_and_timestamp() {
        let article = Article::new("Headline", None, "http://x", None).normalized();
        assert_eq!(article.url, "http://x");
        assert!(article.published_at.is_none());
    }
}
