//! Keyword Relevance Matching
//!
//! Decides whether an article is worth alerting on. Matching is
//! intentionally permissive: plain case-insensitive substring search
//! over the combined headline and summary, no tokenization, no word
//! boundaries. Recall is preferred over precision; a false positive
//! costs one extra alert, a false negative loses the story.

use crate::domain::article::Article;

/// A fixed set of case-insensitive keywords.
///
/// Keywords are lowercased once at construction; empty entries are
/// discarded (an empty substring would match every article).
#[derive(Debug, Clone)]
pub struct KeywordSet {
    keywords: Vec<String>,
}

impl KeywordSet {
    /// Build a keyword set, lowercasing and dropping blank entries.
    #[must_use]
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.into().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();

        Self { keywords }
    }

    /// Number of keywords in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    /// Whether the set contains no keywords.
    ///
    /// An empty set matches nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Check whether any keyword occurs in the article's combined
    /// headline and summary text.
    ///
    /// Pure and deterministic; a missing summary is treated as the
    /// empty string.
    #[must_use]
    pub fn matches(&self, article: &Article) -> bool {
        let combined = format!(
            "{} {}",
            article.headline,
            article.summary.as_deref().unwrap_or_default()
        )
        .to_lowercase();

        self.keywords.iter().any(|k| combined.contains(k.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn article(headline: &str, summary: Option<&str>) -> Article {
        Article::new(headline, summary.map(String::from), "http://x", None)
    }

    #[test]
    fn matches_is_case_insensitive() {
        let keywords = KeywordSet::new(["apple"]);
        assert!(keywords.matches(&article("APPLE surges", None)));
    }

    #[test]
    fn matches_keyword_in_summary() {
        let keywords = KeywordSet::new(["rate hike"]);
        assert!(keywords.matches(&article("Fed speaks", Some("A rate hike is coming"))));
    }

    #[test]
    fn matches_substring_without_word_boundary() {
        // Permissive by design: "earnings" matches inside "Q3earnings".
        let keywords = KeywordSet::new(["earnings"]);
        assert!(keywords.matches(&article("Q3earnings beat", None)));
    }

    #[test]
    fn no_match_when_keyword_absent() {
        let keywords = KeywordSet::new(["NASDAQ", "inflation"]);
        assert!(!keywords.matches(&article("Local bakery opens", Some("fresh bread"))));
    }

    #[test]
    fn missing_summary_treated_as_empty() {
        let keywords = KeywordSet::new(["inflation"]);
        assert!(!keywords.matches(&article("Quiet day on the markets", None)));
    }

    #[test]
    fn empty_set_matches_nothing() {
        let keywords = KeywordSet::new(Vec::<String>::new());
        assert!(keywords.is_empty());
        assert!(!keywords.matches(&article("anything at all", None)));
    }

    #[test]
    fn blank_keywords_are_dropped() {
        let keywords = KeywordSet::new(["", "  ", "tech"]);
        assert_eq!(keywords.len(), 1);
        assert!(!keywords.matches(&article("unrelated headline", None)));
        assert!(keywords.matches(&article("Big Tech rally", None)));
    }

    proptest! {
        #[test]
        fn any_ascii_casing_of_a_keyword_matches(word in "[a-zA-Z]{3,12}") {
            let keywords = KeywordSet::new([word.to_lowercase()]);
            let headline = format!("Breaking: {}", word.to_uppercase());
            prop_assert!(keywords.matches(&article(&headline, None)));
        }
    }
}
