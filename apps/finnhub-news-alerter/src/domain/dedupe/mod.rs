//! Headline Deduplication
//!
//! Tracks which headlines have already produced an alert so the same
//! story is never forwarded twice. The default store grows for the
//! process lifetime; deployments that run for months can opt into a
//! capacity-bounded LRU store instead.
//!
//! Check-and-insert is atomic under a single mutex, so the
//! at-most-once-forward invariant holds even if callers process
//! messages from more than one task.

use std::collections::HashSet;
use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;

/// Backing store for seen headlines.
#[derive(Debug)]
enum SeenSet {
    /// Grows for the process lifetime (default).
    Unbounded(HashSet<String>),
    /// Evicts least-recently-inserted headlines past capacity.
    Bounded(LruCache<String, ()>),
}

impl SeenSet {
    fn contains(&self, headline: &str) -> bool {
        match self {
            Self::Unbounded(set) => set.contains(headline),
            Self::Bounded(cache) => cache.contains(headline),
        }
    }

    /// Insert the headline; returns true if it was not present before.
    fn insert(&mut self, headline: &str) -> bool {
        match self {
            Self::Unbounded(set) => set.insert(headline.to_string()),
            Self::Bounded(cache) => cache.put(headline.to_string(), ()).is_none(),
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::Unbounded(set) => set.len(),
            Self::Bounded(cache) => cache.len(),
        }
    }
}

/// Set of headlines that have already been forwarded.
///
/// The empty string is a valid, dedupe-able key like any other.
#[derive(Debug)]
pub struct DedupeCache {
    seen: Mutex<SeenSet>,
}

impl DedupeCache {
    /// Cache that remembers every headline for the process lifetime.
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            seen: Mutex::new(SeenSet::Unbounded(HashSet::new())),
        }
    }

    /// Cache bounded to `capacity` headlines with LRU eviction.
    #[must_use]
    pub fn bounded(capacity: NonZeroUsize) -> Self {
        Self {
            seen: Mutex::new(SeenSet::Bounded(LruCache::new(capacity))),
        }
    }

    /// Build from a configured capacity, where 0 means unbounded.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        NonZeroUsize::new(capacity).map_or_else(Self::unbounded, Self::bounded)
    }

    /// Membership check without recording.
    #[must_use]
    pub fn is_seen(&self, headline: &str) -> bool {
        self.seen.lock().contains(headline)
    }

    /// Atomic check-and-insert.
    ///
    /// Returns true and records the headline iff it was not already
    /// recorded; returns false with no state change otherwise.
    #[must_use]
    pub fn should_process(&self, headline: &str) -> bool {
        self.seen.lock().insert(headline)
    }

    /// Number of recorded headlines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.lock().len()
    }

    /// Whether no headline has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for DedupeCache {
    fn default() -> Self {
        Self::unbounded()
    }
}
