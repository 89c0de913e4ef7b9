//! The UI-facing query cache: one entry per logical query, converged to the
//! authoritative store's latest broadcast snapshot by the bridge.

use std::cell::RefCell;

use intake_core::{IntakeDraft, ReviewItem};

/// Logical query identity for cached reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Draft,
    ReviewQueue,
}

/// One cached query result: the last known value plus a staleness flag.
/// Invalidation keeps the value (UI can keep rendering it) but forces the
/// next read-through to refetch.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry<T> {
    value: Option<T>,
    stale: bool,
}

impl<T> Default for Entry<T> {
    fn default() -> Self {
        Self {
            value: None,
            stale: true,
        }
    }
}

impl<T: Clone> Entry<T> {
    fn fresh(&self) -> Option<T> {
        if self.stale { None } else { self.value.clone() }
    }

    fn set(&mut self, value: T) {
        self.value = Some(value);
        self.stale = false;
    }
}

/// Cache of the two intake queries. Owned by the UI layer; mutated only by
/// the [`CacheBridge`](crate::CacheBridge).
#[derive(Debug, Default)]
pub struct QueryCache {
    draft: RefCell<Entry<IntakeDraft>>,
    reviews: RefCell<Entry<Vec<ReviewItem>>>,
}

impl QueryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh cached draft, if any.
    #[must_use]
    pub fn draft(&self) -> Option<IntakeDraft> {
        self.draft.borrow().fresh()
    }

    /// Last known draft, fresh or stale.
    #[must_use]
    pub fn draft_any(&self) -> Option<IntakeDraft> {
        self.draft.borrow().value.clone()
    }

    /// Fresh cached queue, if any.
    #[must_use]
    pub fn review_queue(&self) -> Option<Vec<ReviewItem>> {
        self.reviews.borrow().fresh()
    }

    /// Last known queue, fresh or stale.
    #[must_use]
    pub fn review_queue_any(&self) -> Option<Vec<ReviewItem>> {
        self.reviews.borrow().value.clone()
    }

    pub fn set_draft(&self, draft: IntakeDraft) {
        self.draft.borrow_mut().set(draft);
    }

    pub fn set_review_queue(&self, queue: Vec<ReviewItem>) {
        self.reviews.borrow_mut().set(queue);
    }

    /// Mark a query stale so the next read-through refetches.
    pub fn invalidate(&self, key: QueryKey) {
        match key {
            QueryKey::Draft => self.draft.borrow_mut().stale = true,
            QueryKey::ReviewQueue => self.reviews.borrow_mut().stale = true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cache_serves_nothing() {
        let cache = QueryCache::new();
        assert_eq!(cache.draft(), None);
        assert_eq!(cache.review_queue(), None);
    }

    #[test]
    fn invalidation_keeps_the_value_but_hides_it_from_fresh_reads() {
        let cache = QueryCache::new();
        let draft = IntakeDraft {
            client_name: "Avery Estate".to_string(),
            ..IntakeDraft::default()
        };
        cache.set_draft(draft.clone());
        assert_eq!(cache.draft(), Some(draft.clone()));

        cache.invalidate(QueryKey::Draft);
        assert_eq!(cache.draft(), None);
        assert_eq!(cache.draft_any(), Some(draft));
    }

    #[test]
    fn setting_again_clears_staleness() {
        let cache = QueryCache::new();
        cache.set_review_queue(Vec::new());
        cache.invalidate(QueryKey::ReviewQueue);
        cache.set_review_queue(Vec::new());
        assert_eq!(cache.review_queue(), Some(Vec::new()));
    }
}
