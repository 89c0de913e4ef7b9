//! The cache synchronization bridge.
//!
//! Mutation policy per operation:
//!
//! - **Optimistic** (draft save): snapshot-before, speculative apply,
//!   commit-or-rollback, then invalidate the read query so the next read
//!   reconciles with authoritative state.
//! - **Replace-on-success** (reset, queue add/update): cache untouched until
//!   the call resolves, then replaced wholesale with the result.
//!
//! Attachment also subscribes to both store notifiers and mirrors every
//! broadcast snapshot into the cache — including snapshots triggered by
//! other contexts through the storage change notification, which is what
//! makes cross-tab writes visible without a reload.

use std::rc::Rc;

use intake_core::{
    DraftPatch, IntakeDraft, IntakeService, ReviewItem, ReviewItemPatch, ServiceError,
    Subscription,
};

use crate::query::{QueryCache, QueryKey};

pub struct CacheBridge {
    service: Rc<IntakeService>,
    cache: Rc<QueryCache>,
    _subscriptions: [Subscription; 2],
}

impl CacheBridge {
    /// Wire the bridge at application start. Dropping the bridge detaches
    /// its subscriptions; the cache then goes stale-only.
    #[must_use]
    pub fn attach(service: Rc<IntakeService>, cache: Rc<QueryCache>) -> Self {
        let draft_mirror = service.subscribe_to_draft({
            let cache = Rc::clone(&cache);
            move |snapshot| cache.set_draft(snapshot)
        });
        let review_mirror = service.subscribe_to_review_queue({
            let cache = Rc::clone(&cache);
            move |snapshot| cache.set_review_queue(snapshot)
        });
        Self {
            service,
            cache,
            _subscriptions: [draft_mirror, review_mirror],
        }
    }

    #[must_use]
    pub fn cache(&self) -> &Rc<QueryCache> {
        &self.cache
    }

    /// Read-through draft query: a fresh cache hit is served directly,
    /// otherwise the service is fetched and the cache filled.
    ///
    /// # Errors
    ///
    /// Propagates the service failure; the cache is left untouched.
    pub async fn draft(&self) -> Result<IntakeDraft, ServiceError> {
        if let Some(draft) = self.cache.draft() {
            return Ok(draft);
        }
        let draft = self.service.fetch_draft().await?;
        self.cache.set_draft(draft.clone());
        Ok(draft)
    }

    /// Read-through review-queue query.
    ///
    /// # Errors
    ///
    /// Propagates the service failure; the cache is left untouched.
    pub async fn review_queue(&self) -> Result<Vec<ReviewItem>, ServiceError> {
        if let Some(queue) = self.cache.review_queue() {
            return Ok(queue);
        }
        let queue = self.service.fetch_review_queue().await?;
        self.cache.set_review_queue(queue.clone());
        Ok(queue)
    }

    /// Optimistic draft save.
    ///
    /// The cache speculatively reflects the patch while the call is in
    /// flight. On failure it is rolled back to the pre-mutation snapshot.
    /// On either outcome the draft query is invalidated, forcing the next
    /// read to reconcile with authoritative state.
    ///
    /// # Errors
    ///
    /// Propagates the service failure after rolling back.
    pub async fn save_draft(&self, patch: DraftPatch) -> Result<IntakeDraft, ServiceError> {
        let previous = self.cache.draft_any();
        if let Some(mut speculative) = previous.clone() {
            patch.apply_to(&mut speculative);
            self.cache.set_draft(speculative);
        }

        let result = self.service.save_draft(patch).await;
        if result.is_err() {
            tracing::debug!("draft save failed, rolling back optimistic cache");
            if let Some(previous) = previous {
                self.cache.set_draft(previous);
            }
        }
        self.cache.invalidate(QueryKey::Draft);
        result
    }

    /// Replace-on-success reset.
    ///
    /// # Errors
    ///
    /// Propagates the service failure; the cache is left untouched then.
    pub async fn reset_draft(&self) -> Result<IntakeDraft, ServiceError> {
        let draft = self.service.reset_draft().await?;
        self.cache.set_draft(draft.clone());
        Ok(draft)
    }

    /// Replace-on-success queue insert/upsert.
    ///
    /// # Errors
    ///
    /// Propagates the service failure; the cache is left untouched then.
    pub async fn add_review_item(&self, item: ReviewItem) -> Result<Vec<ReviewItem>, ServiceError> {
        let queue = self.service.add_review_queue_item(item).await?;
        self.cache.set_review_queue(queue.clone());
        Ok(queue)
    }

    /// Replace-on-success status update.
    ///
    /// # Errors
    ///
    /// Propagates the service failure; the cache is left untouched then.
    pub async fn update_review_status(
        &self,
        id: &str,
        patch: ReviewItemPatch,
    ) -> Result<Vec<ReviewItem>, ServiceError> {
        let queue = self.service.update_review_item_status(id, patch).await?;
        self.cache.set_review_queue(queue.clone());
        Ok(queue)
    }
}
