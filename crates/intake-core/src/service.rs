//! Mock async API: simulated-latency operations over the intake store.
//!
//! Each operation suspends for its configured latency, then runs the
//! store's atomic mutate → persist → notify sequence and returns a copy of
//! the result. The latency waits are the only suspension points, so two
//! in-flight operations against the same store may overlap their waits —
//! commits land in resume order (last resume wins), which the cache layer's
//! optimistic policy depends on. Requests are deliberately not serialized.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tokio::time::sleep;

use crate::error::ServiceError;
use crate::model::{DraftPatch, IntakeDraft, ReviewItem, ReviewItemPatch};
use crate::notify::Subscription;
use crate::store::IntakeStore;

/// Simulated network latency per operation. Defaults mirror the prototype
/// transport timings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyConfig {
    pub fetch_draft: Duration,
    pub save_draft: Duration,
    pub reset_draft: Duration,
    pub fetch_reviews: Duration,
    pub add_review: Duration,
    pub update_review: Duration,
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            fetch_draft: Duration::from_millis(250),
            save_draft: Duration::from_millis(150),
            reset_draft: Duration::from_millis(150),
            fetch_reviews: Duration::from_millis(200),
            add_review: Duration::from_millis(180),
            update_review: Duration::from_millis(150),
        }
    }
}

impl LatencyConfig {
    /// Zero-latency profile for tests that do not exercise timing.
    #[must_use]
    pub const fn instant() -> Self {
        Self {
            fetch_draft: Duration::ZERO,
            save_draft: Duration::ZERO,
            reset_draft: Duration::ZERO,
            fetch_reviews: Duration::ZERO,
            add_review: Duration::ZERO,
            update_review: Duration::ZERO,
        }
    }
}

/// The client-facing mock service.
///
/// Several services may share one store; their in-flight waits then overlap
/// like independent tabs talking to one backend.
pub struct IntakeService {
    store: Rc<IntakeStore>,
    latency: LatencyConfig,
    fault: RefCell<Option<ServiceError>>,
}

impl IntakeService {
    #[must_use]
    pub fn new(store: Rc<IntakeStore>) -> Self {
        Self::with_latency(store, LatencyConfig::default())
    }

    #[must_use]
    pub fn with_latency(store: Rc<IntakeStore>, latency: LatencyConfig) -> Self {
        Self {
            store,
            latency,
            fault: RefCell::new(None),
        }
    }

    #[must_use]
    pub fn store(&self) -> &Rc<IntakeStore> {
        &self.store
    }

    /// Queue a one-shot fault: the next operation waits out its latency and
    /// then fails with `error` instead of committing.
    pub fn inject_fault(&self, error: ServiceError) {
        *self.fault.borrow_mut() = Some(error);
    }

    fn take_fault(&self) -> Result<(), ServiceError> {
        match self.fault.borrow_mut().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Fetch a copy of the current draft.
    ///
    /// # Errors
    ///
    /// Fails only on an injected fault.
    pub async fn fetch_draft(&self) -> Result<IntakeDraft, ServiceError> {
        sleep(self.latency.fetch_draft).await;
        self.take_fault()?;
        Ok(self.store.draft())
    }

    /// Shallow-merge `patch` into the draft and return the updated copy.
    ///
    /// # Errors
    ///
    /// Fails only on an injected fault; nothing is committed then.
    pub async fn save_draft(&self, patch: DraftPatch) -> Result<IntakeDraft, ServiceError> {
        sleep(self.latency.save_draft).await;
        self.take_fault()?;
        tracing::debug!(op = "save_draft", "committing");
        Ok(self.store.merge_draft(&patch))
    }

    /// Restore the draft to its all-empty default and return that copy.
    ///
    /// # Errors
    ///
    /// Fails only on an injected fault; nothing is committed then.
    pub async fn reset_draft(&self) -> Result<IntakeDraft, ServiceError> {
        sleep(self.latency.reset_draft).await;
        self.take_fault()?;
        tracing::debug!(op = "reset_draft", "committing");
        Ok(self.store.reset_draft())
    }

    /// Fetch a copy of the review queue.
    ///
    /// # Errors
    ///
    /// Fails only on an injected fault.
    pub async fn fetch_review_queue(&self) -> Result<Vec<ReviewItem>, ServiceError> {
        sleep(self.latency.fetch_reviews).await;
        self.take_fault()?;
        Ok(self.store.review_queue())
    }

    /// Upsert `item` by id (prepend when new) and return the full queue.
    ///
    /// # Errors
    ///
    /// Fails only on an injected fault; nothing is committed then.
    pub async fn add_review_queue_item(
        &self,
        item: ReviewItem,
    ) -> Result<Vec<ReviewItem>, ServiceError> {
        sleep(self.latency.add_review).await;
        self.take_fault()?;
        tracing::debug!(op = "add_review_queue_item", id = %item.id, "committing");
        Ok(self.store.upsert_review(item))
    }

    /// Merge `patch` into the item with `id` and return the full queue.
    /// An unknown id leaves the queue unchanged (no entry added, no error).
    ///
    /// # Errors
    ///
    /// Fails only on an injected fault; nothing is committed then.
    pub async fn update_review_item_status(
        &self,
        id: &str,
        patch: ReviewItemPatch,
    ) -> Result<Vec<ReviewItem>, ServiceError> {
        sleep(self.latency.update_review).await;
        self.take_fault()?;
        tracing::debug!(op = "update_review_item_status", id, "committing");
        Ok(self.store.update_review(id, &patch))
    }

    /// Push notifications for the cache bridge. UI code consumes cached
    /// query state instead of subscribing here directly.
    pub fn subscribe_to_draft(&self, callback: impl Fn(IntakeDraft) + 'static) -> Subscription {
        self.store.subscribe_draft(callback)
    }

    /// Counterpart of [`Self::subscribe_to_draft`] for the review queue.
    pub fn subscribe_to_review_queue(
        &self,
        callback: impl Fn(Vec<ReviewItem>) + 'static,
    ) -> Subscription {
        self.store.subscribe_review_queue(callback)
    }
}
