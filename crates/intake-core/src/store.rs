//! Authoritative store: the draft record and review queue, their persistence
//! wiring, and the external-sync path.
//!
//! The store is a per-context singleton with an explicit lifecycle: built at
//! application start from persisted state (or defaults), injected into the
//! service and bridge layers, and reset only on request. Every mutator runs
//! mutate → persist → notify as one synchronous sequence, so observers never
//! see a partially-applied change.

use std::cell::RefCell;
use std::rc::Rc;

use crate::model::{DraftPatch, IntakeDraft, ReviewItem, ReviewItemPatch, default_review_queue};
use crate::notify::{Notifier, Subscription};
use crate::storage::{
    self, DRAFT_STORAGE_KEY, REVIEW_STORAGE_KEY, StorageBackend, StorageChange,
};

pub struct IntakeStore {
    backend: Rc<dyn StorageBackend>,
    draft: RefCell<IntakeDraft>,
    reviews: RefCell<Vec<ReviewItem>>,
    draft_notifier: Notifier<IntakeDraft>,
    review_notifier: Notifier<Vec<ReviewItem>>,
}

impl IntakeStore {
    /// Load both stores from `backend`, seeding persistence where absent.
    ///
    /// An empty persisted queue is replaced by the default seed so the
    /// dashboard never starts blank; a malformed snapshot falls back the
    /// same way.
    #[must_use]
    pub fn new(backend: Rc<dyn StorageBackend>) -> Rc<Self> {
        let draft_absent = backend.get(DRAFT_STORAGE_KEY).is_none();
        let draft =
            storage::load_or_default(backend.as_ref(), DRAFT_STORAGE_KEY, IntakeDraft::default());

        let mut seed_reviews = false;
        let reviews = match backend.get(REVIEW_STORAGE_KEY) {
            Some(raw) => storage::parse_or_default(&raw, default_review_queue()),
            None => {
                seed_reviews = true;
                default_review_queue()
            }
        };
        let reviews = if reviews.is_empty() {
            seed_reviews = true;
            default_review_queue()
        } else {
            reviews
        };

        let store = Rc::new(Self {
            backend,
            draft: RefCell::new(draft),
            reviews: RefCell::new(reviews),
            draft_notifier: Notifier::new(),
            review_notifier: Notifier::new(),
        });
        if draft_absent {
            store.persist_draft();
        }
        if seed_reviews {
            store.persist_reviews();
        }
        store
    }

    /// Copy of the current draft.
    #[must_use]
    pub fn draft(&self) -> IntakeDraft {
        self.draft.borrow().clone()
    }

    /// Copy of the current review queue.
    #[must_use]
    pub fn review_queue(&self) -> Vec<ReviewItem> {
        self.reviews.borrow().clone()
    }

    /// Register for draft snapshot broadcasts.
    pub fn subscribe_draft(&self, callback: impl Fn(IntakeDraft) + 'static) -> Subscription {
        self.draft_notifier.subscribe(callback)
    }

    /// Register for review-queue snapshot broadcasts.
    pub fn subscribe_review_queue(
        &self,
        callback: impl Fn(Vec<ReviewItem>) + 'static,
    ) -> Subscription {
        self.review_notifier.subscribe(callback)
    }

    /// Wire this store to the backend's cross-context change notifications.
    ///
    /// The listener holds a weak handle, so dropping the store detaches it;
    /// the backend never keeps the store alive.
    pub fn attach_external_sync(self: &Rc<Self>) {
        let store = Rc::downgrade(self);
        self.backend.subscribe_changes(Rc::new(move |change| {
            if let Some(store) = store.upgrade() {
                store.apply_external_change(change);
            }
        }));
    }

    /// Apply a change written by another context: parse (with fallback),
    /// replace the in-memory primitive, and broadcast. The value is not
    /// re-persisted — the storage area already holds it.
    pub fn apply_external_change(&self, change: &StorageChange) {
        let Some(raw) = change.new_value.as_deref() else {
            return;
        };
        match change.key.as_str() {
            DRAFT_STORAGE_KEY => {
                let incoming = storage::parse_or_default(raw, IntakeDraft::default());
                *self.draft.borrow_mut() = incoming;
                tracing::debug!(key = DRAFT_STORAGE_KEY, "applied external draft change");
                self.draft_notifier.notify(&self.draft());
            }
            REVIEW_STORAGE_KEY => {
                let incoming = storage::parse_or_default(raw, default_review_queue());
                *self.reviews.borrow_mut() = incoming;
                tracing::debug!(key = REVIEW_STORAGE_KEY, "applied external review change");
                self.review_notifier.notify(&self.review_queue());
            }
            _ => {}
        }
    }

    pub(crate) fn merge_draft(&self, patch: &DraftPatch) -> IntakeDraft {
        patch.apply_to(&mut self.draft.borrow_mut());
        self.persist_draft();
        let snapshot = self.draft();
        tracing::debug!("draft merged");
        self.draft_notifier.notify(&snapshot);
        snapshot
    }

    pub(crate) fn reset_draft(&self) -> IntakeDraft {
        *self.draft.borrow_mut() = IntakeDraft::default();
        self.persist_draft();
        let snapshot = self.draft();
        tracing::debug!("draft reset to defaults");
        self.draft_notifier.notify(&snapshot);
        snapshot
    }

    /// Upsert by id: an existing entry is overwritten in place (position
    /// preserved); a new entry is prepended, newest first.
    pub(crate) fn upsert_review(&self, item: ReviewItem) -> Vec<ReviewItem> {
        {
            let mut reviews = self.reviews.borrow_mut();
            if let Some(existing) = reviews.iter_mut().find(|entry| entry.id == item.id) {
                *existing = item;
            } else {
                reviews.insert(0, item);
            }
        }
        self.persist_reviews();
        let snapshot = self.review_queue();
        self.review_notifier.notify(&snapshot);
        snapshot
    }

    /// Merge `patch` into the entry with `id`. An unknown id is a no-op on
    /// the queue, but the commit still persists and broadcasts.
    pub(crate) fn update_review(&self, id: &str, patch: &ReviewItemPatch) -> Vec<ReviewItem> {
        {
            let mut reviews = self.reviews.borrow_mut();
            if let Some(entry) = reviews.iter_mut().find(|entry| entry.id == id) {
                patch.apply_to(entry);
            }
        }
        self.persist_reviews();
        let snapshot = self.review_queue();
        self.review_notifier.notify(&snapshot);
        snapshot
    }

    fn persist_draft(&self) {
        storage::persist(self.backend.as_ref(), DRAFT_STORAGE_KEY, &*self.draft.borrow());
    }

    fn persist_reviews(&self) {
        storage::persist(
            self.backend.as_ref(),
            REVIEW_STORAGE_KEY,
            &*self.reviews.borrow(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ReviewStage;
    use crate::storage::MemoryStorage;

    fn memory_store() -> (Rc<MemoryStorage>, Rc<IntakeStore>) {
        let backend = Rc::new(MemoryStorage::new());
        let store = IntakeStore::new(Rc::clone(&backend) as Rc<dyn StorageBackend>);
        (backend, store)
    }

    #[test]
    fn fresh_store_seeds_persistence() {
        let (backend, store) = memory_store();
        assert_eq!(store.draft(), IntakeDraft::default());
        assert_eq!(store.review_queue(), default_review_queue());
        assert!(backend.get(DRAFT_STORAGE_KEY).is_some());
        assert!(backend.get(REVIEW_STORAGE_KEY).is_some());
    }

    #[test]
    fn persisted_state_survives_restart() {
        let backend = Rc::new(MemoryStorage::new());
        {
            let store = IntakeStore::new(Rc::clone(&backend) as Rc<dyn StorageBackend>);
            store.merge_draft(&DraftPatch {
                client_name: Some("Avery Estate".to_string()),
                ..DraftPatch::default()
            });
            store.upsert_review(ReviewItem::new(
                "nakamura",
                "Guardianship filing for Nakamura",
                ReviewStage::Ingestion,
                "Docs uploading",
                "Paralegal pool",
            ));
        }
        let store = IntakeStore::new(Rc::clone(&backend) as Rc<dyn StorageBackend>);
        assert_eq!(store.draft().client_name, "Avery Estate");
        assert_eq!(store.review_queue()[0].id, "nakamura");
    }

    #[test]
    fn empty_persisted_queue_is_reseeded() {
        let backend = Rc::new(MemoryStorage::new());
        backend.set(REVIEW_STORAGE_KEY, "[]").expect("memory write");
        let store = IntakeStore::new(Rc::clone(&backend) as Rc<dyn StorageBackend>);
        assert_eq!(store.review_queue(), default_review_queue());
        assert_ne!(backend.get(REVIEW_STORAGE_KEY).as_deref(), Some("[]"));
    }

    #[test]
    fn malformed_persisted_draft_falls_back_to_default() {
        let backend = Rc::new(MemoryStorage::new());
        backend
            .set(DRAFT_STORAGE_KEY, "{broken")
            .expect("memory write");
        let store = IntakeStore::new(backend as Rc<dyn StorageBackend>);
        assert_eq!(store.draft(), IntakeDraft::default());
    }

    #[test]
    fn external_draft_change_replaces_and_broadcasts() {
        let (_backend, store) = memory_store();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let _sub = store.subscribe_draft({
            let seen = Rc::clone(&seen);
            move |draft| seen.borrow_mut().push(draft)
        });

        store.apply_external_change(&StorageChange {
            key: DRAFT_STORAGE_KEY.to_string(),
            new_value: Some(r#"{"clientName":"Birch Trust"}"#.to_string()),
        });

        assert_eq!(store.draft().client_name, "Birch Trust");
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(seen.borrow()[0].client_name, "Birch Trust");
    }

    #[test]
    fn external_change_for_untracked_key_is_ignored() {
        let (_backend, store) = memory_store();
        let before = store.draft();
        store.apply_external_change(&StorageChange {
            key: "hnc:intake:unrelated".to_string(),
            new_value: Some("{}".to_string()),
        });
        assert_eq!(store.draft(), before);
    }

    #[test]
    fn external_removal_is_ignored() {
        let (_backend, store) = memory_store();
        store.merge_draft(&DraftPatch {
            client_name: Some("Avery Estate".to_string()),
            ..DraftPatch::default()
        });
        store.apply_external_change(&StorageChange {
            key: DRAFT_STORAGE_KEY.to_string(),
            new_value: None,
        });
        assert_eq!(store.draft().client_name, "Avery Estate");
    }

    #[test]
    fn broadcast_fan_out_hits_every_subscriber_once() {
        let (_backend, store) = memory_store();
        let count = Rc::new(RefCell::new(0));
        let subs: Vec<_> = (0..4)
            .map(|_| {
                let count = Rc::clone(&count);
                store.subscribe_draft(move |_| *count.borrow_mut() += 1)
            })
            .collect();

        store.merge_draft(&DraftPatch::default());
        assert_eq!(*count.borrow(), 4);
        drop(subs);
    }
}
