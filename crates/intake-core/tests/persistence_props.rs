//! Property tests for the persistence bridge: any well-formed draft or
//! queue survives a persist/load cycle, and merges touch only the patched
//! fields.

use proptest::option;
use proptest::prelude::*;

use intake_core::storage::{self, DRAFT_STORAGE_KEY, MemoryStorage, REVIEW_STORAGE_KEY};
use intake_core::{DraftPatch, IntakeDraft, ReviewItem, ReviewStage};

fn arb_field() -> impl Strategy<Value = String> {
    // Free-text fields, including separators and quotes the JSON layer must
    // escape.
    "[ -~]{0,24}"
}

prop_compose! {
    fn arb_draft()(
        a in (arb_field(), arb_field(), arb_field(), arb_field(), arb_field(), arb_field()),
        b in (arb_field(), arb_field(), arb_field(), arb_field(), arb_field(), arb_field()),
    ) -> IntakeDraft {
        IntakeDraft {
            client_name: a.0,
            representative: a.1,
            primary_goal: a.2,
            risk_flags: a.3,
            estate_value: a.4,
            property_count: a.5,
            trust_status: b.0,
            asset_notes: b.1,
            guardian_preference: b.2,
            succession_concerns: b.3,
            review_priority: b.4,
            follow_up_date: b.5,
        }
    }
}

fn arb_stage() -> impl Strategy<Value = ReviewStage> {
    proptest::sample::select(ReviewStage::ALL.to_vec())
}

prop_compose! {
    fn arb_item()(
        id in "[a-z]{1,12}",
        title in arb_field(),
        stage in arb_stage(),
        due in arb_field(),
        owner in arb_field(),
    ) -> ReviewItem {
        ReviewItem::new(id, title, stage, due, owner)
    }
}

prop_compose! {
    fn arb_patch()(
        client_name in option::of(arb_field()),
        representative in option::of(arb_field()),
        primary_goal in option::of(arb_field()),
        follow_up_date in option::of(arb_field()),
    ) -> DraftPatch {
        DraftPatch {
            client_name,
            representative,
            primary_goal,
            follow_up_date,
            ..DraftPatch::default()
        }
    }
}

proptest! {
    #[test]
    fn draft_survives_persist_load_cycle(draft in arb_draft()) {
        let backend = MemoryStorage::new();
        storage::persist(&backend, DRAFT_STORAGE_KEY, &draft);
        let loaded = storage::load_or_default(&backend, DRAFT_STORAGE_KEY, IntakeDraft::default());
        prop_assert_eq!(loaded, draft);
    }

    #[test]
    fn queue_survives_persist_load_cycle(queue in proptest::collection::vec(arb_item(), 0..6)) {
        let backend = MemoryStorage::new();
        storage::persist(&backend, REVIEW_STORAGE_KEY, &queue);
        let loaded: Vec<ReviewItem> =
            storage::load_or_default(&backend, REVIEW_STORAGE_KEY, Vec::new());
        prop_assert_eq!(loaded, queue);
    }

    #[test]
    fn merge_touches_only_patched_fields(draft in arb_draft(), patch in arb_patch()) {
        let mut merged = draft.clone();
        patch.apply_to(&mut merged);

        let expect = |patched: &Option<String>, before: &str, after: &str| {
            match patched {
                Some(value) => value == after,
                None => before == after,
            }
        };
        prop_assert!(expect(&patch.client_name, &draft.client_name, &merged.client_name));
        prop_assert!(expect(&patch.representative, &draft.representative, &merged.representative));
        prop_assert!(expect(&patch.primary_goal, &draft.primary_goal, &merged.primary_goal));
        prop_assert!(expect(&patch.follow_up_date, &draft.follow_up_date, &merged.follow_up_date));
        // Fields the patch can never carry must be byte-identical.
        prop_assert_eq!(&merged.risk_flags, &draft.risk_flags);
        prop_assert_eq!(&merged.estate_value, &draft.estate_value);
        prop_assert_eq!(&merged.asset_notes, &draft.asset_notes);
        prop_assert_eq!(&merged.succession_concerns, &draft.succession_concerns);
    }

    #[test]
    fn malformed_raw_data_never_panics(raw in "[ -~]{0,64}") {
        let parsed = storage::parse_or_default(&raw, IntakeDraft::default());
        // Either it parsed as a draft or fell back; both are fine.
        let _ = parsed;
    }
}
