//! Store primitive types: the intake draft record and the review queue.
//!
//! Serde attribute choices here pin the persisted JSON layout to the shapes
//! written under `hnc:intake:draft` and `hnc:intake:reviews` (camelCase field
//! names, kebab-case stage keys), so snapshots written by any context parse
//! in every other context.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Workflow stage for a review-queue item (the enumerated status key).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReviewStage {
    AwaitingReview,
    AiReady,
    Ingestion,
    Workspace,
    Completed,
}

impl ReviewStage {
    /// Every stage, in workflow order.
    pub const ALL: [Self; 5] = [
        Self::AwaitingReview,
        Self::AiReady,
        Self::Ingestion,
        Self::Workspace,
        Self::Completed,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AwaitingReview => "awaiting-review",
            Self::AiReady => "ai-ready",
            Self::Ingestion => "ingestion",
            Self::Workspace => "workspace",
            Self::Completed => "completed",
        }
    }

    /// Human-facing display label for this stage.
    ///
    /// The mapping is fixed and round-trips with [`Self::from_label`].
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::AwaitingReview => "Awaiting legal review",
            Self::AiReady => "AI draft ready",
            Self::Ingestion => "Data ingestion running",
            Self::Workspace => "Workspace queued",
            Self::Completed => "Completed",
        }
    }

    /// Reverse lookup from a display label.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|stage| stage.label() == label)
    }
}

impl Default for ReviewStage {
    fn default() -> Self {
        Self::AwaitingReview
    }
}

impl fmt::Display for ReviewStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a stage key from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid review stage: '{got}'")]
pub struct ParseStageError {
    pub got: String,
}

impl FromStr for ReviewStage {
    type Err = ParseStageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "awaiting-review" => Ok(Self::AwaitingReview),
            "ai-ready" => Ok(Self::AiReady),
            "ingestion" => Ok(Self::Ingestion),
            "workspace" => Ok(Self::Workspace),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseStageError { got: s.to_string() }),
        }
    }
}

/// The single in-progress intake record for the active session.
///
/// All fields are free-text strings and default to empty. Exactly one draft
/// exists per context; it is mutated by shallow merge ([`DraftPatch`]) and
/// fully replaced only on reset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IntakeDraft {
    pub client_name: String,
    pub representative: String,
    pub primary_goal: String,
    pub risk_flags: String,
    pub estate_value: String,
    pub property_count: String,
    pub trust_status: String,
    pub asset_notes: String,
    pub guardian_preference: String,
    pub succession_concerns: String,
    pub review_priority: String,
    pub follow_up_date: String,
}

/// Partial draft update: only `Some` fields overwrite the target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftPatch {
    pub client_name: Option<String>,
    pub representative: Option<String>,
    pub primary_goal: Option<String>,
    pub risk_flags: Option<String>,
    pub estate_value: Option<String>,
    pub property_count: Option<String>,
    pub trust_status: Option<String>,
    pub asset_notes: Option<String>,
    pub guardian_preference: Option<String>,
    pub succession_concerns: Option<String>,
    pub review_priority: Option<String>,
    pub follow_up_date: Option<String>,
}

impl DraftPatch {
    /// Shallow-merge this patch into `draft`, field by field.
    pub fn apply_to(&self, draft: &mut IntakeDraft) {
        let fields = [
            (&self.client_name, &mut draft.client_name),
            (&self.representative, &mut draft.representative),
            (&self.primary_goal, &mut draft.primary_goal),
            (&self.risk_flags, &mut draft.risk_flags),
            (&self.estate_value, &mut draft.estate_value),
            (&self.property_count, &mut draft.property_count),
            (&self.trust_status, &mut draft.trust_status),
            (&self.asset_notes, &mut draft.asset_notes),
            (&self.guardian_preference, &mut draft.guardian_preference),
            (&self.succession_concerns, &mut draft.succession_concerns),
            (&self.review_priority, &mut draft.review_priority),
            (&self.follow_up_date, &mut draft.follow_up_date),
        ];
        for (patch, target) in fields {
            if let Some(value) = patch {
                target.clone_from(value);
            }
        }
    }
}

/// One case awaiting legal-team action.
///
/// `status` is the display label and `status_key` the enumerated stage. The
/// store does not force the pair to correspond — callers that set both by
/// hand are trusted, which keeps compatibility with snapshots written by
/// older contexts. [`Self::new`] and [`Self::set_stage`] are the consistent
/// path: they derive the label from the stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReviewItem {
    pub id: String,
    pub title: String,
    pub status: String,
    pub status_key: ReviewStage,
    pub due: String,
    pub owner: String,
}

impl ReviewItem {
    /// Build an item with `status` derived from `stage`.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        stage: ReviewStage,
        due: impl Into<String>,
        owner: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            status: stage.label().to_string(),
            status_key: stage,
            due: due.into(),
            owner: owner.into(),
        }
    }

    /// Move the item to `stage`, keeping the label in step with the key.
    pub fn set_stage(&mut self, stage: ReviewStage) {
        self.status_key = stage;
        self.status = stage.label().to_string();
    }
}

/// Partial review-item update for the status-update operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewItemPatch {
    pub status: Option<String>,
    pub status_key: Option<ReviewStage>,
    pub due: Option<String>,
    pub owner: Option<String>,
}

impl ReviewItemPatch {
    /// Consistent stage change: sets both the key and its derived label.
    #[must_use]
    pub fn for_stage(stage: ReviewStage) -> Self {
        Self {
            status: Some(stage.label().to_string()),
            status_key: Some(stage),
            ..Self::default()
        }
    }

    /// Merge this patch into `item`; untouched fields keep their values.
    pub fn apply_to(&self, item: &mut ReviewItem) {
        if let Some(status) = &self.status {
            item.status.clone_from(status);
        }
        if let Some(stage) = self.status_key {
            item.status_key = stage;
        }
        if let Some(due) = &self.due {
            item.due.clone_from(due);
        }
        if let Some(owner) = &self.owner {
            item.owner.clone_from(owner);
        }
    }
}

/// The seed queue shown when no persisted queue exists (or the persisted
/// queue is an empty array), so the dashboard never starts blank.
#[must_use]
pub fn default_review_queue() -> Vec<ReviewItem> {
    vec![
        ReviewItem::new(
            "caldwell",
            "Estate transfer for Caldwell family",
            ReviewStage::AwaitingReview,
            "Due in 2 days",
            "Assign to Mathew",
        ),
        ReviewItem::new(
            "patel",
            "Trust restructuring for Patel household",
            ReviewStage::AiReady,
            "Initial pass complete",
            "Route to senior partner",
        ),
        ReviewItem::new(
            "succession",
            "Succession plan audit",
            ReviewStage::Ingestion,
            "Synced 68% of archives",
            "Monitor vector index build",
        ),
    ]
}
