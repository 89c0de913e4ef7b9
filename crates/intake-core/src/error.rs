//! Typed failures surfaced by the async API.

/// Failure reported by an [`IntakeService`](crate::service::IntakeService)
/// operation.
///
/// The mock transport never fails on its own: `Unavailable` is only raised
/// through [`inject_fault`](crate::service::IntakeService::inject_fault).
/// `NotFound` and `Conflict` are reserved for a real backend, which must
/// surface them so the cache bridge can roll back optimistic state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ServiceError {
    #[error("intake service unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("no review item with id '{id}'")]
    NotFound { id: String },

    #[error("conflicting write for review item '{id}'")]
    Conflict { id: String },
}

impl ServiceError {
    /// Shorthand for the injected-fault variant.
    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }
}
