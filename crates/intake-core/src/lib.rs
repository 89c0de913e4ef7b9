//! Client-side data layer for the HNC legal-intake prototype.
//!
//! This crate is the synchronization core behind the intake wizard and the
//! review-queue dashboard: a per-context authoritative store with pub/sub
//! broadcast, a best-effort key-value persistence bridge (including
//! cross-context change delivery), and a mock async API that simulates
//! network latency over it. The UI-facing query cache lives in the
//! `intake-cache` crate and talks to this one through [`IntakeService`].
//!
//! Everything here is single-threaded-cooperative: the only suspension
//! points are the service's latency waits, and each committed mutation runs
//! mutate → persist → notify synchronously.
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums at module boundaries; persistence
//!   and parse failures are absorbed, mutation failures propagate one level.
//! - **Logging**: `tracing` macros (`debug!`, `warn!`).

pub mod error;
pub mod model;
pub mod notify;
pub mod service;
pub mod storage;
pub mod store;

pub use error::ServiceError;
pub use model::{DraftPatch, IntakeDraft, ReviewItem, ReviewItemPatch, ReviewStage};
pub use notify::Subscription;
pub use service::{IntakeService, LatencyConfig};
pub use store::IntakeStore;
