//! UI-facing query cache for the HNC intake data layer, plus the bridge
//! that keeps it converged with the authoritative store in `intake-core`.
//!
//! UI components read cached query state; they never subscribe to the store
//! directly. The [`CacheBridge`] owns the only subscriptions and applies
//! the optimistic-update / replace-on-success mutation policies.

pub mod bridge;
pub mod query;

pub use bridge::CacheBridge;
pub use query::{QueryCache, QueryKey};
