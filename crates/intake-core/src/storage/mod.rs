//! Persistence bridge: best-effort key-value storage for store snapshots.
//!
//! The persisted copy is a convenience cache for same-origin reloads and
//! cross-context sync, not a source of truth. Reads therefore never fail
//! (absent or malformed content resolves to the caller's default) and write
//! failures are logged and swallowed.
//!
//! Backends:
//!
//! - [`MemoryStorage`] — single-context in-memory map.
//! - [`StorageHub`] / [`ContextStorage`] — one shared area with per-context
//!   handles and cross-context change notifications.
//! - [`DirStorage`] — file-per-key JSON documents under a directory.

mod dir;
mod memory;

pub use dir::DirStorage;
pub use memory::{ContextStorage, MemoryStorage, StorageHub};

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::rc::Rc;

/// Persistence key for the intake draft record.
pub const DRAFT_STORAGE_KEY: &str = "hnc:intake:draft";

/// Persistence key for the review queue.
pub const REVIEW_STORAGE_KEY: &str = "hnc:intake:reviews";

/// A key change written by another execution context sharing the same
/// storage area. `new_value` is `None` when the key was removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageChange {
    pub key: String,
    pub new_value: Option<String>,
}

/// Listener for cross-context change notifications.
pub type ChangeListener = Rc<dyn Fn(&StorageChange)>;

/// Errors raised by storage writes. Reads never fail: absent or unreadable
/// content is reported as `None` and resolved by the caller's fallback.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage write failed: {0}")]
    Write(#[from] std::io::Error),
}

/// A key-value persistence layer scoped to one execution context.
pub trait StorageBackend {
    /// Raw snapshot stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a raw snapshot under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Register for changes made by *other* contexts sharing this storage
    /// area. Backends without cross-context delivery ignore the listener.
    fn subscribe_changes(&self, listener: ChangeListener) {
        let _ = listener;
    }
}

/// Read and deserialize the snapshot at `key`, falling back to `default` on
/// absent or malformed content.
pub fn load_or_default<T: DeserializeOwned>(
    backend: &dyn StorageBackend,
    key: &str,
    default: T,
) -> T {
    match backend.get(key) {
        Some(raw) => parse_or_default(&raw, default),
        None => default,
    }
}

/// Deserialize a raw snapshot, falling back to `default` on malformed JSON.
pub fn parse_or_default<T: DeserializeOwned>(raw: &str, default: T) -> T {
    match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(error = %err, "malformed persisted snapshot, using default");
            default
        }
    }
}

/// Serialize `value` and write it under `key`, best effort: failures are
/// logged and never surfaced to the caller.
pub fn persist<T: Serialize>(backend: &dyn StorageBackend, key: &str, value: &T) {
    let raw = match serde_json::to_string(value) {
        Ok(raw) => raw,
        Err(err) => {
            tracing::warn!(key, error = %err, "failed to serialize store snapshot");
            return;
        }
    };
    if let Err(err) = backend.set(key, &raw) {
        tracing::warn!(key, error = %err, "failed to persist store snapshot");
    }
}
