//! In-memory backends: a single-context map and a shared multi-context hub.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use super::{ChangeListener, StorageBackend, StorageChange, StorageError};

/// Single-context in-memory backend. Change notifications never fire.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    map: RefCell<BTreeMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.map.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.map
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Default)]
struct HubInner {
    map: RefCell<BTreeMap<String, String>>,
    next_context: Cell<usize>,
    listeners: RefCell<Vec<(usize, ChangeListener)>>,
}

/// One storage area shared by several simulated execution contexts ("tabs").
///
/// A write from one context is delivered to the change listeners of every
/// *other* context, never to the writer itself — the same asymmetry as the
/// browser `storage` event this models.
#[derive(Default)]
pub struct StorageHub {
    inner: Rc<HubInner>,
}

impl StorageHub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new context handle onto this storage area.
    #[must_use]
    pub fn context(&self) -> ContextStorage {
        let id = self.inner.next_context.get();
        self.inner.next_context.set(id + 1);
        ContextStorage {
            hub: Rc::clone(&self.inner),
            id,
        }
    }
}

/// Per-context handle onto a [`StorageHub`] area.
#[derive(Clone)]
pub struct ContextStorage {
    hub: Rc<HubInner>,
    id: usize,
}

impl StorageBackend for ContextStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.hub.map.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.hub
            .map
            .borrow_mut()
            .insert(key.to_string(), value.to_string());

        let change = StorageChange {
            key: key.to_string(),
            new_value: Some(value.to_string()),
        };
        // Snapshot the listener set first: a listener that writes storage
        // while handling the change must not corrupt iteration.
        let listeners: Vec<ChangeListener> = self
            .hub
            .listeners
            .borrow()
            .iter()
            .filter(|(context, _)| *context != self.id)
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener(&change);
        }
        Ok(())
    }

    fn subscribe_changes(&self, listener: ChangeListener) {
        self.hub.listeners.borrow_mut().push((self.id, listener));
    }
}
