//! Pub/sub notifier: per-store subscriber registries with synchronous,
//! snapshot-safe broadcast.
//!
//! Each broadcast hands every subscriber its own independent copy of the
//! store snapshot, in registration order. Subscribing does not deliver the
//! current snapshot; callers fetch initial state separately.

use std::cell::RefCell;
use std::rc::Rc;

type Callback<T> = Rc<dyn Fn(T)>;

struct Registry<T> {
    next_id: u64,
    entries: Vec<(u64, Callback<T>)>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

/// Observer registry for one store.
pub struct Notifier<T> {
    registry: Rc<RefCell<Registry<T>>>,
}

impl<T> Default for Notifier<T> {
    fn default() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry::default())),
        }
    }
}

impl<T: Clone + 'static> Notifier<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for snapshot broadcasts. Dropping the returned
    /// [`Subscription`] (or calling [`Subscription::cancel`]) de-registers
    /// it.
    pub fn subscribe(&self, callback: impl Fn(T) + 'static) -> Subscription {
        let id = {
            let mut registry = self.registry.borrow_mut();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.entries.push((id, Rc::new(callback)));
            id
        };

        let registry = Rc::downgrade(&self.registry);
        Subscription::new(move || {
            if let Some(registry) = registry.upgrade() {
                registry
                    .borrow_mut()
                    .entries
                    .retain(|(entry_id, _)| *entry_id != id);
            }
        })
    }

    /// Deliver an independent copy of `snapshot` to every subscriber,
    /// synchronously, in registration order.
    ///
    /// The subscriber set is snapshotted before iterating, so a callback
    /// that subscribes or unsubscribes mid-broadcast cannot corrupt
    /// delivery. Entries removed mid-broadcast still receive this round.
    pub fn notify(&self, snapshot: &T) {
        let callbacks: Vec<Callback<T>> = self
            .registry
            .borrow()
            .entries
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();
        for callback in callbacks {
            callback(snapshot.clone());
        }
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.registry.borrow().entries.len()
    }
}

/// De-registration guard returned by [`Notifier::subscribe`].
pub struct Subscription {
    unregister: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    fn new(unregister: impl FnOnce() + 'static) -> Self {
        Self {
            unregister: Some(Box::new(unregister)),
        }
    }

    /// De-register the subscriber now instead of at drop.
    pub fn cancel(mut self) {
        self.run();
    }

    fn run(&mut self) {
        if let Some(unregister) = self.unregister.take() {
            unregister();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run();
    }
}
