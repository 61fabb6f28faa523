//! Subscriber registry and unsubscribe handles.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

pub(crate) type Callback<T> = Arc<dyn Fn(&Arc<T>) + Send + Sync>;

trait Detach: Send + Sync {
    fn detach(&self, id: u64) -> bool;
}

/// Callbacks in registration order.
pub(crate) struct Registry<T> {
    next_id: AtomicU64,
    entries: Mutex<Vec<(u64, Callback<T>)>>,
}

impl<T> Registry<T> {
    pub(crate) fn new() -> Self {
        Self {
            next_id: AtomicU64::new(0),
            entries: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn insert(&self, callback: Callback<T>) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.entries.lock().push((id, callback));
        id
    }

    /// Callbacks registered right now. Notification iterates this copy so
    /// callbacks may subscribe or unsubscribe without holding the lock.
    pub(crate) fn snapshot(&self) -> Vec<Callback<T>> {
        self.entries
            .lock()
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.lock().len()
    }
}

impl<T: Send + Sync> Detach for Registry<T> {
    fn detach(&self, id: u64) -> bool {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|(entry, _)| *entry != id);
        entries.len() != before
    }
}

/// Handle returned by [`Store::subscribe`](crate::store::Store::subscribe).
///
/// Dropping the handle does NOT unsubscribe; call [`unsubscribe`](Self::unsubscribe).
/// Unsubscribing more than once is a no-op. A subscription removed while a
/// notification is in flight still receives that one notification.
pub struct Subscription {
    id: u64,
    registry: Weak<dyn Detach>,
    active: AtomicBool,
}

impl Subscription {
    pub(crate) fn new<T: Send + Sync + 'static>(id: u64, registry: &Arc<Registry<T>>) -> Self {
        let weak: Weak<Registry<T>> = Arc::downgrade(registry);
        Self {
            id,
            registry: weak,
            active: AtomicBool::new(true),
        }
    }

    /// Remove the callback. Returns `true` only on the call that removed it.
    pub fn unsubscribe(&self) -> bool {
        if !self.active.swap(false, Ordering::AcqRel) {
            return false;
        }
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.detach(self.id))
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
