use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

/// Where a saved-set change came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOrigin {
    /// A mutation made through this manager
    Local,
    /// A write by another context sharing the same store
    External,
}

/// Payload of a saved-set change. Listeners re-read the manager for the new state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedChange {
    pub origin: ChangeOrigin,
}

type Listener = Arc<dyn Fn(&SavedChange) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: AtomicU64,
    listeners: Mutex<Vec<(u64, Listener)>>,
}

/// Observer list shared by a manager and its subscription handles
#[derive(Clone, Default)]
pub struct Listeners {
    inner: Arc<Registry>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: impl Fn(&SavedChange) + Send + Sync + 'static) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.lock().push((id, Arc::new(listener)));
        Subscription {
            id,
            registry: Arc::downgrade(&self.inner),
        }
    }

    /// Call every listener registered at the time of the call
    pub fn notify(&self, change: &SavedChange) {
        // Snapshot so listeners may subscribe or read the manager re-entrantly.
        let snapshot: Vec<Listener> = self.lock().iter().map(|(_, l)| Arc::clone(l)).collect();
        for listener in snapshot {
            listener(change);
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(u64, Listener)>> {
        lock_listeners(&self.inner)
    }
}

fn lock_listeners(registry: &Registry) -> std::sync::MutexGuard<'_, Vec<(u64, Listener)>> {
    // A panicking listener never runs under the lock, so the list stays valid.
    registry
        .listeners
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Handle returned by `subscribe`. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes the listener"]
pub struct Subscription {
    id: u64,
    registry: Weak<Registry>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        // Drop does the work.
    }

    fn detach(&self) {
        if let Some(registry) = self.registry.upgrade() {
            lock_listeners(&registry).retain(|(id, _)| *id != self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach();
    }
}
