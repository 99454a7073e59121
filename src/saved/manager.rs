use crate::error::{FinderError, Result};
use crate::models::PropertyId;
use crate::saved::bus::{ContextId, StorageBus, StorageEvent};
use crate::saved::listeners::{ChangeOrigin, Listeners, SavedChange, Subscription};
use crate::saved::store::PersistenceAdapter;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tracing::{debug, info, warn};

/// Store key holding the saved id list
pub const SAVED_PROPERTIES_KEY: &str = "savedProperties";

struct BusLink {
    bus: StorageBus,
    inbox: Mutex<Option<broadcast::Receiver<StorageEvent>>>,
}

/// Saved-set of property ids, persisted as a JSON array under
/// [`SAVED_PROPERTIES_KEY`].
///
/// Construct once per process and hand the `Arc` to every surface that shows
/// saved state. The store is the source of truth: every read goes through it,
/// so writes from other contexts are always visible.
///
/// Each mutation writes the store first, then publishes on the bus (if any),
/// then notifies local listeners.
pub struct SavedSetManager {
    store: Arc<dyn PersistenceAdapter>,
    listeners: Listeners,
    context: ContextId,
    bus: Option<BusLink>,
    write_lock: Mutex<()>,
}

impl SavedSetManager {
    pub fn new(store: Arc<dyn PersistenceAdapter>) -> Arc<Self> {
        Arc::new(Self::build(store, None))
    }

    /// Manager that also hears writes from other contexts on `bus`
    pub fn with_bus(store: Arc<dyn PersistenceAdapter>, bus: &StorageBus) -> Arc<Self> {
        let link = BusLink {
            bus: bus.clone(),
            inbox: Mutex::new(Some(bus.subscribe())),
        };
        Arc::new(Self::build(store, Some(link)))
    }

    fn build(store: Arc<dyn PersistenceAdapter>, bus: Option<BusLink>) -> Self {
        Self {
            store,
            listeners: Listeners::new(),
            context: ContextId::next(),
            bus,
            write_lock: Mutex::new(()),
        }
    }

    pub fn context_id(&self) -> ContextId {
        self.context
    }

    // --- Reads ---

    pub fn contains(&self, id: PropertyId) -> bool {
        self.load().contains(&id)
    }

    /// Saved ids, oldest first
    pub fn list(&self) -> Vec<PropertyId> {
        self.load()
    }

    pub fn count(&self) -> usize {
        self.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    // --- Mutations ---

    /// Remove `id` if saved, append it otherwise. Returns whether it is now saved.
    pub fn toggle(&self, id: PropertyId) -> Result<bool> {
        let mut now_saved = false;
        self.mutate(|ids| {
            match ids.iter().position(|saved| *saved == id) {
                Some(pos) => {
                    ids.remove(pos);
                }
                None => {
                    ids.push(id);
                    now_saved = true;
                }
            }
            true
        })?;

        info!(
            "Property {} {} saved list",
            id,
            if now_saved { "added to" } else { "removed from" }
        );
        Ok(now_saved)
    }

    /// Append `id` unless present. Returns whether the set changed.
    pub fn save(&self, id: PropertyId) -> Result<bool> {
        self.mutate(|ids| {
            if ids.contains(&id) {
                return false;
            }
            ids.push(id);
            true
        })
    }

    /// Drop `id` if present. Returns whether the set changed.
    pub fn remove(&self, id: PropertyId) -> Result<bool> {
        self.mutate(|ids| {
            let before = ids.len();
            ids.retain(|saved| *saved != id);
            ids.len() != before
        })
    }

    /// Forget every saved id
    pub fn clear(&self) -> Result<()> {
        {
            let _guard = self.lock_writes();
            self.store.remove(SAVED_PROPERTIES_KEY)?;
        }
        info!("Cleared saved list");
        self.announce();
        Ok(())
    }

    // --- Notifications ---

    /// Register a listener for every change, local or external
    pub fn subscribe(&self, listener: impl Fn(&SavedChange) + Send + Sync + 'static) -> Subscription {
        self.listeners.subscribe(listener)
    }

    /// Deliver writes made by other contexts since the last call.
    /// Returns the number of notifications sent.
    pub fn sync_external(&self) -> usize {
        let Some(link) = &self.bus else {
            return 0;
        };

        let mut pending = 0;
        {
            let mut inbox = link
                .inbox
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            let Some(inbox) = inbox.as_mut() else {
                return 0;
            };
            loop {
                match inbox.try_recv() {
                    Ok(event) if self.is_foreign(&event) => pending += 1,
                    Ok(_) => {}
                    Err(TryRecvError::Lagged(skipped)) => {
                        warn!("Missed {} storage events; treating as one change", skipped);
                        pending += 1;
                    }
                    Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
                }
            }
        }

        for _ in 0..pending {
            self.notify_external();
        }
        pending
    }

    /// Relay external writes as they arrive. Meant for a spawned task; takes
    /// over the inbox, so `sync_external` returns 0 afterwards.
    pub async fn listen_external(self: Arc<Self>) {
        let Some(link) = &self.bus else {
            return;
        };
        let inbox = link
            .inbox
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        let Some(mut inbox) = inbox else {
            warn!("External listener already running for context {:?}", self.context);
            return;
        };

        debug!("Listening for external saved-set writes");
        loop {
            match inbox.recv().await {
                Ok(event) if self.is_foreign(&event) => self.notify_external(),
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Missed {} storage events; treating as one change", skipped);
                    self.notify_external();
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    fn is_foreign(&self, event: &StorageEvent) -> bool {
        event.origin != self.context && event.key == SAVED_PROPERTIES_KEY
    }

    fn notify_external(&self) {
        debug!("Saved list changed in another context");
        self.listeners.notify(&SavedChange {
            origin: ChangeOrigin::External,
        });
    }

    fn announce(&self) {
        if let Some(link) = &self.bus {
            link.bus.publish(StorageEvent {
                key: SAVED_PROPERTIES_KEY.to_string(),
                origin: self.context,
            });
        }
        self.listeners.notify(&SavedChange {
            origin: ChangeOrigin::Local,
        });
    }

    // --- Persistence ---

    /// Read-modify-write under the write lock; announces only when `edit`
    /// reports a change, after the lock is released. A failed read aborts
    /// the mutation so the stored list is never rebuilt from nothing.
    fn mutate(&self, edit: impl FnOnce(&mut Vec<PropertyId>) -> bool) -> Result<bool> {
        {
            let _guard = self.lock_writes();
            let mut ids = self.load_for_write()?;
            if !edit(&mut ids) {
                return Ok(false);
            }
            let json = serde_json::to_string(&ids)
                .map_err(|e| FinderError::Storage(e.to_string()))?;
            self.store.write(SAVED_PROPERTIES_KEY, &json)?;
        }
        self.announce();
        Ok(true)
    }

    fn lock_writes(&self) -> std::sync::MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Current ids. Never fails: unreadable or corrupt state reads as empty.
    fn load(&self) -> Vec<PropertyId> {
        match self.store.read(SAVED_PROPERTIES_KEY) {
            Ok(raw) => self.decode_or_reset(raw),
            Err(err) => {
                warn!("Could not read saved list: {}", err);
                Vec::new()
            }
        }
    }

    /// Current ids for a mutation. Read errors propagate; corrupt state
    /// still resets to empty.
    fn load_for_write(&self) -> Result<Vec<PropertyId>> {
        let raw = self.store.read(SAVED_PROPERTIES_KEY)?;
        Ok(self.decode_or_reset(raw))
    }

    fn decode_or_reset(&self, raw: Option<String>) -> Vec<PropertyId> {
        let Some(raw) = raw else {
            return Vec::new();
        };
        match decode_ids(&raw) {
            Ok(ids) => ids,
            Err(err) => {
                warn!("{}; resetting saved list", err);
                if let Err(err) = self.store.remove(SAVED_PROPERTIES_KEY) {
                    warn!("Could not reset saved list: {}", err);
                }
                Vec::new()
            }
        }
    }
}

/// Parse a JSON id array, keeping the first occurrence of each id
fn decode_ids(raw: &str) -> Result<Vec<PropertyId>> {
    let parsed: Vec<PropertyId> =
        serde_json::from_str(raw).map_err(|e| FinderError::MalformedPersistedState {
            key: SAVED_PROPERTIES_KEY.to_string(),
            reason: e.to_string(),
        })?;

    let mut ids = Vec::with_capacity(parsed.len());
    for id in parsed {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    Ok(ids)
}
