//! Cross-context storage notifications.
//!
//! Contexts sharing one persistence store also share a `StorageBus`. After a
//! write, a context publishes the key it wrote, stamped with its own id;
//! every other context learns that the store changed under it.

use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;

/// Identity of one context (process, tab, window) on the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(u64);

impl ContextId {
    /// A process-unique id
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A completed write to a shared key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    pub key: String,
    pub origin: ContextId,
}

#[derive(Clone)]
pub struct StorageBus {
    sender: broadcast::Sender<StorageEvent>,
}

impl StorageBus {
    /// Create a bus with default capacity (64 events per receiver).
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sender: broadcast::channel(capacity).0,
        }
    }

    /// Publish a write. No-op if nobody is listening.
    pub fn publish(&self, event: StorageEvent) {
        // Ignore send errors (no active receivers)
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.sender.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for StorageBus {
    fn default() -> Self {
        Self::new()
    }
}
