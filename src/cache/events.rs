//! Cache change notifications.
//!
//! The store publishes one `CacheEvent` per state change so views can
//! re-render. Delivery is best effort: slow receivers observe
//! `RecvError::Lagged` and should re-read the keys they care about.

use time::OffsetDateTime;
use tokio::sync::broadcast;
use tracing::trace;

use super::keys::QueryKey;

/// Monotonic request generation.
///
/// Drawn from a single store-wide counter; a response is committed only if
/// its generation is still the latest one issued for its key.
pub type Generation = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A fetch was issued for the key.
    Loading,
    /// Fresh data was stored.
    Committed,
    /// A fetch failed; previous data (if any) is retained.
    Failed,
    /// A response arrived for a superseded generation, or was aborted.
    Discarded,
    /// The entry was marked stale.
    Invalidated,
    /// Every entry was dropped.
    Cleared,
}

#[derive(Debug, Clone)]
pub struct CacheEvent {
    /// The affected key; `None` for store-wide events.
    pub key: Option<QueryKey>,
    pub kind: EventKind,
    pub generation: Option<Generation>,
    pub timestamp: OffsetDateTime,
}

impl CacheEvent {
    pub fn new(key: Option<QueryKey>, kind: EventKind, generation: Option<Generation>) -> Self {
        Self {
            key,
            kind,
            generation,
            timestamp: OffsetDateTime::now_utc(),
        }
    }
}

/// Fan-out channel for cache events.
pub struct EventBus {
    sender: broadcast::Sender<CacheEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn publish(&self, event: CacheEvent) {
        trace!(
            key = ?event.key,
            kind = ?event.kind,
            generation = ?event.generation,
            "Cache event published"
        );
        // No receivers is the common case for headless use.
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.sender.subscribe()
    }
}
