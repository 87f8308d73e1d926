//! Query store.
//!
//! Holds one entry per `QueryKey`: the last successful payload, the current
//! status, the last error, and the handle of the fetch in flight. Entries are
//! bounded by an LRU limit.
//!
//! Writes follow completion order *of the latest issued generation*: a
//! response is committed only if no newer request was issued for its key in
//! the meantime. Everything else is discarded on arrival.

use std::any::{Any, type_name};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use futures::future::{BoxFuture, Shared};
use lru::LruCache;
use metrics::counter;
use time::OffsetDateTime;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::infra::http::ApiError;

use super::config::CacheConfig;
use super::events::{CacheEvent, EventBus, EventKind, Generation};
use super::keys::{Invalidation, QueryKey};
use super::lock::mutex_lock;
use super::query::StalePolicy;

const SOURCE: &str = "cache::store";

const METRIC_QUERY_HIT: &str = "foodable_query_hit_total";
const METRIC_QUERY_MISS: &str = "foodable_query_miss_total";
const METRIC_QUERY_DEDUP: &str = "foodable_query_dedup_total";
const METRIC_QUERY_DISCARD: &str = "foodable_query_discard_total";

pub(crate) type Payload = Arc<dyn Any + Send + Sync>;
pub(crate) type SharedFetch = Shared<BoxFuture<'static, Result<Payload, ApiError>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    Idle,
    Loading,
    Success,
    Error,
}

/// Snapshot of one cache entry, typed for the reader.
#[derive(Debug)]
pub struct CacheEntry<T> {
    pub key: QueryKey,
    pub data: Option<Arc<T>>,
    pub status: QueryStatus,
    pub error: Option<ApiError>,
    pub fetched_at: Option<OffsetDateTime>,
    pub stale: bool,
}

impl<T> Clone for CacheEntry<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key,
            data: self.data.clone(),
            status: self.status,
            error: self.error.clone(),
            fetched_at: self.fetched_at,
            stale: self.stale,
        }
    }
}

impl<T> CacheEntry<T> {
    fn idle(key: QueryKey) -> Self {
        Self {
            key,
            data: None,
            status: QueryStatus::Idle,
            error: None,
            fetched_at: None,
            stale: false,
        }
    }

    /// Entry for a fetch whose slot is gone by the time it settled.
    pub(crate) fn settled(key: QueryKey, result: Result<Arc<T>, ApiError>) -> Self {
        let mut entry = Self::idle(key);
        match result {
            Ok(data) => {
                entry.data = Some(data);
                entry.status = QueryStatus::Success;
            }
            Err(err) => {
                entry.error = Some(err);
                entry.status = QueryStatus::Error;
            }
        }
        entry
    }

    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Loading
    }

    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Error
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    /// The data if the last fetch succeeded, otherwise the error.
    ///
    /// An entry that failed after an earlier success yields the error; read
    /// `data` directly to keep showing the stale value.
    pub fn into_result(self) -> Result<Arc<T>, ApiError> {
        let key = self.key;
        match (self.status, self.data, self.error) {
            (QueryStatus::Error, _, Some(err)) | (_, None, Some(err)) => Err(err),
            (_, Some(data), _) => Ok(data),
            (_, None, None) => Err(ApiError::precondition(format!(
                "no data cached for `{key}`"
            ))),
        }
    }
}

struct Slot {
    data: Option<Payload>,
    status: QueryStatus,
    error: Option<ApiError>,
    fetched_at: Option<OffsetDateTime>,
    fetched_instant: Option<Instant>,
    stale: bool,
    /// Set when an invalidation lands while a fetch is in flight. That
    /// response may predate the mutation: later readers issue a new fetch
    /// instead of joining it, and if it still lands last it commits as stale.
    invalidated_in_flight: bool,
    /// Latest generation issued or written for this key.
    generation: Generation,
    in_flight: Option<SharedFetch>,
}

impl Slot {
    fn new() -> Self {
        Self {
            data: None,
            status: QueryStatus::Idle,
            error: None,
            fetched_at: None,
            fetched_instant: None,
            stale: false,
            invalidated_in_flight: false,
            generation: 0,
            in_flight: None,
        }
    }

    fn is_fresh(&self, policy: StalePolicy) -> bool {
        if self.stale || self.data.is_none() {
            return false;
        }
        match policy {
            StalePolicy::Always => false,
            StalePolicy::Never => true,
            StalePolicy::After(window) => self
                .fetched_instant
                .is_some_and(|at| at.elapsed() < window),
        }
    }

    fn settled_status(&self) -> QueryStatus {
        if self.error.is_some() {
            QueryStatus::Error
        } else if self.data.is_some() {
            QueryStatus::Success
        } else {
            QueryStatus::Idle
        }
    }

    fn store_payload(&mut self, payload: Payload) {
        self.data = Some(payload);
        self.status = QueryStatus::Success;
        self.error = None;
        self.fetched_at = Some(OffsetDateTime::now_utc());
        self.fetched_instant = Some(Instant::now());
    }

    fn snapshot<T: Send + Sync + 'static>(&self, key: &QueryKey) -> CacheEntry<T> {
        CacheEntry {
            key: *key,
            data: self.data.as_ref().and_then(|payload| downcast(key, payload)),
            status: self.status,
            error: self.error.clone(),
            fetched_at: self.fetched_at,
            stale: self.stale,
        }
    }
}

/// Outcome of asking the store for a key.
pub(crate) enum Acquired {
    /// Cached data is fresh under the caller's policy.
    Fresh(Payload),
    /// Another subscriber already issued a fetch; await the same one.
    Joined(SharedFetch),
    /// A new fetch was issued under a new generation.
    Issued(SharedFetch),
}

pub struct QueryStore {
    slots: Mutex<LruCache<QueryKey, Slot>>,
    generations: AtomicU64,
    events: EventBus,
}

impl fmt::Debug for QueryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryStore")
            .field("entries", &self.len())
            .field("generation", &self.generations.load(Ordering::SeqCst))
            .finish()
    }
}

impl QueryStore {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            slots: Mutex::new(LruCache::new(config.max_entries_non_zero())),
            generations: AtomicU64::new(0),
            events: EventBus::new(config.event_capacity_non_zero()),
        }
    }

    fn next_generation(&self) -> Generation {
        self.generations.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Typed snapshot of `key`; an idle entry if nothing is cached.
    pub fn read<T: Send + Sync + 'static>(&self, key: &QueryKey) -> CacheEntry<T> {
        let mut slots = mutex_lock(&self.slots, SOURCE, "read");
        slots
            .get(key)
            .map_or_else(|| CacheEntry::idle(*key), |slot| slot.snapshot(key))
    }

    /// Store `data` for `key` directly, superseding any fetch in flight.
    pub fn write<T: Send + Sync + 'static>(&self, key: QueryKey, data: T) -> Generation {
        let generation = self.next_generation();
        {
            let mut slots = mutex_lock(&self.slots, SOURCE, "write");
            let slot = slots.get_or_insert_mut(key, Slot::new);
            slot.store_payload(Arc::new(data));
            slot.stale = false;
            slot.invalidated_in_flight = false;
            slot.generation = generation;
            slot.in_flight = None;
        }
        self.events.publish(CacheEvent::new(
            Some(key),
            EventKind::Committed,
            Some(generation),
        ));
        generation
    }

    /// Mark every entry matched by `targets` stale. Returns the matched keys.
    ///
    /// Repeating an invalidation has no further effect: the next read
    /// refetches once either way.
    pub fn invalidate(&self, targets: &[Invalidation]) -> Vec<QueryKey> {
        let mut affected = Vec::new();
        {
            let mut slots = mutex_lock(&self.slots, SOURCE, "invalidate");
            for (key, slot) in slots.iter_mut() {
                if targets.iter().any(|target| target.matches(key)) {
                    slot.stale = true;
                    if slot.in_flight.is_some() {
                        slot.invalidated_in_flight = true;
                    }
                    affected.push(*key);
                }
            }
        }

        debug!(
            targets = ?targets,
            affected = affected.len(),
            "Cache entries invalidated"
        );
        for key in &affected {
            self.events.publish(CacheEvent::new(
                Some(*key),
                EventKind::Invalidated,
                None,
            ));
        }
        affected
    }

    pub fn set_status(&self, key: QueryKey, status: QueryStatus, error: Option<ApiError>) {
        let mut slots = mutex_lock(&self.slots, SOURCE, "set_status");
        let slot = slots.get_or_insert_mut(key, Slot::new);
        slot.status = status;
        slot.error = error;
    }

    /// Drop one entry. A fetch still in flight for it will be discarded.
    pub fn remove(&self, key: &QueryKey) -> bool {
        mutex_lock(&self.slots, SOURCE, "remove").pop(key).is_some()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        mutex_lock(&self.slots, SOURCE, "clear").clear();
        self.events
            .publish(CacheEvent::new(None, EventKind::Cleared, None));
    }

    pub fn len(&self) -> usize {
        mutex_lock(&self.slots, SOURCE, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.events.subscribe()
    }

    /// Decide, atomically, whether `key` is served from cache, joins the
    /// fetch in flight, or needs a new fetch. `issue` builds the fetch for a
    /// fresh generation and is only called in the last case.
    pub(crate) fn acquire<F>(
        &self,
        key: QueryKey,
        policy: StalePolicy,
        force: bool,
        issue: F,
    ) -> Acquired
    where
        F: FnOnce(Generation) -> SharedFetch,
    {
        let generation;
        let fetch;
        {
            let mut slots = mutex_lock(&self.slots, SOURCE, "acquire");
            let slot = slots.get_or_insert_mut(key, Slot::new);

            if !force {
                if let Some(data) = slot.data.as_ref().filter(|_| slot.is_fresh(policy)) {
                    counter!(METRIC_QUERY_HIT).increment(1);
                    return Acquired::Fresh(Arc::clone(data));
                }
                // A fetch that saw an invalidation may predate the write.
                if let Some(in_flight) = slot
                    .in_flight
                    .as_ref()
                    .filter(|_| !slot.invalidated_in_flight)
                {
                    counter!(METRIC_QUERY_DEDUP).increment(1);
                    debug!(key = %key, generation = slot.generation, "Joined in-flight query");
                    return Acquired::Joined(in_flight.clone());
                }
            }

            counter!(METRIC_QUERY_MISS).increment(1);
            generation = self.next_generation();
            fetch = issue(generation);
            slot.generation = generation;
            slot.status = QueryStatus::Loading;
            slot.invalidated_in_flight = false;
            slot.in_flight = Some(fetch.clone());
        }

        debug!(key = %key, generation, force, "Query fetch issued");
        self.events.publish(CacheEvent::new(
            Some(key),
            EventKind::Loading,
            Some(generation),
        ));
        Acquired::Issued(fetch)
    }

    /// Apply the result of `generation` if it is still the latest for `key`.
    ///
    /// Returns `true` when the result was recorded (data or error).
    pub(crate) fn commit(
        &self,
        key: QueryKey,
        generation: Generation,
        result: &Result<Payload, ApiError>,
    ) -> bool {
        let kind = {
            let mut slots = mutex_lock(&self.slots, SOURCE, "commit");
            let Some(slot) = slots.peek_mut(&key) else {
                drop(slots);
                self.discard(key, generation, "evicted");
                return false;
            };
            if slot.generation != generation {
                let latest = slot.generation;
                drop(slots);
                debug!(key = %key, generation, latest, "Superseded response");
                self.discard(key, generation, "superseded");
                return false;
            }

            slot.in_flight = None;
            match result {
                Ok(payload) => {
                    slot.store_payload(Arc::clone(payload));
                    slot.stale = slot.invalidated_in_flight;
                    EventKind::Committed
                }
                Err(ApiError::Aborted) => {
                    slot.status = slot.settled_status();
                    EventKind::Discarded
                }
                Err(err) => {
                    slot.status = QueryStatus::Error;
                    slot.error = Some(err.clone());
                    EventKind::Failed
                }
            }
        };

        if kind == EventKind::Failed {
            if let Err(err) = result {
                warn!(key = %key, generation, error = %err, "Query failed");
            }
        }
        self.events
            .publish(CacheEvent::new(Some(key), kind, Some(generation)));
        kind != EventKind::Discarded
    }

    fn discard(&self, key: QueryKey, generation: Generation, reason: &'static str) {
        counter!(METRIC_QUERY_DISCARD, "reason" => reason).increment(1);
        self.events.publish(CacheEvent::new(
            Some(key),
            EventKind::Discarded,
            Some(generation),
        ));
    }
}

pub(crate) fn downcast<T: Send + Sync + 'static>(
    key: &QueryKey,
    payload: &Payload,
) -> Option<Arc<T>> {
    match Arc::clone(payload).downcast::<T>() {
        Ok(data) => Some(data),
        Err(_) => {
            warn!(
                key = %key,
                expected = type_name::<T>(),
                "Cached payload has a different type"
            );
            None
        }
    }
}
