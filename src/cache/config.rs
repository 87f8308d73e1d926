//! Cache configuration.
//!
//! Staleness and capacity of the query store, derived from the validated
//! `[cache]` settings.

use std::num::NonZeroUsize;
use std::time::Duration;

const DEFAULT_STALE_TIME_MS: u64 = 0;
const DEFAULT_MAX_ENTRIES: usize = 256;
const DEFAULT_EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// How long fetched data counts as fresh. Zero refetches on every
    /// subscription while still serving the cached value.
    pub stale_time_ms: u64,
    /// Maximum number of query entries kept before LRU eviction.
    pub max_entries: usize,
    /// Buffer size of the change-notification channel.
    pub event_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            stale_time_ms: DEFAULT_STALE_TIME_MS,
            max_entries: DEFAULT_MAX_ENTRIES,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            stale_time_ms: u64::try_from(settings.stale_time.as_millis()).unwrap_or(u64::MAX),
            max_entries: settings.max_entries.get(),
            event_capacity: settings.event_capacity.get(),
        }
    }
}

impl CacheConfig {
    pub fn stale_time(&self) -> Duration {
        Duration::from_millis(self.stale_time_ms)
    }

    /// Returns the entry limit as NonZeroUsize, clamping to 1 if zero.
    pub fn max_entries_non_zero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.max_entries).unwrap_or(NonZeroUsize::MIN)
    }

    /// Returns the event capacity, clamping to 1 if zero.
    pub fn event_capacity_non_zero(&self) -> usize {
        self.event_capacity.max(1)
    }
}
