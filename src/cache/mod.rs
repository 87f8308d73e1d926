//! Foodable query cache.
//!
//! Mediates between views and the remote API:
//!
//! - **Store**: one entry per [`QueryKey`] with data, status, error and
//!   staleness, bounded by an LRU limit
//! - **Query binder**: issues at most one fetch per key at a time and shares
//!   it with every concurrent subscriber
//! - **Mutation runner**: runs a write and invalidates the keys it declares
//!
//! ## Configuration
//!
//! ```toml
//! [cache]
//! stale_time_ms = 0
//! max_entries = 256
//! event_capacity = 64
//! ```

mod config;
mod events;
mod keys;
mod lock;
mod mutation;
mod query;
mod store;

pub use config::CacheConfig;
pub(crate) use lock::mutex_lock;
pub use events::{CacheEvent, EventBus, EventKind, Generation};
pub use keys::{Invalidation, QueryKey, Resource};
pub use mutation::{Mutation, MutationRunner, MutationStatus};
pub use query::{QueryClient, QueryOptions, StalePolicy};
pub use store::{CacheEntry, QueryStatus, QueryStore};
