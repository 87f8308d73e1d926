//! Query binder.
//!
//! `QueryClient` binds a key to a fetch function. The first caller without a
//! fresh entry issues the fetch; callers arriving while it is in flight await
//! the same shared future, so N concurrent subscribers cost one request.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::sync::broadcast;

use crate::infra::http::ApiError;

use super::config::CacheConfig;
use super::events::CacheEvent;
use super::keys::{Invalidation, QueryKey};
use super::store::{Acquired, CacheEntry, Payload, QueryStatus, QueryStore, downcast};

/// When cached data counts as fresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StalePolicy {
    /// Refetch on every subscription; cached data is still served meanwhile.
    Always,
    /// Fresh for this long after it was fetched.
    After(Duration),
    /// Fresh until invalidated.
    Never,
}

impl StalePolicy {
    pub fn from_stale_time(stale_time: Duration) -> Self {
        if stale_time.is_zero() {
            Self::Always
        } else {
            Self::After(stale_time)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    /// When false the query never fetches and only reports cached state.
    pub enabled: bool,
    /// Overrides the client default.
    pub stale: Option<StalePolicy>,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            stale: None,
        }
    }
}

impl QueryOptions {
    pub fn enabled_if(enabled: bool) -> Self {
        Self {
            enabled,
            ..Self::default()
        }
    }

    pub fn with_stale(mut self, stale: StalePolicy) -> Self {
        self.stale = Some(stale);
        self
    }
}

#[derive(Debug, Clone)]
pub struct QueryClient {
    store: Arc<QueryStore>,
    default_stale: StalePolicy,
}

impl QueryClient {
    pub fn new(config: &CacheConfig) -> Self {
        Self::with_store(Arc::new(QueryStore::new(config)), config)
    }

    pub fn with_store(store: Arc<QueryStore>, config: &CacheConfig) -> Self {
        Self {
            store,
            default_stale: StalePolicy::from_stale_time(config.stale_time()),
        }
    }

    pub fn store(&self) -> &Arc<QueryStore> {
        &self.store
    }

    /// Subscribe to `key` and return its entry once any needed fetch settles.
    ///
    /// Failures are recorded on the entry next to the previous data.
    pub async fn query<T, F, Fut>(&self, key: QueryKey, options: QueryOptions, fetch: F) -> CacheEntry<T>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        if !options.enabled {
            return self.store.read(&key);
        }
        let policy = options.stale.unwrap_or(self.default_stale);
        let result = self.run(key, policy, false, fetch).await;
        let entry = self.store.read(&key);
        if entry.status == QueryStatus::Idle && entry.data.is_none() {
            // Evicted or cleared while in flight.
            return CacheEntry::settled(key, result);
        }
        entry
    }

    /// Like [`QueryClient::query`] but yields the value or the error.
    pub async fn fetch<T, F, Fut>(
        &self,
        key: QueryKey,
        options: QueryOptions,
        fetch: F,
    ) -> Result<Arc<T>, ApiError>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        if !options.enabled {
            return Err(ApiError::precondition(format!("query `{key}` is disabled")));
        }
        let policy = options.stale.unwrap_or(self.default_stale);
        self.run(key, policy, false, fetch).await
    }

    /// Always issue a new generation for `key`, superseding any fetch in
    /// flight.
    pub async fn refetch<T, F, Fut>(&self, key: QueryKey, fetch: F) -> Result<Arc<T>, ApiError>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        self.run(key, StalePolicy::Always, true, fetch).await
    }

    /// Cached state without fetching.
    pub fn peek<T: Send + Sync + 'static>(&self, key: &QueryKey) -> CacheEntry<T> {
        self.store.read(key)
    }

    pub fn invalidate(&self, targets: &[Invalidation]) -> Vec<QueryKey> {
        self.store.invalidate(targets)
    }

    pub fn clear(&self) {
        self.store.clear();
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.store.subscribe()
    }

    async fn run<T, F, Fut>(
        &self,
        key: QueryKey,
        policy: StalePolicy,
        force: bool,
        fetch: F,
    ) -> Result<Arc<T>, ApiError>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let store = Arc::downgrade(&self.store);
        let acquired = self.store.acquire(key, policy, force, move |generation| {
            let request = fetch();
            async move {
                let result = request.await.map(|data| Arc::new(data) as Payload);
                // Whichever subscriber drives the future commits it.
                if let Some(store) = store.upgrade() {
                    store.commit(key, generation, &result);
                }
                result
            }
            .boxed()
            .shared()
        });

        let payload = match acquired {
            Acquired::Fresh(payload) => payload,
            Acquired::Joined(fetch) | Acquired::Issued(fetch) => fetch.await?,
        };
        downcast(&key, &payload).ok_or_else(|| {
            ApiError::Parse(format!("cached value for `{key}` has an unexpected type"))
        })
    }
}
