//! Mutation runner.
//!
//! A mutation runs one write and, only when it succeeds, marks the keys it
//! declared as affected stale. Failures go back to the caller untouched and
//! leave the cache as it was. There is no automatic retry.

use std::future::Future;
use std::sync::Arc;

use metrics::counter;
use tracing::{debug, warn};

use crate::infra::http::ApiError;

use super::keys::Invalidation;
use super::store::QueryStore;

const METRIC_MUTATION: &str = "foodable_mutation_total";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationStatus {
    Idle,
    Pending,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct MutationRunner {
    store: Arc<QueryStore>,
}

impl MutationRunner {
    pub fn new(store: Arc<QueryStore>) -> Self {
        Self { store }
    }

    /// Run `write`, then invalidate `affected` if it succeeded.
    pub async fn mutate<T, Fut>(
        &self,
        name: &'static str,
        affected: &[Invalidation],
        write: Fut,
    ) -> Result<T, ApiError>
    where
        Fut: Future<Output = Result<T, ApiError>>,
    {
        match write.await {
            Ok(value) => {
                let invalidated = self.store.invalidate(affected);
                counter!(METRIC_MUTATION, "mutation" => name, "result" => "success").increment(1);
                debug!(
                    mutation = name,
                    invalidated = invalidated.len(),
                    "Mutation succeeded"
                );
                Ok(value)
            }
            Err(err) => {
                counter!(METRIC_MUTATION, "mutation" => name, "result" => "error").increment(1);
                warn!(mutation = name, error = %err, "Mutation failed");
                Err(err)
            }
        }
    }

    pub fn mutation<T>(&self, name: &'static str) -> Mutation<T> {
        Mutation {
            runner: self.clone(),
            name,
            status: MutationStatus::Idle,
            data: None,
            error: None,
        }
    }
}

/// Stateful handle for one mutation site.
///
/// `idle -> pending -> {success, error}`; the terminal state holds until the
/// next `run` or `reset`.
#[derive(Debug)]
pub struct Mutation<T> {
    runner: MutationRunner,
    name: &'static str,
    status: MutationStatus,
    data: Option<T>,
    error: Option<ApiError>,
}

impl<T> Mutation<T> {
    pub fn status(&self) -> MutationStatus {
        self.status
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.status == MutationStatus::Pending
    }

    pub fn reset(&mut self) {
        self.status = MutationStatus::Idle;
        self.data = None;
        self.error = None;
    }

    pub async fn run<Fut>(&mut self, affected: &[Invalidation], write: Fut) -> Result<&T, ApiError>
    where
        Fut: Future<Output = Result<T, ApiError>>,
    {
        self.status = MutationStatus::Pending;
        self.error = None;

        match self.runner.mutate(self.name, affected, write).await {
            Ok(value) => {
                self.status = MutationStatus::Success;
                Ok(self.data.insert(value))
            }
            Err(err) => {
                self.status = MutationStatus::Error;
                self.data = None;
                self.error = Some(err.clone());
                Err(err)
            }
        }
    }
}
