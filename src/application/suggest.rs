//! Debounced AI suggestions.
//!
//! Every [`SuggestSession::input`] cancels the previous timer and request.
//! A new request goes out only after the input has been quiet for the
//! debounce window, so typing "s", "sa", "sal" costs one request at most.
//! Aborted responses never reach the published state.

use std::sync::Arc;

use async_trait::async_trait;
use foodable_api_types::{SuggestRequest, SuggestResponse, Suggestion};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::SuggestSettings;
use crate::infra::http::ApiError;
use crate::resources::AiApi;

pub const SUGGEST_UNAVAILABLE: &str = "AI suggestions unavailable.";

#[async_trait]
pub trait SuggestSource: Send + Sync {
    async fn suggest(
        &self,
        request: &SuggestRequest,
        cancel: &CancellationToken,
    ) -> Result<SuggestResponse, ApiError>;
}

#[async_trait]
impl SuggestSource for AiApi {
    async fn suggest(
        &self,
        request: &SuggestRequest,
        cancel: &CancellationToken,
    ) -> Result<SuggestResponse, ApiError> {
        AiApi::suggest(self, request, cancel).await
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuggestState {
    /// Trimmed input the state belongs to.
    pub query: String,
    pub suggestions: Vec<Suggestion>,
    pub loading: bool,
    pub error: Option<String>,
}

pub struct SuggestSession {
    source: Arc<dyn SuggestSource>,
    settings: SuggestSettings,
    state: Arc<watch::Sender<SuggestState>>,
    pending: Option<CancellationToken>,
    task: Option<JoinHandle<()>>,
}

impl SuggestSession {
    pub fn new(source: Arc<dyn SuggestSource>, settings: SuggestSettings) -> Self {
        let (state, _) = watch::channel(SuggestState::default());
        Self {
            source,
            settings,
            state: Arc::new(state),
            pending: None,
            task: None,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SuggestState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> SuggestState {
        self.state.borrow().clone()
    }

    /// Feed the latest input text.
    pub fn input(&mut self, raw: &str) {
        self.cancel();
        let query = raw.trim().to_string();

        if query.chars().count() < self.settings.min_query_len.get() {
            self.state.send_modify(|state| {
                state.query = query;
                state.suggestions.clear();
                state.loading = false;
                state.error = None;
            });
            return;
        }

        self.state.send_modify(|state| state.query.clone_from(&query));

        let cancel = CancellationToken::new();
        self.pending = Some(cancel.clone());
        let request = SuggestRequest {
            query,
            dietary_restrictions: self.settings.dietary_restrictions.clone(),
            max_results: self.settings.max_results.get(),
        };
        let source = Arc::clone(&self.source);
        let state = Arc::clone(&self.state);
        let debounce = self.settings.debounce;

        self.task = Some(tokio::spawn(async move {
            tokio::select! {
                biased;
                () = cancel.cancelled() => return,
                () = sleep(debounce) => {}
            }

            let started = state.send_if_modified(|current| {
                if cancel.is_cancelled() {
                    return false;
                }
                current.loading = true;
                current.error = None;
                true
            });
            if !started {
                return;
            }
            debug!(query = %request.query, "Requesting AI suggestions");

            let result = source.suggest(&request, &cancel).await;
            state.send_if_modified(|current| {
                // Checked under the channel lock so a newer input always wins.
                if cancel.is_cancelled() {
                    return false;
                }
                match result {
                    Ok(response) => {
                        current.suggestions = response.suggestions;
                        current.error = None;
                    }
                    Err(ApiError::Aborted) => {}
                    Err(err) => {
                        warn!(query = %request.query, error = %err, "AI suggestions failed");
                        current.error = Some(SUGGEST_UNAVAILABLE.to_string());
                    }
                }
                current.loading = false;
                true
            });
        }));
    }

    /// Cancel the pending timer or request, if any.
    pub fn cancel(&mut self) {
        if let Some(previous) = self.pending.take() {
            previous.cancel();
            self.state.send_if_modified(|state| {
                let was_loading = state.loading;
                state.loading = false;
                was_loading
            });
        }
    }

    /// Wait for the latest input to finish (debounce plus request).
    pub async fn settle(&mut self) {
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                warn!(error = %err, "Suggestion task ended abnormally");
            }
        }
    }
}

impl Drop for SuggestSession {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.cancel();
        }
    }
}
