//! Search box controller.
//!
//! Keystrokes update the query immediately and (re)arm a debounce timer owned
//! by this instance. When the timer fires, the effective query is sent with a
//! sequence tag; only a response carrying the most recently issued tag may
//! replace the results, so a slow answer to an older query can never
//! overwrite a newer one.

use crate::models::FileRecord;
use crate::services::{ApiError, FileApi};
use crate::utils::lock;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Identifier actually sent: the trimmed query, or `fallback` when that is empty.
pub fn effective_query(raw: &str, fallback: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    /// Raw text as typed.
    pub query: String,
    pub results: Vec<FileRecord>,
    /// Identifier the current `results` were fetched for.
    pub results_for: Option<String>,
    /// A request for the latest tag is outstanding.
    pub loading: bool,
    /// Set when the latest request failed; cleared by the next applied response.
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    Failed,
    /// A newer request was issued before this one resolved.
    Stale,
}

#[derive(Clone)]
pub struct SearchController {
    inner: Arc<Inner>,
}

struct Inner {
    api: Arc<dyn FileApi>,
    debounce: Duration,
    fallback_query: String,
    request_timeout: Duration,
    latest_tag: Mutex<u64>,
    pending: Mutex<Option<JoinHandle<()>>>,
    state: watch::Sender<SearchState>,
}

impl SearchController {
    pub fn new(
        api: Arc<dyn FileApi>,
        debounce: Duration,
        fallback_query: impl Into<String>,
        request_timeout: Duration,
    ) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self {
            inner: Arc::new(Inner {
                api,
                debounce,
                fallback_query: fallback_query.into(),
                request_timeout,
                latest_tag: Mutex::new(0),
                pending: Mutex::new(None),
                state,
            }),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.inner.state.subscribe()
    }

    pub fn state(&self) -> SearchState {
        self.inner.state.borrow().clone()
    }

    pub fn query(&self) -> String {
        self.inner.state.borrow().query.clone()
    }

    pub fn results(&self) -> Vec<FileRecord> {
        self.inner.state.borrow().results.clone()
    }

    pub fn last_error(&self) -> Option<String> {
        self.inner.state.borrow().last_error.clone()
    }

    /// The identifier the current query text resolves to.
    pub fn effective_query(&self) -> String {
        effective_query(&self.query(), &self.inner.fallback_query)
    }

    /// Fire a search for the current query right away, without debouncing.
    /// Used once when the search view is first shown.
    pub fn mount(&self) -> JoinHandle<FetchOutcome> {
        let query = self.effective_query();
        let tag = self.inner.issue();
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move { inner.run(tag, &query).await })
    }

    /// Update the query text and reschedule the debounced search.
    pub fn set_query(&self, text: impl Into<String>) {
        let text = text.into();
        self.inner.state.send_modify(|state| state.query = text.clone());

        let inner = Arc::clone(&self.inner);
        let mut pending = lock(&self.inner.pending);
        if let Some(previous) = pending.take() {
            previous.abort();
        }

        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(inner.debounce).await;

            // No await between here and the spawn: once the timer has fired,
            // a later `set_query` can no longer cancel this search.
            let query = effective_query(&text, &inner.fallback_query);
            let tag = inner.issue();
            tracing::debug!(query = %query, tag, "Debounced search fired");
            let runner = Arc::clone(&inner);
            tokio::spawn(async move {
                runner.run(tag, &query).await;
            });
        }));
    }

    /// Drop a scheduled search that has not fired yet.
    pub fn cancel_pending(&self) {
        if let Some(pending) = lock(&self.inner.pending).take() {
            pending.abort();
        }
    }

    /// Issue one search for `effective_query` and apply the answer unless a
    /// newer request has been issued in the meantime.
    pub async fn fetch_results(&self, effective_query: &str) -> FetchOutcome {
        let tag = self.inner.issue();
        self.inner.run(tag, effective_query).await
    }
}

impl Inner {
    /// Allocate the next request tag; it becomes the only one allowed to apply.
    fn issue(&self) -> u64 {
        let mut latest = lock(&self.latest_tag);
        *latest += 1;
        self.state.send_modify(|state| state.loading = true);
        *latest
    }

    async fn run(&self, tag: u64, query: &str) -> FetchOutcome {
        let result = match tokio::time::timeout(self.request_timeout, self.api.search(query)).await
        {
            Ok(result) => result,
            Err(_) => Err(ApiError::Timeout(self.request_timeout)),
        };
        self.apply(tag, query, result)
    }

    fn apply(
        &self,
        tag: u64,
        query: &str,
        result: Result<Vec<FileRecord>, ApiError>,
    ) -> FetchOutcome {
        // Held while publishing so no newer tag can be issued and applied in between.
        let latest = lock(&self.latest_tag);
        if *latest != tag {
            tracing::debug!(query = %query, tag, latest = *latest, "Discarding stale search response");
            return FetchOutcome::Stale;
        }

        match result {
            Ok(records) => {
                tracing::debug!(query = %query, hits = records.len(), "Search results applied");
                self.state.send_modify(|state| {
                    state.results = records;
                    state.results_for = Some(query.to_string());
                    state.loading = false;
                    state.last_error = None;
                });
                FetchOutcome::Applied
            }
            Err(e) => {
                tracing::error!(query = %query, error = %e, "Error fetching search results");
                self.state.send_modify(|state| {
                    state.loading = false;
                    state.last_error = Some(e.to_string());
                });
                FetchOutcome::Failed
            }
        }
    }
}
