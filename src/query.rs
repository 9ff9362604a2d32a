//! Query State
//!
//! Async fetch state for a single piece of data: the last successful value,
//! the last error and an in-flight flag, published through a `watch`
//! channel. Each fetch carries a generation number; a response is applied
//! only if no newer fetch has started since, so a slow early call can never
//! overwrite the result of a later one. Stale fetches are not cancelled,
//! their results are dropped.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::{ApiError, ApiResult};

pub type QueryFuture<T> = Pin<Box<dyn Future<Output = ApiResult<T>> + Send + 'static>>;

type Fetcher<T> = Arc<dyn Fn(String) -> QueryFuture<T> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// Never fetched
    Idle,
    Loading,
    Success,
    Failure,
}

/// Observable state of a query
///
/// Data survives both a reload and a failed fetch; `error` is cleared when a
/// new fetch starts.
#[derive(Debug, Clone)]
pub struct QuerySnapshot<T> {
    pub data: Option<T>,
    pub error: Option<ApiError>,
    pub is_loading: bool,
    pub status: QueryStatus,
}

impl<T> QuerySnapshot<T> {
    fn idle() -> Self {
        Self {
            data: None,
            error: None,
            is_loading: false,
            status: QueryStatus::Idle,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct QueryOptions {
    /// Fail a fetch with `ApiError::Timeout` when it runs longer than this
    pub timeout: Option<Duration>,
}

struct QueryInner<T> {
    key: Mutex<String>,
    fetcher: Fetcher<T>,
    generation: AtomicU64,
    options: QueryOptions,
    state: watch::Sender<QuerySnapshot<T>>,
}

/// Handle to a keyed fetch. Clones share the same state.
pub struct Query<T> {
    inner: Arc<QueryInner<T>>,
}

impl<T> Clone for Query<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Query<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create an idle query; nothing is fetched until `mount`
    pub fn new<F, Fut>(key: impl Into<String>, fetcher: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ApiResult<T>> + Send + 'static,
    {
        Self::with_options(key, fetcher, QueryOptions::default())
    }

    pub fn with_options<F, Fut>(key: impl Into<String>, fetcher: F, options: QueryOptions) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ApiResult<T>> + Send + 'static,
    {
        let fetcher: Fetcher<T> = Arc::new(move |key| Box::pin(fetcher(key)) as QueryFuture<T>);
        let (state, _) = watch::channel(QuerySnapshot::idle());
        Self {
            inner: Arc::new(QueryInner {
                key: Mutex::new(key.into()),
                fetcher,
                generation: AtomicU64::new(0),
                options,
                state,
            }),
        }
    }

    /// First fetch
    pub fn mount(&self) -> JoinHandle<()> {
        self.refetch()
    }

    /// Start a new fetch for the current key
    ///
    /// The returned handle completes once the response was applied or
    /// discarded; awaiting it is optional.
    pub fn refetch(&self) -> JoinHandle<()> {
        let key = self.key();
        let mut generation = 0;
        // Bumped under the channel lock so no response settles between the
        // bump and the switch to Loading
        self.inner.state.send_modify(|state| {
            generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
            state.is_loading = true;
            state.error = None;
            state.status = QueryStatus::Loading;
        });

        tracing::debug!(key = %key, generation, "query fetch started");
        let fetch = (self.inner.fetcher)(key);
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move { inner.settle(generation, fetch).await })
    }

    /// Switch to a new key and fetch it; no-op when the key is unchanged
    pub fn set_key(&self, key: impl Into<String>) -> Option<JoinHandle<()>> {
        let key = key.into();
        {
            let mut current = lock_key(&self.inner.key);
            if *current == key {
                return None;
            }
            *current = key;
        }
        Some(self.refetch())
    }

    pub fn key(&self) -> String {
        lock_key(&self.inner.key).clone()
    }

    pub fn snapshot(&self) -> QuerySnapshot<T> {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<QuerySnapshot<T>> {
        self.inner.state.subscribe()
    }

    pub fn data(&self) -> Option<T> {
        self.inner.state.borrow().data.clone()
    }

    pub fn error(&self) -> Option<ApiError> {
        self.inner.state.borrow().error.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().is_loading
    }

    pub fn status(&self) -> QueryStatus {
        self.inner.state.borrow().status
    }

    /// Wait until no fetch is in flight and return the state at that point
    pub async fn settled(&self) -> QuerySnapshot<T> {
        let mut receiver = self.subscribe();
        let settled = match receiver.wait_for(|state| !state.is_loading).await {
            Ok(state) => state.clone(),
            Err(_) => self.snapshot(),
        };
        settled
    }
}

impl<T> QueryInner<T> {
    async fn settle(&self, generation: u64, fetch: QueryFuture<T>) {
        let outcome = match self.options.timeout {
            Some(limit) => match tokio::time::timeout(limit, fetch).await {
                Ok(outcome) => outcome,
                Err(_) => Err(ApiError::Timeout(limit)),
            },
            None => fetch.await,
        };

        let applied = self.state.send_if_modified(|state| {
            // Checked under the channel lock so a concurrent refetch either
            // sees this result applied or supersedes it.
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            state.is_loading = false;
            match outcome {
                Ok(data) => {
                    state.data = Some(data);
                    state.error = None;
                    state.status = QueryStatus::Success;
                }
                Err(err) => {
                    tracing::warn!(error = %err, "query fetch failed");
                    state.error = Some(err);
                    state.status = QueryStatus::Failure;
                }
            }
            true
        });

        if !applied {
            tracing::debug!(generation, "discarded stale query response");
        }
    }
}

fn lock_key(key: &Mutex<String>) -> std::sync::MutexGuard<'_, String> {
    // A poisoned key still holds a valid string
    key.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests;
