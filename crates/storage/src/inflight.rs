//! Deduplication of concurrent builds.
//!
//! The first request for a cache key spawns the build as a detached task and
//! registers a shared handle to its result. Requests arriving while it runs
//! await that handle instead of starting their own build. The task removes
//! its registration when it finishes, successfully, with an error or by
//! panicking.

use bytes::Bytes;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use forecast_common::{CacheKey, ForecastError, ForecastResult};

type SharedBuild = Shared<BoxFuture<'static, ForecastResult<Bytes>>>;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RegistryStats {
    /// Builds actually started
    pub started: u64,
    /// Requests that joined a build already in flight
    pub joined: u64,
    pub failed: u64,
}

#[derive(Debug, Default)]
struct Counters {
    started: AtomicU64,
    joined: AtomicU64,
    failed: AtomicU64,
}

/// Registry of builds currently in progress, keyed by cache key.
#[derive(Clone)]
pub struct InFlightRegistry {
    builds: Arc<Mutex<HashMap<CacheKey, SharedBuild>>>,
    cancel: CancellationToken,
    counters: Arc<Counters>,
}

impl Default for InFlightRegistry {
    fn default() -> Self {
        Self::new(CancellationToken::new())
    }
}

impl InFlightRegistry {
    /// Registry whose pending builds resolve to `Cancelled` once `cancel`
    /// fires.
    pub fn new(cancel: CancellationToken) -> Self {
        Self {
            builds: Arc::new(Mutex::new(HashMap::new())),
            cancel,
            counters: Arc::new(Counters::default()),
        }
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Result of the build for `key`, starting one with `build` if none is in
    /// flight.
    ///
    /// `build` is only invoked when this call starts the build. Every caller
    /// sharing a build receives the same bytes or the same error. Dropping
    /// the returned future does not abort the build.
    pub async fn load<F, Fut>(&self, key: CacheKey, build: F) -> ForecastResult<Bytes>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ForecastResult<Bytes>> + Send + 'static,
    {
        if self.cancel.is_cancelled() {
            return Err(ForecastError::Cancelled);
        }

        let shared = {
            let mut builds = self.builds.lock().await;
            match builds.get(&key) {
                Some(existing) => {
                    self.counters.joined.fetch_add(1, Ordering::Relaxed);
                    debug!(key = %key, "Joining in-flight build");
                    existing.clone()
                }
                None => {
                    self.counters.started.fetch_add(1, Ordering::Relaxed);
                    debug!(key = %key, "Starting build");
                    let shared = self.spawn_build(key.clone(), build());
                    builds.insert(key, shared.clone());
                    shared
                }
            }
        };

        shared.await
    }

    /// Spawn `build` as a detached task. Must be called with the map locked
    /// so the task cannot deregister before it is registered.
    fn spawn_build<Fut>(&self, key: CacheKey, build: Fut) -> SharedBuild
    where
        Fut: Future<Output = ForecastResult<Bytes>> + Send + 'static,
    {
        let builds = Arc::clone(&self.builds);
        let counters = Arc::clone(&self.counters);
        let cancel = self.cancel.clone();

        let handle = tokio::spawn(async move {
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(ForecastError::Cancelled),
                outcome = AssertUnwindSafe(build).catch_unwind() => {
                    outcome.unwrap_or_else(|panic| Err(panic_error(panic)))
                }
            };

            if let Err(e) = &result {
                counters.failed.fetch_add(1, Ordering::Relaxed);
                warn!(key = %key, error = %e, "Build failed");
            }

            builds.lock().await.remove(&key);
            result
        });

        async move {
            handle
                .await
                .unwrap_or_else(|e| Err(ForecastError::Internal(format!("build task failed: {}", e))))
        }
        .boxed()
        .shared()
    }

    /// Number of builds currently running.
    pub async fn in_flight(&self) -> usize {
        self.builds.lock().await.len()
    }

    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            started: self.counters.started.load(Ordering::Relaxed),
            joined: self.counters.joined.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
        }
    }
}

fn panic_error(panic: Box<dyn Any + Send>) -> ForecastError {
    let message = panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    ForecastError::Internal(format!("build panicked: {}", message))
}
