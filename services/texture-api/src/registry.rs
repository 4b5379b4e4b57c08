//! Product id to fetcher lookup.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use forecast_common::Product;
use ingestion::UpstreamGribClient;
use storage::{DiskArtifactStore, InFlightRegistry, RegistryStats};

use crate::fetcher::ProductFetcher;
use crate::metrics::MetricsCollector;

/// Memoized fetchers sharing one store, one in-flight map and one upstream
/// client.
pub struct FetcherRegistry {
    fetchers: Mutex<HashMap<Product, Arc<ProductFetcher>>>,
    store: DiskArtifactStore,
    inflight: InFlightRegistry,
    upstream: Arc<UpstreamGribClient>,
    metrics: Arc<MetricsCollector>,
}

impl FetcherRegistry {
    pub fn new(
        store: DiskArtifactStore,
        inflight: InFlightRegistry,
        upstream: Arc<UpstreamGribClient>,
        metrics: Arc<MetricsCollector>,
    ) -> Self {
        Self {
            fetchers: Mutex::new(HashMap::new()),
            store,
            inflight,
            upstream,
            metrics,
        }
    }

    /// Fetcher for `id` (`wind`, `cloud` or `colorramp`), or `None` for an
    /// unknown product. Repeated lookups return the same instance.
    pub async fn get(&self, id: &str) -> Option<Arc<ProductFetcher>> {
        let product = Product::from_id(id)?;

        let mut fetchers = self.fetchers.lock().await;
        let fetcher = fetchers.entry(product).or_insert_with(|| {
            debug!(product = %product, "Creating fetcher");
            Arc::new(ProductFetcher::new(
                product,
                self.store.clone(),
                self.inflight.clone(),
                Arc::clone(&self.upstream),
                Arc::clone(&self.metrics),
            ))
        });
        Some(Arc::clone(fetcher))
    }

    pub fn store(&self) -> &DiskArtifactStore {
        &self.store
    }

    /// Builds currently running across all products.
    pub async fn in_flight(&self) -> usize {
        self.inflight.in_flight().await
    }

    pub fn stats(&self) -> RegistryStats {
        self.inflight.stats()
    }
}
