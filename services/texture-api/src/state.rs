//! Application state and shared resources.

use anyhow::Result;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use ingestion::UpstreamGribClient;
use storage::{DiskArtifactStore, InFlightRegistry};

use crate::config::Config;
use crate::metrics::MetricsCollector;
use crate::registry::FetcherRegistry;

/// Shared application state.
pub struct AppState {
    pub registry: FetcherRegistry,
    pub metrics: Arc<MetricsCollector>,
    pub prometheus: Option<PrometheusHandle>,
    pub cancel: CancellationToken,
}

impl AppState {
    /// State with the HTTP upstream and subprocess decoder from `config`.
    pub fn from_config(config: &Config, prometheus: Option<PrometheusHandle>) -> Result<Self> {
        let upstream = UpstreamGribClient::from_config(&config.upstream())?;
        Ok(Self::new(
            DiskArtifactStore::new(&config.cache_dir),
            upstream,
            prometheus,
        ))
    }

    pub fn new(
        store: DiskArtifactStore,
        upstream: UpstreamGribClient,
        prometheus: Option<PrometheusHandle>,
    ) -> Self {
        let cancel = CancellationToken::new();
        let metrics = Arc::new(MetricsCollector::new());
        let registry = FetcherRegistry::new(
            store,
            InFlightRegistry::new(cancel.clone()),
            Arc::new(upstream),
            Arc::clone(&metrics),
        );

        Self {
            registry,
            metrics,
            prometheus,
            cancel,
        }
    }
}
