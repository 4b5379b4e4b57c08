//! Per-product artifact fetching.
//!
//! A request walks `CHECK_CACHE -> HIT -> SERVE` or
//! `CHECK_CACHE -> MISS -> DOWNLOADING -> DECODING -> ENCODING -> WRITING -> SERVE`.
//! Concurrent misses for one build, whichever artifact kind they ask for,
//! share a single build through the in-flight registry. Color ramps carry
//! no grid data and are rendered per request without touching the cache.

use bytes::Bytes;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument};

use forecast_common::params::parse;
use forecast_common::{
    ArtifactKind, CacheKey, FetchParameters, ForecastError, ForecastQuery, ForecastResult, Product,
};
use ingestion::UpstreamGribClient;
use renderer::ColorRamp;
use storage::{BuiltArtifact, DiskArtifactStore, InFlightRegistry};

use crate::metrics::MetricsCollector;

/// Artifact bytes ready to serve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedArtifact {
    pub data: Bytes,
    pub mime_type: &'static str,
}

/// Serves the artifacts of one product.
pub struct ProductFetcher {
    product: Product,
    store: DiskArtifactStore,
    inflight: InFlightRegistry,
    upstream: Arc<UpstreamGribClient>,
    metrics: Arc<MetricsCollector>,
}

impl ProductFetcher {
    pub fn new(
        product: Product,
        store: DiskArtifactStore,
        inflight: InFlightRegistry,
        upstream: Arc<UpstreamGribClient>,
        metrics: Arc<MetricsCollector>,
    ) -> Self {
        Self {
            product,
            store,
            inflight,
            upstream,
            metrics,
        }
    }

    pub fn product(&self) -> Product {
        self.product
    }

    /// Fetch the `kind` artifact for `query`.
    #[instrument(skip(self, query, kind), fields(product = %self.product, kind = kind.extension()))]
    pub async fn fetch(
        &self,
        query: &ForecastQuery,
        kind: ArtifactKind,
    ) -> ForecastResult<FetchedArtifact> {
        let data = match (self.product, kind) {
            (Product::ColorRamp, ArtifactKind::Png) => self.render_ramp(query).await?,
            (Product::Wind | Product::Cloud, _) => self.fetch_cached(query, kind).await?,
            (product, kind) => {
                return Err(ForecastError::UnsupportedArtifact {
                    product: product.id().to_string(),
                    extension: kind.extension().to_string(),
                })
            }
        };

        Ok(FetchedArtifact {
            data,
            mime_type: kind.mime_type(),
        })
    }

    async fn render_ramp(&self, query: &ForecastQuery) -> ForecastResult<Bytes> {
        let colors = query.colors.clone();
        let png = tokio::task::spawn_blocking(move || {
            ColorRamp::from_query(colors.as_deref()).to_png()
        })
        .await
        .map_err(|e| ForecastError::Internal(format!("ramp task failed: {}", e)))??;
        Ok(Bytes::from(png))
    }

    async fn fetch_cached(&self, query: &ForecastQuery, kind: ArtifactKind) -> ForecastResult<Bytes> {
        let params = parse(query, self.product);
        let key = CacheKey::new(&params, self.product.prefix(), kind);

        if self.store.exists(&key).await {
            debug!(key = %key, state = "hit", "Serving cached artifact");
            self.metrics.record_cache_hit();
            return self.store.read(&key).await;
        }

        debug!(key = %key, state = "miss", "Cache miss");
        self.metrics.record_cache_miss();

        // PNG and JSON come from one build, registered under the PNG key
        let build_key = key.with_kind(ArtifactKind::Png);
        let store = self.store.clone();
        let upstream = Arc::clone(&self.upstream);
        let metrics = Arc::clone(&self.metrics);
        let product = self.product;
        let png_key = build_key.clone();

        let png = self
            .inflight
            .load(build_key, move || async move {
                store
                    .read_or_build(&png_key, || {
                        build_artifacts(product, params, upstream, metrics)
                    })
                    .await
            })
            .await?;

        match kind {
            ArtifactKind::Png => Ok(png),
            ArtifactKind::Json => self.store.read(&key).await,
        }
    }
}

/// Download, decode and encode every artifact of one build.
async fn build_artifacts(
    product: Product,
    params: FetchParameters,
    upstream: Arc<UpstreamGribClient>,
    metrics: Arc<MetricsCollector>,
) -> ForecastResult<Vec<BuiltArtifact>> {
    let started = Instant::now();
    let result = encode_build(product, params, &upstream, &metrics).await;
    metrics.record_build(started.elapsed(), result.is_ok());
    result
}

async fn encode_build(
    product: Product,
    params: FetchParameters,
    upstream: &UpstreamGribClient,
    metrics: &MetricsCollector,
) -> ForecastResult<Vec<BuiltArtifact>> {
    let fields = upstream.fetch_all(&params).await?;
    metrics.record_upstream_fetches(fields.len());

    debug!(state = "encoding", fields = fields.len(), "Encoding artifacts");
    let encoded = tokio::task::spawn_blocking(move || renderer::encode_fields(product, &fields))
        .await
        .map_err(|e| ForecastError::Internal(format!("encode task failed: {}", e)))??;

    Ok(vec![
        BuiltArtifact::new(
            CacheKey::new(&params, product.prefix(), ArtifactKind::Png),
            encoded.png,
        ),
        BuiltArtifact::new(
            CacheKey::new(&params, product.prefix(), ArtifactKind::Json),
            encoded.json,
        ),
    ])
}
