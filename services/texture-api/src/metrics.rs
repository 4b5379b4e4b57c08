//! Service metrics.
//!
//! Counters are mirrored into the `metrics` facade (scraped at `/metrics`)
//! and kept locally for `/serverInfo`.

use metrics::{counter, histogram};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Metrics collector for the texture API.
#[derive(Debug)]
pub struct MetricsCollector {
    pub cache_hits: AtomicU64,
    pub cache_misses: AtomicU64,
    pub builds: AtomicU64,
    pub build_failures: AtomicU64,
    pub upstream_fetches: AtomicU64,
    start_time: Instant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub builds: u64,
    pub build_failures: u64,
    pub upstream_fetches: u64,
    pub uptime_secs: u64,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            cache_hits: AtomicU64::new(0),
            cache_misses: AtomicU64::new(0),
            builds: AtomicU64::new(0),
            build_failures: AtomicU64::new(0),
            upstream_fetches: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
        counter!("artifact_cache_hits_total").increment(1);
    }

    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
        counter!("artifact_cache_misses_total").increment(1);
    }

    /// Record a finished build, successful or not
    pub fn record_build(&self, duration: Duration, success: bool) {
        self.builds.fetch_add(1, Ordering::Relaxed);
        counter!("artifact_builds_total").increment(1);
        if !success {
            self.build_failures.fetch_add(1, Ordering::Relaxed);
            counter!("artifact_build_failures_total").increment(1);
        }
        histogram!("artifact_build_duration_ms").record(duration.as_secs_f64() * 1000.0);
    }

    pub fn record_upstream_fetches(&self, count: usize) {
        self.upstream_fetches.fetch_add(count as u64, Ordering::Relaxed);
        counter!("upstream_fetches_total").increment(count as u64);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            builds: self.builds.load(Ordering::Relaxed),
            build_failures: self.build_failures.load(Ordering::Relaxed),
            upstream_fetches: self.upstream_fetches.load(Ordering::Relaxed),
            uptime_secs: self.start_time.elapsed().as_secs(),
        }
    }
}
