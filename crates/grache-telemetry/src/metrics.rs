//! Metric names and the cache instruments recorded by the request path

use std::time::Duration;

use opentelemetry::{
    KeyValue, global,
    metrics::{Counter, Histogram},
};

pub const CACHE_LOOKUP: &str = "grache.cache.lookup";
pub const CACHE_STORE: &str = "grache.cache.store";
pub const UPSTREAM_DURATION: &str = "grache.upstream.duration";

/// Instruments for cache outcomes and upstream latency
///
/// Cheap to clone. Without an installed meter provider every recording is a
/// no-op.
#[derive(Clone)]
pub struct CacheMetrics {
    lookups: Counter<u64>,
    stores: Counter<u64>,
    upstream_duration: Histogram<f64>,
}

impl CacheMetrics {
    pub fn new() -> Self {
        let meter = global::meter("grache");

        Self {
            lookups: meter
                .u64_counter(CACHE_LOOKUP)
                .with_description("Cache lookups by outcome")
                .build(),
            stores: meter
                .u64_counter(CACHE_STORE)
                .with_description("Cache writes by result")
                .build(),
            upstream_duration: meter
                .f64_histogram(UPSTREAM_DURATION)
                .with_description("Time spent waiting on the upstream GraphQL API")
                .with_unit("s")
                .build(),
        }
    }

    /// Count one lookup; `outcome` is `hit`, `miss`, `bypass` or `error`
    pub fn record_lookup(&self, outcome: &'static str) {
        self.lookups.add(1, &[KeyValue::new("outcome", outcome)]);
    }

    /// Count one cache write; `result` is `stored`, `skipped` or `error`
    pub fn record_store(&self, result: &'static str) {
        self.stores.add(1, &[KeyValue::new("result", result)]);
    }

    pub fn record_upstream(&self, elapsed: Duration, status: Option<u16>) {
        let status = status.map_or_else(|| "error".to_owned(), |code| code.to_string());
        self.upstream_duration
            .record(elapsed.as_secs_f64(), &[KeyValue::new("http.response.status_code", status)]);
    }
}

impl Default for CacheMetrics {
    fn default() -> Self {
        Self::new()
    }
}
