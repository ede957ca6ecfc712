use std::sync::Arc;
use std::time::Duration;

use grache_cache::ResponseCache;
use grache_proxy::Forwarder;
use grache_telemetry::CacheMetrics;

/// Shared state for the GraphQL handler
#[derive(Clone)]
pub struct GraphqlState {
    pub(crate) inner: Arc<GraphqlStateInner>,
}

pub(crate) struct GraphqlStateInner {
    pub(crate) forwarder: Forwarder,
    pub(crate) cache: ResponseCache,
    pub(crate) default_ttl: Duration,
    pub(crate) session_cookie: String,
    pub(crate) metrics: CacheMetrics,
}

impl GraphqlState {
    pub fn new(forwarder: Forwarder, cache: ResponseCache, default_ttl: Duration, session_cookie: String) -> Self {
        Self {
            inner: Arc::new(GraphqlStateInner {
                forwarder,
                cache,
                default_ttl,
                session_cookie,
                metrics: CacheMetrics::new(),
            }),
        }
    }
}
