//! HTTP surface of the caching proxy
//!
//! One GraphQL endpoint backed by the response cache and the upstream
//! forwarder, plus an optional health check.

#![allow(clippy::must_use_candidate)]

mod cors;
mod error;
mod handler;
mod health;
mod overrides;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use grache_cache::{CacheStore, MemoryStore, RedisStore, ResponseCache};
use grache_config::{CacheBackend, Config};
use grache_proxy::Forwarder;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

pub use overrides::{OverrideParams, RequestOverrides};
pub use state::GraphqlState;

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration, opening the configured cache backend
    ///
    /// The Redis connection is made on first use, so an unreachable store
    /// does not fail startup.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache URL is invalid or the HTTP client cannot
    /// be built
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let store: Arc<dyn CacheStore> = match config.cache.backend {
            CacheBackend::Redis => Arc::new(RedisStore::new(config.cache.redis_url()?.as_str())?),
            CacheBackend::Memory => Arc::new(MemoryStore::with_capacity(config.cache.max_entries)),
        };

        tracing::info!(backend = ?config.cache.backend, "cache store configured");

        Self::with_cache_store(config, store)
    }

    /// Build the server around an existing cache store
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or a configured
    /// response header name is invalid
    pub fn with_cache_store(config: &Config, store: Arc<dyn CacheStore>) -> anyhow::Result<Self> {
        let forwarder = Forwarder::new(
            config.upstream.url.clone(),
            config.upstream.timeout,
            config.upstream.response_header_names()?,
        )?;

        let state = GraphqlState::new(
            forwarder,
            ResponseCache::new(store, config.cache.timeout),
            config.cache.default_ttl(),
            config.cache.session_cookie.clone(),
        );

        let graphql = post(handler::graphql_handler)
            .options(handler::preflight_handler)
            .fallback(handler::unsupported_method);

        let mut app = Router::new().route(&config.server.path, graphql).with_state(state);

        if config.server.health.enabled {
            app = app.route(&config.server.health.path, get(health::health_handler));
        }

        // Apply middleware layers (innermost first)

        if config.server.compression {
            app = app.layer(CompressionLayer::new());
        }

        app = app.layer(TraceLayer::new_for_http());

        if config.server.cors.enabled {
            app = app.layer(cors::cors_layer(&config.server.cors));
        }

        tracing::info!(
            path = %config.server.path,
            upstream = %config.upstream.url,
            default_ttl_secs = config.cache.default_ttl_seconds,
            "graphql endpoint configured"
        );

        Ok(Self {
            router: app,
            listen_address: config.server.listen_address,
        })
    }

    /// Get the configured listen address
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}
