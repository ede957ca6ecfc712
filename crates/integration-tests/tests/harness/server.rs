//! Test server wrapper that starts Grache on a random port

use std::net::SocketAddr;
use std::sync::Arc;

use grache_cache::{CacheStore, MemoryStore};
use grache_config::Config;
use grache_server::Server;
use tokio_util::sync::CancellationToken;

/// A running test server instance
pub struct TestServer {
    addr: SocketAddr,
    shutdown: CancellationToken,
    client: reqwest::Client,
    path: String,
}

impl TestServer {
    /// Start a test server backed by a fresh in-memory store
    pub async fn start(config: Config) -> anyhow::Result<Self> {
        Self::start_with_store(config, Arc::new(MemoryStore::new())).await
    }

    /// Start a test server around the given cache store
    ///
    /// Binds to port 0 for automatic port assignment
    pub async fn start_with_store(config: Config, store: Arc<dyn CacheStore>) -> anyhow::Result<Self> {
        let path = config.server.path.clone();
        let server = Server::with_cache_store(&config, store)?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        // Bind the listener here so we know the actual port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        tokio::spawn(async move {
            axum::serve(listener, server.into_router())
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        let client = reqwest::Client::new();

        Ok(Self {
            addr,
            shutdown,
            client,
            path,
        })
    }

    /// URL of `path` on the running test server
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// URL of the GraphQL endpoint
    pub fn graphql_url(&self) -> String {
        self.url(&self.path)
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Start a POST of `body` to the GraphQL endpoint
    pub fn graphql(&self, body: &str) -> reqwest::RequestBuilder {
        self.client
            .post(self.graphql_url())
            .header("content-type", "application/json")
            .body(body.to_owned())
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
