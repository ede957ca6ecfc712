//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;
use std::time::Duration;

use grache_config::{CacheBackend, CacheConfig, Config, CorsConfig, ServerConfig, UpstreamConfig};

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Minimal config proxying to `upstream_url` with an in-memory cache
    pub fn new(upstream_url: &str) -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: SocketAddr::from(([127, 0, 0, 1], 0)),
                    ..ServerConfig::default()
                },
                upstream: UpstreamConfig {
                    url: upstream_url.parse().expect("valid URL"),
                    ..UpstreamConfig::default()
                },
                cache: CacheConfig {
                    backend: CacheBackend::Memory,
                    ..CacheConfig::default()
                },
                ..Config::default()
            },
        }
    }

    pub fn with_path(mut self, path: &str) -> Self {
        path.clone_into(&mut self.config.server.path);
        self
    }

    pub fn with_default_ttl(mut self, seconds: u64) -> Self {
        self.config.cache.default_ttl_seconds = seconds;
        self
    }

    pub fn with_upstream_timeout(mut self, timeout: Duration) -> Self {
        self.config.upstream.timeout = timeout;
        self
    }

    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.config.cache.timeout = timeout;
        self
    }

    pub fn with_response_headers(mut self, headers: &[&str]) -> Self {
        self.config.upstream.response_headers = headers.iter().map(|&h| h.to_owned()).collect();
        self
    }

    pub fn with_session_cookie(mut self, name: &str) -> Self {
        name.clone_into(&mut self.config.cache.session_cookie);
        self
    }

    pub fn with_cors(mut self, config: CorsConfig) -> Self {
        self.config.server.cors = config;
        self
    }

    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    pub fn without_compression(mut self) -> Self {
        self.config.server.compression = false;
        self
    }

    /// Build the final config, validated like a loaded file would be
    pub fn build(self) -> Config {
        self.config.validate().expect("valid test config");
        self.config
    }
}
