#![allow(clippy::must_use_candidate)]

pub mod cache;
pub mod cors;
mod duration;
mod env;
pub mod health;
mod loader;
pub mod server;
pub mod telemetry;
pub mod upstream;

use serde::Deserialize;

pub use cache::*;
pub use cors::*;
pub use health::*;
pub use server::*;
pub use telemetry::{LogFormat, TelemetryConfig};
pub use upstream::*;

/// Top-level Grache configuration
///
/// Every section has defaults, so an empty file (or no file) yields a
/// proxy on port 3333 in front of `http://127.0.0.1:3000/shop-api`, caching
/// in Redis at `127.0.0.1:6379`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Listener and HTTP surface
    #[serde(default)]
    pub server: ServerConfig,
    /// Backend GraphQL API
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// Response cache
    #[serde(default)]
    pub cache: CacheConfig,
    /// Logging, tracing and metrics
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}
