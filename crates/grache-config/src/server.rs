use std::net::SocketAddr;

use serde::Deserialize;

use crate::{cors::CorsConfig, health::HealthConfig};

/// Default listen port
pub const DEFAULT_PORT: u16 = 3333;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_listen_address")]
    pub listen_address: SocketAddr,
    /// Path of the GraphQL endpoint
    #[serde(default = "default_path")]
    pub path: String,
    /// Compress responses for clients that accept it
    #[serde(default = "default_compression")]
    pub compression: bool,
    #[serde(default)]
    pub health: HealthConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: default_listen_address(),
            path: default_path(),
            compression: default_compression(),
            health: HealthConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

fn default_listen_address() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT))
}

fn default_path() -> String {
    "/".to_owned()
}

#[allow(clippy::missing_const_for_fn)]
fn default_compression() -> bool {
    true
}
