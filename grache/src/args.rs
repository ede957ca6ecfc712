use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use grache_config::Config;
use secrecy::SecretString;
use url::Url;

/// Grache GraphQL cache
#[derive(Debug, Parser)]
#[command(name = "grache", about = "Caching reverse proxy for GraphQL APIs")]
pub struct Args {
    /// Path to configuration file; built-in defaults apply when omitted
    #[arg(short, long, env = "GRACHE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the listen address
    #[arg(long, env = "GRACHE_LISTEN")]
    pub listen: Option<SocketAddr>,

    /// Override the listen port
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Override the backend GraphQL URL
    #[arg(long, env = "URL")]
    pub url: Option<Url>,

    /// Override the Redis `host:port`
    #[arg(long, env = "REDIS_HOST")]
    pub redis_host: Option<String>,

    /// Override the Redis password
    #[arg(long, env = "REDIS_PASSWORD", hide_env_values = true)]
    pub redis_password: Option<String>,

    /// Override the Redis database index
    #[arg(long, env = "REDIS_DB")]
    pub redis_db: Option<u32>,
}

impl Args {
    /// Load the config file (if any), then apply command line and environment overrides
    pub fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        self.apply(&mut config)?;
        config.validate()?;

        Ok(config)
    }

    fn apply(&self, config: &mut Config) -> anyhow::Result<()> {
        if let Some(port) = self.port {
            config.server.listen_address.set_port(port);
        }

        if let Some(listen) = self.listen {
            config.server.listen_address = listen;
        }

        if let Some(url) = &self.url {
            config.upstream.url = url.clone();
        }

        let redis_override = self.redis_host.is_some() || self.redis_password.is_some() || self.redis_db.is_some();
        if redis_override && let Some(url) = &config.cache.url {
            anyhow::bail!(
                "REDIS_HOST, REDIS_PASSWORD and REDIS_DB cannot override cache.url ({}); remove cache.url or put the change in it",
                url.host_str().unwrap_or_default()
            );
        }

        if let Some(host) = &self.redis_host {
            config.cache.host.clone_from(host);
        }

        if let Some(password) = &self.redis_password {
            config.cache.password = Some(SecretString::from(password.clone()));
        }

        if let Some(db) = self.redis_db {
            config.cache.db = db;
        }

        Ok(())
    }
}
