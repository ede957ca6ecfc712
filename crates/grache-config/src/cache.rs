use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use url::Url;

/// Where cached responses are kept
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheBackend {
    /// Redis or Valkey
    #[default]
    Redis,
    /// Process-local map, lost on restart
    Memory,
}

/// Response cache configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    #[serde(default)]
    pub backend: CacheBackend,
    /// Full connection URL; takes precedence over host/password/db
    #[serde(default)]
    pub url: Option<Url>,
    /// Redis `host:port`
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default)]
    pub password: Option<SecretString>,
    /// Redis logical database index
    #[serde(default)]
    pub db: u32,
    /// Bound on each store GET/SET; a slow store counts as a miss
    #[serde(default = "default_timeout", deserialize_with = "crate::duration::deserialize")]
    pub timeout: Duration,
    /// TTL applied when a request does not override it
    #[serde(default = "default_ttl_seconds")]
    pub default_ttl_seconds: u64,
    /// Cookie whose value scopes cached responses to a session
    #[serde(default = "default_session_cookie")]
    pub session_cookie: String,
    /// Entry bound for the memory backend
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::default(),
            url: None,
            host: default_host(),
            password: None,
            db: 0,
            timeout: default_timeout(),
            default_ttl_seconds: default_ttl_seconds(),
            session_cookie: default_session_cookie(),
            max_entries: default_max_entries(),
        }
    }
}

impl CacheConfig {
    /// Default TTL as a Duration
    pub const fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_seconds)
    }

    /// Connection URL for the Redis backend
    ///
    /// # Errors
    ///
    /// Returns an error if `host` does not form a valid URL or the password
    /// cannot be attached to it
    pub fn redis_url(&self) -> anyhow::Result<Url> {
        if let Some(url) = &self.url {
            return Ok(url.clone());
        }

        let mut url = Url::parse(&format!("redis://{}/{}", self.host, self.db))
            .map_err(|e| anyhow::anyhow!("invalid cache.host '{}': {e}", self.host))?;

        if let Some(password) = &self.password
            && !password.expose_secret().is_empty()
        {
            url.set_password(Some(password.expose_secret()))
                .map_err(|()| anyhow::anyhow!("cannot set password on cache URL"))?;
        }

        Ok(url)
    }
}

fn default_host() -> String {
    "127.0.0.1:6379".to_owned()
}

const fn default_timeout() -> Duration {
    Duration::from_secs(2)
}

#[allow(clippy::missing_const_for_fn)]
fn default_ttl_seconds() -> u64 {
    600
}

fn default_session_cookie() -> String {
    "session".to_owned()
}

const fn default_max_entries() -> u64 {
    10_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_url() {
        let url = CacheConfig::default().redis_url().unwrap();
        assert_eq!(url.as_str(), "redis://127.0.0.1:6379/0");
    }

    #[test]
    fn url_with_password_and_db() {
        let config = CacheConfig {
            host: "cache.internal:6380".to_owned(),
            password: Some(SecretString::from("p@ss word")),
            db: 3,
            ..CacheConfig::default()
        };

        let url = config.redis_url().unwrap();

        assert_eq!(url.host_str(), Some("cache.internal"));
        assert_eq!(url.port(), Some(6380));
        assert_eq!(url.path(), "/3");
        assert_eq!(url.password(), Some("p%40ss%20word"));
    }

    #[test]
    fn empty_password_is_ignored() {
        let config = CacheConfig {
            password: Some(SecretString::from("")),
            ..CacheConfig::default()
        };

        assert_eq!(config.redis_url().unwrap().password(), None);
    }

    #[test]
    fn explicit_url_wins() {
        let config = CacheConfig {
            url: Some(Url::parse("rediss://valkey.example:6379/1").unwrap()),
            host: "ignored:1".to_owned(),
            ..CacheConfig::default()
        };

        assert_eq!(config.redis_url().unwrap().as_str(), "rediss://valkey.example:6379/1");
    }
}
