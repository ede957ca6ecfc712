use std::path::Path;

use crate::{CacheBackend, Config};

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::from_toml(&raw)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing or validation fails
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid setting
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_server()?;
        self.validate_upstream()?;
        self.validate_cache()?;
        Ok(())
    }

    fn validate_server(&self) -> anyhow::Result<()> {
        if !self.server.path.starts_with('/') {
            anyhow::bail!("server.path must start with '/': `{}`", self.server.path);
        }

        if self.server.health.enabled {
            if !self.server.health.path.starts_with('/') {
                anyhow::bail!("server.health.path must start with '/': `{}`", self.server.health.path);
            }

            if self.server.health.path == self.server.path {
                anyhow::bail!("server.health.path must differ from server.path");
            }
        }

        Ok(())
    }

    fn validate_upstream(&self) -> anyhow::Result<()> {
        let scheme = self.upstream.url.scheme();
        if scheme != "http" && scheme != "https" {
            anyhow::bail!("upstream.url must be http or https, got `{scheme}`");
        }

        if self.upstream.timeout.is_zero() {
            anyhow::bail!("upstream.timeout must be greater than 0");
        }

        self.upstream.response_header_names()?;

        Ok(())
    }

    fn validate_cache(&self) -> anyhow::Result<()> {
        if self.cache.default_ttl_seconds == 0 {
            anyhow::bail!("cache.default_ttl_seconds must be greater than 0; send expiration=0 per request to skip storing");
        }

        if self.cache.timeout.is_zero() {
            anyhow::bail!("cache.timeout must be greater than 0");
        }

        if self.cache.max_entries == 0 {
            anyhow::bail!("cache.max_entries must be greater than 0");
        }

        if self.cache.session_cookie.trim().is_empty() {
            anyhow::bail!("cache.session_cookie must not be empty");
        }

        if self.cache.backend == CacheBackend::Redis {
            self.cache.redis_url()?;
        }

        Ok(())
    }
}
