use std::time::Duration;

use http::HeaderName;
use serde::Deserialize;
use url::Url;

/// Backend used when nothing else is configured
pub const DEFAULT_UPSTREAM_URL: &str = "http://127.0.0.1:3000/shop-api";

/// Backend GraphQL API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpstreamConfig {
    /// Full URL of the backend GraphQL endpoint
    #[serde(default = "default_url")]
    pub url: Url,
    /// Bound on a whole upstream exchange
    #[serde(default = "default_timeout", deserialize_with = "crate::duration::deserialize")]
    pub timeout: Duration,
    /// Upstream response headers passed back on forwarded responses
    #[serde(default = "default_response_headers")]
    pub response_headers: Vec<String>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout: default_timeout(),
            response_headers: default_response_headers(),
        }
    }
}

impl UpstreamConfig {
    /// Parse the response header allow-list
    ///
    /// # Errors
    ///
    /// Returns an error naming the first entry that is not a valid header name
    pub fn response_header_names(&self) -> anyhow::Result<Vec<HeaderName>> {
        self.response_headers
            .iter()
            .map(|name| {
                HeaderName::try_from(name.as_str())
                    .map_err(|e| anyhow::anyhow!("invalid upstream.response_headers entry '{name}': {e}"))
            })
            .collect()
    }
}

fn default_url() -> Url {
    Url::parse(DEFAULT_UPSTREAM_URL).expect("valid default URL")
}

const fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_response_headers() -> Vec<String> {
    vec!["set-cookie".to_owned()]
}
