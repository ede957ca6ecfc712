use std::time::Duration;

use serde::Deserialize;

/// CORS configuration
///
/// Defaults are permissive: any origin, credentials allowed, and the proxy
/// control headers accepted and exposed so browsers can use them.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorsConfig {
    /// Attach CORS headers at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Allowed origins (wildcard "*" or explicit list)
    #[serde(default)]
    pub origins: AnyOrArray,
    /// Allowed HTTP methods
    #[serde(default = "default_methods")]
    pub methods: AnyOrArray,
    /// Allowed request headers
    #[serde(default = "default_headers")]
    pub headers: AnyOrArray,
    /// Response headers readable by the browser
    #[serde(default = "default_expose_headers")]
    pub expose_headers: Vec<String>,
    /// Allow credentials (cookies) on cross-origin requests
    #[serde(default = "default_enabled")]
    pub credentials: bool,
    /// Max age for preflight cache in seconds
    #[serde(default)]
    pub max_age: Option<u64>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            origins: AnyOrArray::Any,
            methods: default_methods(),
            headers: default_headers(),
            expose_headers: default_expose_headers(),
            credentials: default_enabled(),
            max_age: None,
        }
    }
}

impl CorsConfig {
    /// Get max age as Duration
    pub fn max_age_duration(&self) -> Option<Duration> {
        self.max_age.map(Duration::from_secs)
    }
}

/// Either a wildcard "*" or explicit list of values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AnyOrArray {
    /// Match any value
    #[default]
    Any,
    /// Explicit list
    List(Vec<String>),
}

impl<'de> Deserialize<'de> for AnyOrArray {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            One(String),
            Many(Vec<String>),
        }

        let values = match Raw::deserialize(deserializer)? {
            Raw::One(value) => vec![value],
            Raw::Many(values) => values,
        };

        if values.iter().any(|v| v == "*") {
            Ok(Self::Any)
        } else {
            Ok(Self::List(values))
        }
    }
}

#[allow(clippy::missing_const_for_fn)]
fn default_enabled() -> bool {
    true
}

fn default_methods() -> AnyOrArray {
    AnyOrArray::List(
        ["GET", "HEAD", "OPTIONS", "POST", "PUT"]
            .into_iter()
            .map(str::to_owned)
            .collect(),
    )
}

fn default_headers() -> AnyOrArray {
    AnyOrArray::List(
        [
            "origin",
            "accept",
            "x-requested-with",
            "content-type",
            "access-control-request-method",
            "access-control-request-headers",
            "grache-expiration",
            "grache-ignore-cookies",
        ]
        .into_iter()
        .map(str::to_owned)
        .collect(),
    )
}

fn default_expose_headers() -> Vec<String> {
    vec!["grache-cache-hit".to_owned()]
}
