//! Per-request cache controls
//!
//! Clients steer caching with query parameters (`ignoreCookies`,
//! `expiration`) or the matching `grache-*` headers. A header wins over the
//! query parameter; a value that does not parse is ignored and resolution
//! falls through to the next source.

use grache_core::{EXPIRATION_HEADER, IGNORE_COOKIES_HEADER};
use http::HeaderMap;
use serde::Deserialize;

/// Raw query parameters, kept as strings so bad values never reject the request
#[derive(Debug, Default, Deserialize)]
pub struct OverrideParams {
    #[serde(rename = "ignoreCookies")]
    pub ignore_cookies: Option<String>,
    pub expiration: Option<String>,
}

/// Resolved per-request overrides
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestOverrides {
    /// Leave the session out of the fingerprint and drop `Cookie` upstream
    pub ignore_cookies: bool,
    /// TTL in seconds; `None` means use the configured default
    pub ttl_seconds: Option<u64>,
}

impl RequestOverrides {
    pub fn resolve(headers: &HeaderMap, params: &OverrideParams) -> Self {
        let ignore_cookies = header_str(headers, IGNORE_COOKIES_HEADER)
            .and_then(parse_bool)
            .or_else(|| params.ignore_cookies.as_deref().and_then(parse_bool))
            .unwrap_or(false);

        let ttl_seconds = header_str(headers, EXPIRATION_HEADER)
            .and_then(parse_seconds)
            .or_else(|| params.expiration.as_deref().and_then(parse_seconds));

        Self {
            ignore_cookies,
            ttl_seconds,
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Boolean spellings accepted by `ignoreCookies`
fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

fn parse_seconds(value: &str) -> Option<u64> {
    value.parse().ok()
}
