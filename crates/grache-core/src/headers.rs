use std::sync::OnceLock;

use http::header::{self, HeaderMap, HeaderName};

/// Response header reporting whether the body came from the cache
pub const CACHE_HIT_HEADER: &str = "grache-cache-hit";

/// Request header that opts out of session-scoped caching
pub const IGNORE_COOKIES_HEADER: &str = "grache-ignore-cookies";

/// Request header that overrides the cache TTL in seconds
pub const EXPIRATION_HEADER: &str = "grache-expiration";

/// Prefix shared by every proxy control header
const CONTROL_HEADER_PREFIX: &str = "grache-";

/// Headers that must never be forwarded to the upstream GraphQL API
static DENY_LIST: OnceLock<[HeaderName; 14]> = OnceLock::new();

/// Get the header deny list
pub fn get_deny_list() -> &'static [HeaderName] {
    DENY_LIST.get_or_init(|| {
        [
            header::ACCEPT_ENCODING,
            header::CONTENT_LENGTH,
            header::CONTENT_TYPE,
            header::CONNECTION,
            HeaderName::from_static("keep-alive"),
            header::PROXY_AUTHENTICATE,
            header::PROXY_AUTHORIZATION,
            header::TE,
            header::TRAILER,
            header::TRANSFER_ENCODING,
            header::UPGRADE,
            header::HOST,
            header::RANGE,
            header::EXPECT,
        ]
    })
}

/// Check if a header name is in the deny list
pub fn is_header_denied(name: &HeaderName) -> bool {
    get_deny_list().contains(name)
}

/// Check if a header is one of the proxy's own control headers
pub fn is_control_header(name: &HeaderName) -> bool {
    name.as_str().starts_with(CONTROL_HEADER_PREFIX)
}

/// Build the header map sent upstream from the inbound request headers
///
/// Transport headers and proxy control headers are dropped. When
/// `strip_cookies` is set the `Cookie` header is dropped as well, so a
/// response cached across sessions was never computed for one of them.
pub fn upstream_request_headers(incoming: &HeaderMap, strip_cookies: bool) -> HeaderMap {
    let mut result = HeaderMap::with_capacity(incoming.len());

    for (name, value) in incoming {
        if is_header_denied(name) || is_control_header(name) {
            continue;
        }
        if strip_cookies && *name == header::COOKIE {
            continue;
        }
        result.append(name.clone(), value.clone());
    }

    result
}

/// Keep only allow-listed headers from an upstream response
pub fn allowed_response_headers(upstream: &HeaderMap, allow: &[HeaderName]) -> HeaderMap {
    let mut result = HeaderMap::new();

    for name in allow {
        for value in upstream.get_all(name) {
            result.append(name.clone(), value.clone());
        }
    }

    result
}

/// Find a cookie value by name across all `Cookie` headers
///
/// The first matching pair wins. Values are returned verbatim, without
/// percent-decoding or unquoting.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().to_owned())
}
