#![allow(clippy::must_use_candidate)]

//! Upstream forwarding for the GraphQL caching proxy
//!
//! Sends the client's request body to the backend GraphQL API and returns
//! the decoded response. Compressed upstream bodies are inflated by the HTTP
//! client, so callers always see raw bytes.

mod error;

use std::time::{Duration, Instant};

use bytes::Bytes;
use grache_core::allowed_response_headers;
use http::StatusCode;
use http::header::{self, HeaderMap, HeaderName, HeaderValue};
use url::Url;

pub use error::ProxyError;

/// Response received from the backend
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    /// Allow-listed response headers only
    pub headers: HeaderMap,
    /// Decoded body
    pub body: Bytes,
    /// Time from sending the request to receiving the full body
    pub elapsed: Duration,
}

/// Client for the backend GraphQL API
///
/// Built once at startup and shared; the inner HTTP client pools connections.
#[derive(Clone)]
pub struct Forwarder {
    client: reqwest::Client,
    url: Url,
    response_headers: Vec<HeaderName>,
}

impl Forwarder {
    /// Create a forwarder for `url`
    ///
    /// `timeout` bounds the whole exchange, body included.
    /// `response_headers` lists the upstream headers passed back to clients.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new(url: Url, timeout: Duration, response_headers: Vec<HeaderName>) -> Result<Self, ProxyError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .build()
            .map_err(|e| ProxyError::Client(e.to_string()))?;

        Ok(Self {
            client,
            url,
            response_headers,
        })
    }

    /// POST `body` to the backend
    ///
    /// `headers` should already be filtered for forwarding; the content type
    /// is always set to JSON. Non-2xx statuses are not errors here, they are
    /// returned to the caller like any other response.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::Timeout`] when the backend does not answer in
    /// time, [`ProxyError::Connect`] when it cannot be reached, and
    /// [`ProxyError::Transport`] for any other transport failure
    pub async fn forward(&self, headers: HeaderMap, body: Bytes) -> Result<UpstreamResponse, ProxyError> {
        let start = Instant::now();

        let response = self
            .client
            .post(self.url.clone())
            .headers(headers)
            .header(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(body)
            .send()
            .await
            .map_err(ProxyError::from_reqwest)?;

        let status = response.status();
        let headers = allowed_response_headers(response.headers(), &self.response_headers);
        let body = response.bytes().await.map_err(ProxyError::from_reqwest)?;
        let elapsed = start.elapsed();

        tracing::debug!(
            url = %self.url,
            status = status.as_u16(),
            bytes = body.len(),
            elapsed_ms = elapsed.as_millis(),
            "upstream responded"
        );

        Ok(UpstreamResponse {
            status,
            headers,
            body,
            elapsed,
        })
    }
}
