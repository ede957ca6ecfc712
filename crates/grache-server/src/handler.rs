use std::time::Instant;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use grache_cache::{BypassReason, CacheDecision, CacheEntry, CacheLookup, Fingerprint};
use grache_core::{CACHE_HIT_HEADER, cookie_value, upstream_request_headers};
use grache_graphql::{Classification, RequestEnvelope, classify, parse_request};
use grache_proxy::{ProxyError, UpstreamResponse};
use http::{HeaderMap, HeaderValue, StatusCode, header};

use crate::error::{error_response, plain_text};
use crate::overrides::{OverrideParams, RequestOverrides};
use crate::state::GraphqlState;

/// Serve a GraphQL POST from the cache or the backend
pub async fn graphql_handler(
    State(state): State<GraphqlState>,
    params: Result<Query<OverrideParams>, QueryRejection>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let params = params.map(|Query(params)| params).unwrap_or_default();
    let overrides = RequestOverrides::resolve(&headers, &params);

    let (envelope, bypass) = inspect_body(&body);

    let identity = if overrides.ignore_cookies {
        None
    } else {
        cookie_value(&headers, &state.inner.session_cookie)
    };
    let envelope = envelope.with_identity(identity);

    let decision = CacheDecision::new(bypass, overrides.ttl_seconds, state.inner.default_ttl);
    let fingerprint = Fingerprint::of(&envelope);

    tracing::debug!(
        %fingerprint,
        consult = decision.consult_cache,
        populate = decision.populate_cache,
        ttl_secs = decision.ttl.as_secs(),
        bypass = decision.bypass.map(BypassReason::as_str),
        "cache decision"
    );

    if decision.consult_cache {
        match state.inner.cache.lookup(&fingerprint).await {
            CacheLookup::Hit(cached) => {
                state.inner.metrics.record_lookup("hit");
                return json_response(StatusCode::OK, HeaderMap::new(), Bytes::from(cached), true);
            }
            CacheLookup::Miss => state.inner.metrics.record_lookup("miss"),
            CacheLookup::Unavailable => state.inner.metrics.record_lookup("error"),
        }
    } else {
        state.inner.metrics.record_lookup("bypass");
    }

    let forward_headers = upstream_request_headers(&headers, overrides.ignore_cookies);

    // Runs detached so a client disconnect cannot abort the upstream call or the write after it
    let task = tokio::spawn(forward_and_populate(state, forward_headers, body, fingerprint, decision));

    match task.await {
        Ok(Ok(upstream)) => json_response(upstream.status, upstream.headers, upstream.body, false),
        Ok(Err(e)) => error_response(&e),
        Err(e) => {
            tracing::error!(error = %e, "forwarding task failed");
            plain_text(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
        }
    }
}

/// Answer plain `OPTIONS` requests; CORS preflights are handled by the CORS layer
pub async fn preflight_handler() -> Response {
    json_response(StatusCode::OK, HeaderMap::new(), Bytes::new(), false)
}

pub async fn unsupported_method() -> Response {
    plain_text(StatusCode::BAD_REQUEST, "Only POST method supported")
}

/// Parse and classify the body, deciding whether it must skip the cache
fn inspect_body(body: &[u8]) -> (RequestEnvelope, Option<BypassReason>) {
    let envelope = match parse_request(body) {
        Ok(envelope) => envelope,
        Err(e) => {
            tracing::debug!(error = %e, "malformed request body, bypassing cache");
            return (RequestEnvelope::default(), Some(BypassReason::MalformedBody));
        }
    };

    let classification = classify(&envelope.query);

    for operation in classification.operations() {
        tracing::debug!(
            kind = operation.kind.as_str(),
            name = operation.name.as_deref().unwrap_or("<anonymous>"),
            "handling operation"
        );
    }

    let bypass = match classification {
        Classification::Unparseable(reason) => {
            tracing::debug!(%reason, "unparseable document, bypassing cache");
            Some(BypassReason::UnparseableDocument)
        }
        classification if classification.has_mutation() => Some(BypassReason::Mutation),
        Classification::Operations(_) => None,
    };

    (envelope, bypass)
}

async fn forward_and_populate(
    state: GraphqlState,
    headers: HeaderMap,
    body: Bytes,
    fingerprint: Fingerprint,
    decision: CacheDecision,
) -> Result<UpstreamResponse, ProxyError> {
    let start = Instant::now();

    let upstream = match state.inner.forwarder.forward(headers, body).await {
        Ok(upstream) => {
            state
                .inner
                .metrics
                .record_upstream(upstream.elapsed, Some(upstream.status.as_u16()));
            upstream
        }
        Err(e) => {
            state.inner.metrics.record_upstream(start.elapsed(), None);
            return Err(e);
        }
    };

    if decision.should_store(upstream.status) {
        let entry = CacheEntry::new(fingerprint, upstream.body.to_vec(), decision.ttl);

        match state.inner.cache.store(&entry).await {
            Ok(()) => state.inner.metrics.record_store("stored"),
            Err(e) => {
                tracing::warn!(fingerprint = %entry.fingerprint, error = %e, "failed to cache response");
                state.inner.metrics.record_store("error");
            }
        }
    } else if decision.populate_cache {
        tracing::debug!(%fingerprint, status = upstream.status.as_u16(), "not caching non-200 response");
        state.inner.metrics.record_store("skipped");
    }

    Ok(upstream)
}

fn json_response(status: StatusCode, headers: HeaderMap, body: Bytes, cache_hit: bool) -> Response {
    let mut response = (status, body).into_response();
    let response_headers = response.headers_mut();

    response_headers.extend(headers);
    response_headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response_headers.insert(
        CACHE_HIT_HEADER,
        HeaderValue::from_static(if cache_hit { "true" } else { "false" }),
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_is_cacheable() {
        let (envelope, bypass) = inspect_body(br#"{"query":"query { ping }","variables":{}}"#);

        assert_eq!(envelope.query, "query { ping }");
        assert_eq!(bypass, None);
    }

    #[test]
    fn named_and_anonymous_queries_are_cacheable() {
        let (envelope, bypass) = inspect_body(br#"{"query":"query A { a } query B { b }","operationName":"B"}"#);
        assert_eq!(envelope.operation_name, "B");
        assert_eq!(bypass, None);

        let (_, bypass) = inspect_body(br#"{"query":"{ a }"}"#);
        assert_eq!(bypass, None);
    }

    #[test]
    fn mutation_bypasses() {
        let (_, bypass) = inspect_body(br#"{"query":"mutation { ping }"}"#);
        assert_eq!(bypass, Some(BypassReason::Mutation));
    }

    #[test]
    fn mixed_document_bypasses() {
        let (_, bypass) = inspect_body(br#"{"query":"query A { a } mutation B { b }","operationName":"A"}"#);
        assert_eq!(bypass, Some(BypassReason::Mutation));
    }

    #[test]
    fn unparseable_document_bypasses() {
        let (_, bypass) = inspect_body(br#"{"query":"query {"}"#);
        assert_eq!(bypass, Some(BypassReason::UnparseableDocument));
    }

    #[test]
    fn missing_query_bypasses() {
        let (_, bypass) = inspect_body(br#"{"variables":{"id":1}}"#);
        assert_eq!(bypass, Some(BypassReason::UnparseableDocument));
    }

    #[test]
    fn malformed_body_bypasses_with_empty_envelope() {
        let (envelope, bypass) = inspect_body(b"not json");

        assert_eq!(envelope, RequestEnvelope::default());
        assert_eq!(bypass, Some(BypassReason::MalformedBody));
    }

    #[test]
    fn json_response_sets_headers() {
        let mut upstream_headers = HeaderMap::new();
        upstream_headers.append(header::SET_COOKIE, HeaderValue::from_static("a=1"));
        upstream_headers.append(header::SET_COOKIE, HeaderValue::from_static("b=2"));

        let response = json_response(StatusCode::CREATED, upstream_headers, Bytes::from_static(b"{}"), false);

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(response.headers()[CACHE_HIT_HEADER], "false");
        assert_eq!(response.headers().get_all(header::SET_COOKIE).iter().count(), 2);
    }
}
