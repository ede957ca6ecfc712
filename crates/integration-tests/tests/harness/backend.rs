//! Mock GraphQL backend for integration tests
//!
//! Answers every POST with `{"data":{"ping":"pong","call":N,...}}`, where
//! `N` counts the requests received, so a cached body is distinguishable from a
//! fresh one.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::{Router, routing};
use bytes::Bytes;
use http::{HeaderMap, StatusCode, header};
use tokio_util::sync::CancellationToken;
use tower_http::compression::CompressionLayer;

/// Mock backend returning numbered responses
pub struct MockBackend {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

struct MockState {
    request_count: AtomicU32,
    status: StatusCode,
    delay: Option<Duration>,
    set_cookie: Option<String>,
    requests: Mutex<Vec<(HeaderMap, Bytes)>>,
}

/// Builder for a [`MockBackend`] with non-default behavior
#[derive(Default)]
pub struct MockBackendBuilder {
    status: Option<StatusCode>,
    delay: Option<Duration>,
    set_cookie: Option<String>,
    gzip: bool,
}

impl MockBackendBuilder {
    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    /// Sleep before answering each request
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn set_cookie(mut self, value: &str) -> Self {
        self.set_cookie = Some(value.to_owned());
        self
    }

    /// Gzip responses for clients that accept it
    pub fn gzip(mut self) -> Self {
        self.gzip = true;
        self
    }

    pub async fn start(self) -> anyhow::Result<MockBackend> {
        let state = Arc::new(MockState {
            request_count: AtomicU32::new(0),
            status: self.status.unwrap_or(StatusCode::OK),
            delay: self.delay,
            set_cookie: self.set_cookie,
            requests: Mutex::new(Vec::new()),
        });

        let mut app = Router::new()
            .route("/graphql", routing::post(handle_graphql))
            .with_state(Arc::clone(&state));

        if self.gzip {
            app = app.layer(CompressionLayer::new());
        }

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(MockBackend { addr, shutdown, state })
    }
}

impl MockBackend {
    /// Start a backend answering 200 immediately
    pub async fn start() -> anyhow::Result<Self> {
        Self::builder().start().await
    }

    pub fn builder() -> MockBackendBuilder {
        MockBackendBuilder::default()
    }

    /// GraphQL endpoint URL
    pub fn url(&self) -> String {
        format!("http://{}/graphql", self.addr)
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> u32 {
        self.state.request_count.load(Ordering::SeqCst)
    }

    /// Headers of the most recent request
    pub fn last_headers(&self) -> Option<HeaderMap> {
        self.state
            .requests
            .lock()
            .expect("lock")
            .last()
            .map(|(headers, _)| headers.clone())
    }

    /// Body of the most recent request
    pub fn last_body(&self) -> Option<Bytes> {
        self.state
            .requests
            .lock()
            .expect("lock")
            .last()
            .map(|(_, body)| body.clone())
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Body the mock returns for its `call`-th request
pub fn response_body(call: u32) -> String {
    format!(r#"{{"data":{{"ping":"pong","call":{call},"greeting":"hello from the mock backend"}}}}"#)
}

async fn handle_graphql(State(state): State<Arc<MockState>>, headers: HeaderMap, body: Bytes) -> Response {
    let call = state.request_count.fetch_add(1, Ordering::SeqCst) + 1;
    state.requests.lock().expect("lock").push((headers, body));

    if let Some(delay) = state.delay {
        tokio::time::sleep(delay).await;
    }

    let mut response = (
        state.status,
        [(header::CONTENT_TYPE, "application/json")],
        response_body(call),
    )
        .into_response();

    if let Some(cookie) = &state.set_cookie {
        response
            .headers_mut()
            .insert(header::SET_COOKIE, cookie.parse().expect("valid cookie"));
    }

    response
}
