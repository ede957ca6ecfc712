use axum::response::{IntoResponse, Response};
use grache_core::HttpError;
use http::{StatusCode, header};

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Render a domain error as a plain-text response
pub fn error_response<E: HttpError>(error: &E) -> Response {
    let status = error.status_code();

    if status.is_server_error() {
        tracing::warn!(error_type = error.error_type(), error = %error, "request failed");
    } else {
        tracing::debug!(error_type = error.error_type(), error = %error, "request rejected");
    }

    plain_text(status, error.client_message())
}

pub fn plain_text(status: StatusCode, body: impl Into<String>) -> Response {
    (status, [(header::CONTENT_TYPE, TEXT_PLAIN)], body.into()).into_response()
}
