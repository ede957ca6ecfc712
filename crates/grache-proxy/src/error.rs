use std::error::Error as _;

use grache_core::HttpError;
use http::StatusCode;
use thiserror::Error;

/// Errors that can occur while talking to the backend
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Backend did not answer within the configured timeout
    #[error("upstream timed out: {0}")]
    Timeout(String),

    /// Backend could not be reached (refused, DNS, TLS handshake)
    #[error("upstream unreachable: {0}")]
    Connect(String),

    /// Connection broke while sending or receiving
    #[error("upstream transport error: {0}")]
    Transport(String),

    /// HTTP client could not be constructed
    #[error("http client: {0}")]
    Client(String),
}

impl ProxyError {
    /// Classify a reqwest error, keeping its full source chain in the message
    pub(crate) fn from_reqwest(error: reqwest::Error) -> Self {
        let mut message = error.to_string();
        let mut source = error.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }

        if error.is_timeout() {
            Self::Timeout(message)
        } else if error.is_connect() {
            Self::Connect(message)
        } else if error.is_builder() {
            Self::Client(message)
        } else {
            Self::Transport(message)
        }
    }
}

impl HttpError for ProxyError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Connect(_) | Self::Transport(_) => StatusCode::BAD_GATEWAY,
            Self::Client(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::Timeout(_) => "upstream_timeout",
            Self::Connect(_) => "upstream_unreachable",
            Self::Transport(_) => "upstream_transport",
            Self::Client(_) => "client_error",
        }
    }
}
