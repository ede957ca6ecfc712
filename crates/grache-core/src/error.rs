use http::StatusCode;

/// Trait for domain errors that can be converted to HTTP responses
///
/// Implemented by each feature crate's error type. The server layer turns
/// these into plain-text responses so domain errors stay decoupled from axum.
pub trait HttpError: std::error::Error {
    /// HTTP status code for this error
    fn status_code(&self) -> StatusCode;

    /// Machine-readable error kind, used as a log field
    fn error_type(&self) -> &str;

    /// Message safe to expose to clients
    fn client_message(&self) -> String {
        self.to_string()
    }
}
