use grache_core::RequestEnvelope;
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors raised while reading a GraphQL request body
#[derive(Debug, Error)]
pub enum RequestError {
    /// Body is not a JSON object with the expected field types
    #[error("malformed request body: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Wire shape of a GraphQL-over-HTTP POST body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphqlBody {
    #[serde(default)]
    query: Option<String>,
    #[serde(default)]
    operation_name: Option<String>,
    #[serde(default)]
    variables: Option<Map<String, Value>>,
}

/// Parse a POST body into a request envelope
///
/// Absent and `null` fields become their empty value. The identity is left
/// empty; it is attached later from the session cookie.
///
/// # Errors
///
/// Returns [`RequestError::Malformed`] when the body is not JSON, is not an
/// object, or carries fields of the wrong type (e.g. `variables` as a list).
pub fn parse_request(body: &[u8]) -> Result<RequestEnvelope, RequestError> {
    let body: GraphqlBody = serde_json::from_slice(body)?;

    Ok(RequestEnvelope {
        query: body.query.unwrap_or_default(),
        operation_name: body.operation_name.unwrap_or_default(),
        variables: body.variables.unwrap_or_default(),
        identity: String::new(),
    })
}
