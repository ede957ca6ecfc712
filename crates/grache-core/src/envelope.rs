use serde_json::{Map, Value};

/// The parts of a GraphQL request that decide which response it gets
///
/// Missing fields are represented by their empty value, so a request without
/// `operationName` and one with `"operationName": ""` are the same envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestEnvelope {
    /// Raw GraphQL document text
    pub query: String,
    /// Selected operation, empty when not given
    pub operation_name: String,
    /// Operation variables
    pub variables: Map<String, Value>,
    /// Session identity, empty when absent or ignored
    pub identity: String,
}

impl RequestEnvelope {
    /// Replace the identity, clearing it when `None`
    #[must_use]
    pub fn with_identity(mut self, identity: Option<String>) -> Self {
        self.identity = identity.unwrap_or_default();
        self
    }
}
