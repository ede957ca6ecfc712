use std::fmt;

use grache_core::RequestEnvelope;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Cache key derived from a request envelope
///
/// Lowercase hex SHA-256, used verbatim as the store key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Compute the fingerprint of an envelope
    ///
    /// The fields are encoded as the JSON array
    /// `[query, operationName, variables, identity]` with object keys sorted
    /// at every depth, so the result does not depend on the order in which
    /// the client listed its variables.
    pub fn of(envelope: &RequestEnvelope) -> Self {
        let encoded = Value::Array(vec![
            Value::String(envelope.query.clone()),
            Value::String(envelope.operation_name.clone()),
            canonicalize(&Value::Object(envelope.variables.clone())),
            Value::String(envelope.identity.clone()),
        ]);

        let hash = Sha256::digest(encoded.to_string().as_bytes());
        Self(format!("{hash:x}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rebuild a JSON value with object keys inserted in sorted order
///
/// Holds regardless of whether `serde_json` keeps insertion order.
fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));

            let mut sorted = Map::with_capacity(entries.len());
            for (key, value) in entries {
                sorted.insert(key.clone(), canonicalize(value));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}
