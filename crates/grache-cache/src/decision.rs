use std::time::Duration;

use http::StatusCode;

/// Why a request skips the cache entirely
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BypassReason {
    /// Document contains at least one mutation
    Mutation,
    /// Document text could not be parsed as GraphQL
    UnparseableDocument,
    /// Body was not a valid GraphQL JSON request
    MalformedBody,
}

impl BypassReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mutation => "mutation",
            Self::UnparseableDocument => "unparseable_document",
            Self::MalformedBody => "malformed_body",
        }
    }
}

/// Per-request caching policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheDecision {
    /// Look the fingerprint up before forwarding
    pub consult_cache: bool,
    /// Store a successful upstream response
    pub populate_cache: bool,
    /// Lifetime of a stored response
    pub ttl: Duration,
    /// Set when both flags were forced off
    pub bypass: Option<BypassReason>,
}

impl CacheDecision {
    /// Decide how a request interacts with the cache
    ///
    /// A bypass reason disables both lookup and population. Otherwise the
    /// TTL override (already resolved from header and query parameter) wins
    /// over the default. A zero TTL disables population only: the request
    /// can still be answered by an entry that an earlier request stored.
    pub fn new(bypass: Option<BypassReason>, ttl_override: Option<u64>, default_ttl: Duration) -> Self {
        let ttl = ttl_override.map_or(default_ttl, Duration::from_secs);

        if bypass.is_some() {
            return Self {
                consult_cache: false,
                populate_cache: false,
                ttl,
                bypass,
            };
        }

        Self {
            consult_cache: true,
            populate_cache: !ttl.is_zero(),
            ttl,
            bypass: None,
        }
    }

    /// Whether an upstream response with this status gets stored
    pub fn should_store(&self, status: StatusCode) -> bool {
        self.populate_cache && status == StatusCode::OK
    }
}
