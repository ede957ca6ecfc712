#![allow(clippy::must_use_candidate)]

//! Response cache for GraphQL requests
//!
//! Responses are keyed by a SHA-256 fingerprint of the request envelope
//! (query, operation name, canonical variables, session identity). Whether a
//! request reads or writes the cache is decided per request by
//! [`CacheDecision`]. The store behind the cache is pluggable; every store
//! call is bounded by a timeout and a failing store degrades to a miss.

mod decision;
mod fingerprint;
mod redis_store;
mod store;

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use thiserror::Error;

pub use decision::{BypassReason, CacheDecision};
pub use fingerprint::Fingerprint;
pub use redis_store::RedisStore;
pub use store::{CacheStore, DEFAULT_MEMORY_CAPACITY, MAX_MEMORY_TTL, MemoryStore};

/// Cache errors
#[derive(Debug, Error)]
pub enum CacheError {
    /// Store connection or command error
    #[error("cache backend: {0}")]
    Backend(String),
    /// Store did not answer in time
    #[error("cache operation timed out after {0:?}")]
    Timeout(Duration),
}

/// A response about to be written to the store
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub fingerprint: Fingerprint,
    pub body: Vec<u8>,
    pub stored_at: SystemTime,
    pub ttl: Duration,
}

impl CacheEntry {
    pub fn new(fingerprint: Fingerprint, body: Vec<u8>, ttl: Duration) -> Self {
        Self {
            fingerprint,
            body,
            stored_at: SystemTime::now(),
            ttl,
        }
    }
}

/// Outcome of a cache lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
    /// Stored body for the fingerprint
    Hit(Vec<u8>),
    /// Nothing stored
    Miss,
    /// Store failed or timed out; handled like a miss
    Unavailable,
}

/// Fail-open cache in front of a [`CacheStore`]
#[derive(Clone)]
pub struct ResponseCache {
    store: Arc<dyn CacheStore>,
    timeout: Duration,
}

impl ResponseCache {
    /// Wrap a store, bounding each call by `timeout`
    pub fn new(store: Arc<dyn CacheStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Look up a stored response
    ///
    /// Store errors and timeouts are logged and reported as
    /// [`CacheLookup::Unavailable`]; they never fail the request.
    pub async fn lookup(&self, fingerprint: &Fingerprint) -> CacheLookup {
        let result = tokio::time::timeout(self.timeout, self.store.get(fingerprint.as_str()))
            .await
            .unwrap_or(Err(CacheError::Timeout(self.timeout)));

        match result {
            Ok(Some(body)) => {
                tracing::debug!(%fingerprint, "cache hit");
                CacheLookup::Hit(body)
            }
            Ok(None) => {
                tracing::debug!(%fingerprint, "cache miss");
                CacheLookup::Miss
            }
            Err(e) => {
                tracing::warn!(%fingerprint, error = %e, "cache lookup failed, treating as miss");
                CacheLookup::Unavailable
            }
        }
    }

    /// Write an entry to the store
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or times out. Callers log it and
    /// carry on; the client response does not depend on the write.
    pub async fn store(&self, entry: &CacheEntry) -> Result<(), CacheError> {
        tokio::time::timeout(
            self.timeout,
            self.store.set(entry.fingerprint.as_str(), &entry.body, entry.ttl),
        )
        .await
        .unwrap_or(Err(CacheError::Timeout(self.timeout)))?;

        tracing::debug!(
            fingerprint = %entry.fingerprint,
            ttl_secs = entry.ttl.as_secs(),
            "cached response"
        );
        Ok(())
    }
}
