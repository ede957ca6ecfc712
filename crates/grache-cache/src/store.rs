use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mini_moka::sync::Cache;
use tokio::time::Instant;

use crate::CacheError;

/// Default entry bound for [`MemoryStore::new`]
pub const DEFAULT_MEMORY_CAPACITY: u64 = 10_000;

/// Longest lifetime a memory entry can have; longer TTLs are clamped
pub const MAX_MEMORY_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Key-value store holding cached response bodies
///
/// Expiry belongs to the store: an entry written with a TTL must stop being
/// returned once the TTL elapses. Callers never pass a zero TTL.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Fetch a value, `None` when absent or expired
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Store a value, overwriting any previous one
    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError>;
}

#[derive(Clone)]
struct MemoryEntry {
    body: Arc<[u8]>,
    expires_at: Instant,
}

/// Process-local store for development and tests
///
/// Bounded by entry count. Each entry keeps its own deadline; the cache-wide
/// TTL of [`MAX_MEMORY_TTL`] only reclaims entries nobody reads again.
pub struct MemoryStore {
    entries: Cache<String, MemoryEntry>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MEMORY_CAPACITY)
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding at most `capacity` entries
    pub fn with_capacity(capacity: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(MAX_MEMORY_TTL)
            .build();

        Self { entries }
    }

    /// Approximate number of entries, including expired ones not yet evicted
    pub fn len(&self) -> u64 {
        self.entries.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let key = key.to_owned();

        let Some(entry) = self.entries.get(&key) else {
            return Ok(None);
        };

        if entry.expires_at > Instant::now() {
            return Ok(Some(entry.body.to_vec()));
        }

        self.entries.invalidate(&key);
        Ok(None)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError> {
        if ttl.is_zero() {
            return Ok(());
        }

        self.entries.insert(
            key.to_owned(),
            MemoryEntry {
                body: Arc::from(value),
                expires_at: Instant::now() + ttl.min(MAX_MEMORY_TTL),
            },
        );
        Ok(())
    }
}
