//! Cache stores that record or fail calls

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use grache_cache::{CacheError, CacheStore, MemoryStore};

/// In-memory store that records every call
#[derive(Default)]
pub struct RecordingStore {
    inner: MemoryStore,
    gets: Mutex<Vec<String>>,
    sets: Mutex<Vec<(String, Duration)>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an entry without recording a set
    pub async fn preload(&self, key: &str, value: &[u8], ttl: Duration) {
        self.inner.set(key, value, ttl).await.expect("memory store set");
    }

    /// Keys looked up so far
    pub fn gets(&self) -> Vec<String> {
        self.gets.lock().expect("lock").clone()
    }

    /// `(key, ttl)` of every write so far
    pub fn sets(&self) -> Vec<(String, Duration)> {
        self.sets.lock().expect("lock").clone()
    }
}

#[async_trait]
impl CacheStore for RecordingStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        self.gets.lock().expect("lock").push(key.to_owned());
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError> {
        self.sets.lock().expect("lock").push((key.to_owned(), ttl));
        self.inner.set(key, value, ttl).await
    }
}

/// Store whose every call fails, like an unreachable Redis
pub struct FailingStore;

#[async_trait]
impl CacheStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Err(CacheError::Backend("connection refused".to_owned()))
    }

    async fn set(&self, _key: &str, _value: &[u8], _ttl: Duration) -> Result<(), CacheError> {
        Err(CacheError::Backend("connection refused".to_owned()))
    }
}

/// Store that never answers
pub struct HangingStore;

#[async_trait]
impl CacheStore for HangingStore {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        std::future::pending().await
    }

    async fn set(&self, _key: &str, _value: &[u8], _ttl: Duration) -> Result<(), CacheError> {
        std::future::pending().await
    }
}
