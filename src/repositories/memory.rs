//! In-memory store for tests.
//!
//! Keeps the TTL each key was written with instead of running a clock;
//! `evict` drops a key the way Redis would once its TTL elapsed.

use std::{collections::HashMap, sync::Mutex, time::Duration};

use async_trait::async_trait;

use super::KeyValueRepositoryTrait;
use crate::errors::StoreError;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    ttl_secs: i64,
}

#[derive(Default)]
pub struct MemoryRepository {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a key as if an earlier request had written it
    pub fn insert(&self, key: &str, value: &str, ttl: Duration) {
        self.entries.lock().unwrap().insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                ttl_secs: ttl.as_secs() as i64,
            },
        );
    }

    /// Override the remaining TTL of an existing key
    pub fn set_remaining(&self, key: &str, ttl_secs: i64) {
        if let Some(entry) = self.entries.lock().unwrap().get_mut(key) {
            entry.ttl_secs = ttl_secs;
        }
    }

    pub fn evict(&self, key: &str) {
        self.entries.lock().unwrap().remove(key);
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).map(|e| e.value.clone())
    }

    pub fn ttl_secs(&self, key: &str) -> Option<i64> {
        self.entries.lock().unwrap().get(key).map(|e| e.ttl_secs)
    }
}

#[async_trait]
impl KeyValueRepositoryTrait for MemoryRepository {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.value(key))
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        self.insert(key, value, ttl);
        Ok(())
    }

    async fn set_if_absent_with_ttl(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<bool, StoreError> {
        let mut entries = self.entries.lock().unwrap();
        if entries.contains_key(key) {
            return Ok(false);
        }
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                ttl_secs: ttl.as_secs() as i64,
            },
        );
        Ok(true)
    }

    async fn decrement(&self, key: &str) -> Result<i64, StoreError> {
        let mut entries = self.entries.lock().unwrap();
        // DECR on a missing key starts from 0 and leaves it without expiry
        let entry = entries.entry(key.to_string()).or_insert(Entry {
            value: "0".to_string(),
            ttl_secs: -1,
        });
        let current: i64 = entry.value.parse().map_err(|_| {
            StoreError::Redis(redis::RedisError::from((
                redis::ErrorKind::TypeError,
                "value is not an integer or out of range",
            )))
        })?;
        entry.value = (current - 1).to_string();
        Ok(current - 1)
    }

    async fn ttl(&self, key: &str) -> Result<i64, StoreError> {
        Ok(self.ttl_secs(key).unwrap_or(-2))
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool, StoreError> {
        match self.entries.lock().unwrap().get_mut(key) {
            Some(entry) => {
                entry.ttl_secs = ttl.as_secs() as i64;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
