// src/repositories/key_value.rs - Data access
use std::time::Duration;

use async_trait::async_trait;
use log::{error, trace};
use redis::AsyncCommands;

#[cfg(test)]
use mockall::automock;

use crate::db::Database;
use crate::errors::StoreError;

type Result<T> = std::result::Result<T, StoreError>;

/// The key-value operations the shortener needs from its store.
///
/// Keys and values are plain strings; TTLs are whole seconds.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait KeyValueRepositoryTrait: Send + Sync {
    /// Reads a key
    ///
    /// ### Returns
    /// * `Result<Option<String>>` - The value, or `None` if the key is absent or expired
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes a key unconditionally, replacing its value and expiry
    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;

    /// Writes a key only if it does not exist yet
    ///
    /// ### Returns
    /// * `Result<bool>` - `true` if the value was written, `false` if the key was taken
    async fn set_if_absent_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<bool>;

    /// Atomically decrements an integer key by one
    ///
    /// ### Returns
    /// * `Result<i64>` - The value after the decrement
    async fn decrement(&self, key: &str) -> Result<i64>;

    /// Remaining time-to-live of a key in seconds.
    ///
    /// Follows Redis: `-1` for a key without expiry, `-2` for a missing key.
    async fn ttl(&self, key: &str) -> Result<i64>;

    /// Sets a new time-to-live on an existing key
    ///
    /// ### Returns
    /// * `Result<bool>` - `false` if the key does not exist
    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool>;

    /// Round trip used by health checks
    async fn ping(&self) -> Result<()>;
}

// Implementation using the shared Redis connection
pub struct RedisRepository {
    db: Database,
}

impl RedisRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

fn log_failure(op: &str, key: &str, err: StoreError) -> StoreError {
    if err.is_connection_error() {
        error!("Store connection failed during {} '{}': {}", op, key, err);
    } else {
        error!("Store command {} '{}' failed: {}", op, key, err);
    }
    err
}

#[async_trait]
impl KeyValueRepositoryTrait for RedisRepository {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.db.connection();
        let value: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| log_failure("GET", key, e.into()))?;

        trace!("GET '{}' -> {:?}", key, value);
        Ok(value)
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let mut conn = self.db.connection();
        conn.set_ex::<_, _, ()>(key, value, ttl.as_secs())
            .await
            .map_err(|e| log_failure("SET", key, e.into()))?;

        trace!("SET '{}' EX {}", key, ttl.as_secs());
        Ok(())
    }

    async fn set_if_absent_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<bool> {
        let mut conn = self.db.connection();
        // SET .. NX replies OK when written and nil when the key already exists
        let reply: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("NX")
            .arg("EX")
            .arg(ttl.as_secs())
            .query_async(&mut conn)
            .await
            .map_err(|e| log_failure("SET NX", key, e.into()))?;

        trace!("SET NX '{}' EX {} -> {:?}", key, ttl.as_secs(), reply);
        Ok(reply.is_some())
    }

    async fn decrement(&self, key: &str) -> Result<i64> {
        let mut conn = self.db.connection();
        let value: i64 = conn
            .decr(key, 1)
            .await
            .map_err(|e| log_failure("DECR", key, e.into()))?;

        trace!("DECR '{}' -> {}", key, value);
        Ok(value)
    }

    async fn ttl(&self, key: &str) -> Result<i64> {
        let mut conn = self.db.connection();
        let seconds: i64 = conn
            .ttl(key)
            .await
            .map_err(|e| log_failure("TTL", key, e.into()))?;

        trace!("TTL '{}' -> {}", key, seconds);
        Ok(seconds)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool> {
        let mut conn = self.db.connection();
        let applied: bool = redis::cmd("EXPIRE")
            .arg(key)
            .arg(ttl.as_secs())
            .query_async(&mut conn)
            .await
            .map_err(|e| log_failure("EXPIRE", key, e.into()))?;

        trace!("EXPIRE '{}' {} -> {}", key, ttl.as_secs(), applied);
        Ok(applied)
    }

    async fn ping(&self) -> Result<()> {
        self.db.ping().await
    }
}
