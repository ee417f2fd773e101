use redis::RedisError;
use thiserror::Error;

/// Errors raised while talking to the key-value store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Connection, protocol or command errors reported by Redis
    #[error("Redis error: {0}")]
    Redis(#[from] RedisError),

    /// The configured address and credentials do not form a valid connection URL
    #[error("Invalid store address: {0}")]
    InvalidAddress(String),
}

impl StoreError {
    /// True when the failure came from the network rather than from a command
    pub fn is_connection_error(&self) -> bool {
        match self {
            StoreError::Redis(e) => {
                e.is_io_error() || e.is_connection_refusal() || e.is_connection_dropped()
            }
            StoreError::InvalidAddress(_) => false,
        }
    }
}
