use std::time::Instant;

use log::{debug, info, warn};
use redis::{aio::ConnectionManager, Client};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{config::StoreConfig, errors::StoreError};

pub type DbResult<T> = Result<T, StoreError>;

/// Process-wide handle to the Redis server.
///
/// The inner `ConnectionManager` multiplexes every request over one
/// connection and reconnects on its own; clones share that connection.
#[derive(Clone)]
pub struct Database {
    manager: ConnectionManager,
}

/// Store health status
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DBHealthStatus {
    Healthy,
    Unhealthy,
}

/// Complete store health check result
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseHealth {
    pub status: DBHealthStatus,
    pub response_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl DatabaseHealth {
    pub fn from_ping(result: DbResult<()>, started: Instant) -> Self {
        let response_time_ms = started.elapsed().as_millis() as u64;
        match result {
            Ok(()) => Self {
                status: DBHealthStatus::Healthy,
                response_time_ms,
                message: None,
            },
            Err(e) => Self {
                status: DBHealthStatus::Unhealthy,
                response_time_ms,
                message: Some(format!("Store ping failed: {}", e)),
            },
        }
    }
}

impl Database {
    /// Open the shared connection and check it answers `PING`
    pub async fn connect(config: &StoreConfig) -> DbResult<Self> {
        info!("Initializing store connection");
        debug!("Store configuration: {:?}", config);

        let url = connection_url(config)?;
        let client = Client::open(url.as_str())?;

        let manager = client.get_connection_manager().await.map_err(|e| {
            warn!("Failed to connect to store at {}: {}", config.addr, e);
            StoreError::Redis(e)
        })?;

        let db = Self { manager };
        db.ping().await?;

        info!("Successfully connected to store at {}", config.addr);
        Ok(db)
    }

    /// A connection handle for issuing commands
    pub fn connection(&self) -> ConnectionManager {
        self.manager.clone()
    }

    pub async fn ping(&self) -> DbResult<()> {
        let mut conn = self.connection();
        let reply: String = redis::cmd("PING").query_async(&mut conn).await?;
        debug!("Store answered PING with {}", reply);
        Ok(())
    }

    /// Release the shared connection
    pub async fn shutdown(self) {
        info!("Shutting down store connection...");
        drop(self.manager);
        info!("Store connection released");
    }
}

/// Build a `redis://` URL from `host:port`, an optional password and a database index
pub fn connection_url(config: &StoreConfig) -> DbResult<Url> {
    let mut url = Url::parse(&format!("redis://{}/{}", config.addr.trim(), config.db))
        .map_err(|e| StoreError::InvalidAddress(format!("{}: {}", config.addr, e)))?;

    if url.host_str().map_or(true, str::is_empty) {
        return Err(StoreError::InvalidAddress(format!(
            "{}: missing host",
            config.addr
        )));
    }

    if !config.password.is_empty() {
        url.set_password(Some(&config.password)).map_err(|_| {
            StoreError::InvalidAddress(format!("{}: cannot carry a password", config.addr))
        })?;
    }

    Ok(url)
}
