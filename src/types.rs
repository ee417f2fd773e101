use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::db::DatabaseHealth;

#[derive(Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub store: DatabaseHealth,
}

// Shared, read-only application state
pub struct AppState {
    pub start_time: Instant,
    pub version: String,
}
