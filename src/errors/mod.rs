use std::io::Error as IoError;

use thiserror::Error;

pub mod api;
pub mod config;
pub mod store;

pub use api::ApiError;
pub use config::ConfigError;
pub use store::StoreError;

/// Infrastructure errors that stop the process during startup or serving
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Server error: {0}")]
    Server(#[from] IoError),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Logger error: {0}")]
    Logger(String),
    #[error("Store error: {0}")]
    Store(String),
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::Config(e.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Store(e.to_string())
    }
}
