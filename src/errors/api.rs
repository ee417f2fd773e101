use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// Errors surfaced to clients of the shorten endpoint.
///
/// Each variant maps to one status code and a JSON body with an `error` field.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("cannot parse JSON")]
    MalformedInput,

    /// Quota for the client is used up; `reset_limit` is in minutes.
    #[error("Rate limit exceeded")]
    RateLimitExceeded { reset_limit: i64 },

    #[error("URL custom short is already in use")]
    IdentifierConflict,

    #[error("Unable to connect to server")]
    StorageWriteFailure,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MalformedInput => StatusCode::BAD_REQUEST,
            ApiError::RateLimitExceeded { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::IdentifierConflict => StatusCode::FORBIDDEN,
            ApiError::StorageWriteFailure => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ApiError::RateLimitExceeded { reset_limit } => json!({
                "error": self.to_string(),
                "reset_limit": reset_limit,
            }),
            _ => json!({ "error": self.to_string() }),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}
