// src/services/shortener.rs - Business logic
use std::{sync::Arc, time::Duration};

use log::{debug, error, info, warn};

use crate::config::ShortenerConfig;
use crate::errors::ApiError;
use crate::models::{ShortenRequest, ShortenResponse};
use crate::repositories::KeyValueRepositoryTrait;
use crate::utils::id_generator::{generate_short_id, SHORT_ID_LENGTH};

type Result<T> = std::result::Result<T, ApiError>;

const SECONDS_PER_HOUR: u64 = 60 * 60;

/// Longest link lifetime accepted, one hundred years
pub const MAX_EXPIRY_HOURS: u64 = 24 * 365 * 100;

/// Shortens URLs and meters each client against a quota kept in the same store.
///
/// Quota records are keyed by client IP and short links by their identifier,
/// both verbatim. Store read failures during the quota and identifier checks
/// are treated as missing keys.
pub struct ShortenerService {
    repository: Arc<dyn KeyValueRepositoryTrait>,
    settings: ShortenerConfig,
}

impl ShortenerService {
    pub fn new(repository: Arc<dyn KeyValueRepositoryTrait>, settings: ShortenerConfig) -> Self {
        Self {
            repository,
            settings,
        }
    }

    pub fn repository(&self) -> &Arc<dyn KeyValueRepositoryTrait> {
        &self.repository
    }

    pub fn settings(&self) -> &ShortenerConfig {
        &self.settings
    }

    pub async fn shorten(&self, client_ip: &str, request: ShortenRequest) -> Result<ShortenResponse> {
        let expiry = request.expiry_or(self.settings.default_expiry_hours);
        let ttl = expiry_ttl(expiry).ok_or_else(|| {
            info!("Rejected expiry of {} hours from {}", expiry, client_ip);
            ApiError::MalformedInput
        })?;

        self.check_quota(client_ip).await?;

        let identifier = match request.custom_short() {
            Some(custom) => custom.to_string(),
            None => generate_short_id(SHORT_ID_LENGTH),
        };

        if self.read_or_absent(&identifier).await.is_some() {
            info!("Short '{}' requested by {} is already in use", identifier, client_ip);
            return Err(ApiError::IdentifierConflict);
        }

        let written = self
            .repository
            .set_if_absent_with_ttl(&identifier, &request.url, ttl)
            .await
            .map_err(|e| {
                error!("Failed to store short '{}': {}", identifier, e);
                ApiError::StorageWriteFailure
            })?;
        if !written {
            info!("Short '{}' was taken by a concurrent request", identifier);
            return Err(ApiError::IdentifierConflict);
        }

        if let Err(e) = self.repository.decrement(client_ip).await {
            warn!("Failed to decrement quota for {}: {}", client_ip, e);
        }

        let rate_limit = self
            .read_or_absent(client_ip)
            .await
            .map(|v| parse_quota(&v))
            .unwrap_or(0);
        let reset_limit = self.window_seconds_left(client_ip).await / 60;

        info!(
            "Shortened '{}' as '{}' for {} ({} left)",
            request.url, identifier, client_ip, rate_limit
        );

        Ok(ShortenResponse {
            short: format!("{}/{}", self.settings.domain, identifier),
            url: request.url,
            expiry,
            rate_limit,
            reset_limit,
        })
    }

    /// Opens a quota window for a new client, or rejects a client whose quota is used up.
    ///
    /// Opening a window does not count against it; the decrement after the
    /// link is written does.
    async fn check_quota(&self, client_ip: &str) -> Result<()> {
        let Some(value) = self.read_or_absent(client_ip).await else {
            let window = self.window();
            let quota = self.settings.api_quota.to_string();
            if let Err(e) = self.repository.set_with_ttl(client_ip, &quota, window).await {
                warn!("Failed to open quota window for {}: {}", client_ip, e);
            } else {
                debug!("Opened quota window for {} at {}", client_ip, quota);
            }
            return Ok(());
        };

        if parse_quota(&value) <= 0 {
            let reset_limit = self.minutes_left(client_ip).await;
            info!(
                "Rate limit exceeded for {}, resets in {} minutes",
                client_ip, reset_limit
            );
            return Err(ApiError::RateLimitExceeded { reset_limit });
        }

        Ok(())
    }

    fn window(&self) -> Duration {
        Duration::from_secs(self.settings.quota_window_minutes * 60)
    }

    /// Seconds left in a client's window after its decrement.
    ///
    /// If the window lapsed between the quota check and the decrement, DECR
    /// recreated the key without an expiry; it gets a fresh window here so
    /// the client is not locked out for good.
    async fn window_seconds_left(&self, client_ip: &str) -> i64 {
        match self.repository.ttl(client_ip).await {
            Ok(-1) => {
                let window = self.window();
                match self.repository.expire(client_ip, window).await {
                    Ok(_) => {
                        debug!("Re-armed quota window for {}", client_ip);
                        window.as_secs() as i64
                    }
                    Err(e) => {
                        warn!("Failed to re-arm quota window for {}: {}", client_ip, e);
                        0
                    }
                }
            }
            Ok(seconds) => seconds.max(0),
            Err(e) => {
                warn!("Failed to read TTL of '{}': {}", client_ip, e);
                0
            }
        }
    }

    /// Reads a key, folding read errors and empty values into `None`
    async fn read_or_absent(&self, key: &str) -> Option<String> {
        match self.repository.get(key).await {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                warn!("Treating '{}' as absent after read failure: {}", key, e);
                None
            }
        }
    }

    /// Whole minutes left on a key's TTL, 0 when it has none or cannot be read
    async fn minutes_left(&self, key: &str) -> i64 {
        match self.repository.ttl(key).await {
            Ok(seconds) => seconds.max(0) / 60,
            Err(e) => {
                warn!("Failed to read TTL of '{}': {}", key, e);
                0
            }
        }
    }
}

/// Link lifetime for `hours`, or `None` when it is beyond what the store accepts
fn expiry_ttl(hours: u64) -> Option<Duration> {
    if hours > MAX_EXPIRY_HOURS {
        return None;
    }
    hours.checked_mul(SECONDS_PER_HOUR).map(Duration::from_secs)
}

/// Stored quota as an integer; anything unparsable counts as exhausted
fn parse_quota(value: &str) -> i64 {
    value.trim().parse().unwrap_or(0)
}
