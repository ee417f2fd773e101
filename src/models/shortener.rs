// src/models/shortener.rs - Wire types for the shorten endpoint
use serde::{Deserialize, Serialize};

/// Body of `POST /api/v1`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortenRequest {
    /// The destination the short link points at
    pub url: String,

    /// Client-chosen identifier; absent or empty means generate one
    #[serde(default, rename = "short")]
    pub custom_short: Option<String>,

    /// Lifetime of the link in hours; absent or zero means the default
    #[serde(default)]
    pub expiry: Option<u64>,
}

impl ShortenRequest {
    /// The custom identifier, if the client supplied a non-empty one
    pub fn custom_short(&self) -> Option<&str> {
        self.custom_short.as_deref().filter(|s| !s.is_empty())
    }

    /// Requested expiry in hours, with zero/absent replaced by `default_hours`
    pub fn expiry_or(&self, default_hours: u64) -> u64 {
        match self.expiry {
            Some(hours) if hours > 0 => hours,
            _ => default_hours,
        }
    }
}

/// Body of a successful shorten
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortenResponse {
    pub url: String,
    /// Configured domain, `/`, then the identifier
    pub short: String,
    pub expiry: u64,
    /// Quota left in the current window
    pub rate_limit: i64,
    /// Minutes until the quota window resets
    pub reset_limit: i64,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_request_with_only_url() {
        let req: ShortenRequest = serde_json::from_value(json!({ "url": "https://example.com" })).unwrap();
        assert_eq!(req.url, "https://example.com");
        assert_eq!(req.custom_short(), None);
        assert_eq!(req.expiry_or(24), 24);
    }

    #[test]
    fn test_empty_short_and_zero_expiry_fall_back() {
        let req: ShortenRequest = serde_json::from_value(json!({
            "url": "https://example.com",
            "short": "",
            "expiry": 0,
        }))
        .unwrap();
        assert_eq!(req.custom_short(), None);
        assert_eq!(req.expiry_or(24), 24);
    }

    #[test]
    fn test_request_with_all_fields() {
        let req: ShortenRequest = serde_json::from_value(json!({
            "url": "https://example.com/a",
            "short": "abc123",
            "expiry": 48,
        }))
        .unwrap();
        assert_eq!(req.custom_short(), Some("abc123"));
        assert_eq!(req.expiry_or(24), 48);
    }

    #[test]
    fn test_request_rejects_missing_url_and_negative_expiry() {
        assert!(serde_json::from_value::<ShortenRequest>(json!({ "short": "x" })).is_err());
        assert!(serde_json::from_value::<ShortenRequest>(json!({
            "url": "https://example.com",
            "expiry": -3,
        }))
        .is_err());
    }

    #[test]
    fn test_response_field_names() {
        let resp = ShortenResponse {
            url: "https://example.com".into(),
            short: "sho.rt/abc123".into(),
            expiry: 24,
            rate_limit: 9,
            reset_limit: 30,
        };
        assert_eq!(
            serde_json::to_value(&resp).unwrap(),
            json!({
                "url": "https://example.com",
                "short": "sho.rt/abc123",
                "expiry": 24,
                "rate_limit": 9,
                "reset_limit": 30,
            })
        );
    }
}
