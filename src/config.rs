use std::{env, net::IpAddr, str::FromStr};

use log::debug;

use crate::errors::ConfigError;

// Server-specific configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub workers: usize,
}

// Application-specific configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub name: String,
    pub version: String,
    pub environment: Environment,
    pub log_level: String,
}

// Environment enum for different deployment environments
#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Development,
    Testing,
    Production,
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "testing" | "test" => Ok(Environment::Testing),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(format!(
                "Invalid environment: {}. Must be one of: development, testing, production",
                s
            )),
        }
    }
}

// Key-value store connection settings
#[derive(Clone)]
pub struct StoreConfig {
    /// `host:port` of the Redis server
    pub addr: String,
    /// Empty means no password
    pub password: String,
    pub db: i64,
}

// Hand-written so the password never reaches the logs
impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("addr", &self.addr)
            .field("password", &if self.password.is_empty() { "" } else { "***" })
            .field("db", &self.db)
            .finish()
    }
}

/// Settings for the shorten endpoint and its quota
#[derive(Debug, Clone)]
pub struct ShortenerConfig {
    /// Value a client's quota record starts at
    pub api_quota: i64,
    /// Prefix joined with `/` and the identifier to form the returned short link
    pub domain: String,
    pub quota_window_minutes: u64,
    pub default_expiry_hours: u64,
    /// Take the client IP from `X-Forwarded-For` / `X-Real-IP` instead of the peer address
    pub trust_proxy_headers: bool,
}

impl Default for ShortenerConfig {
    fn default() -> Self {
        Self {
            api_quota: 10,
            domain: "localhost:3000".to_string(),
            quota_window_minutes: 30,
            default_expiry_hours: 24,
            trust_proxy_headers: false,
        }
    }
}

// Config struct that matches our environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub app: AppConfig,
    pub store: StoreConfig,
    pub shortener: ShortenerConfig,
}

type ConfigResult<T> = Result<T, ConfigError>;

impl Config {
    // Load configuration from the process environment.
    // Runs before the logger exists; callers report the outcome.
    pub fn load() -> ConfigResult<Self> {
        Self::from_source(|key| env::var(key))
    }

    /// Build the configuration from any variable lookup shaped like `env::var`
    pub fn from_source<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Result<String, env::VarError>,
    {
        let source = Source { lookup };

        let server = ServerConfig {
            host: source.get_or_default("SERVER_HOST", "127.0.0.1")?,
            port: source.get_or_default("SERVER_PORT", "3000")?,
            workers: source.get_or_default("SERVER_WORKERS", "4")?,
        };

        let version = env!("CARGO_PKG_VERSION");
        let app = AppConfig {
            name: source.get_or_default("APP_NAME", "url-shortener")?,
            version: source.get_or_default("APP_VERSION", version)?,
            environment: source.get_or_default("APP_ENVIRONMENT", "development")?,
            log_level: source.get_or_default("RUST_LOG", "info")?,
        };

        let store = StoreConfig {
            addr: source.get_or_default("DB_ADDR", "127.0.0.1:6379")?,
            password: source.get_or_default("DB_PASS", "")?,
            db: source.get_or_default("DB_NUMBER", "0")?,
        };

        let defaults = ShortenerConfig::default();
        let shortener = ShortenerConfig {
            api_quota: source.get_or_default("API_QUOTA", &defaults.api_quota.to_string())?,
            domain: source.get_or_default("DOMAIN", &defaults.domain)?,
            quota_window_minutes: source.get_or_default(
                "QUOTA_WINDOW_MINUTES",
                &defaults.quota_window_minutes.to_string(),
            )?,
            default_expiry_hours: source.get_or_default(
                "DEFAULT_EXPIRY_HOURS",
                &defaults.default_expiry_hours.to_string(),
            )?,
            trust_proxy_headers: source.get_or_default("TRUST_PROXY_HEADERS", "false")?,
        };

        let config = Config {
            server,
            app,
            store,
            shortener,
        };
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.server.workers == 0 {
            return Err(invalid("SERVER_WORKERS", "must be at least 1"));
        }
        if self.store.addr.trim().is_empty() {
            return Err(invalid("DB_ADDR", "must not be empty"));
        }
        if self.shortener.quota_window_minutes == 0 {
            return Err(invalid("QUOTA_WINDOW_MINUTES", "must be at least 1"));
        }
        if self.shortener.default_expiry_hours == 0 {
            return Err(invalid("DEFAULT_EXPIRY_HOURS", "must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(key: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

struct Source<F> {
    lookup: F,
}

impl<F> Source<F>
where
    F: Fn(&str) -> Result<String, env::VarError>,
{
    /// Get a variable with a default value, parsed into `T`
    fn get_or_default<T: FromStr>(&self, key: &str, default: &str) -> ConfigResult<T>
    where
        T::Err: std::fmt::Display,
    {
        let raw = match (self.lookup)(key) {
            Ok(val) => val,
            Err(env::VarError::NotPresent) => {
                debug!("{} not set, using default: {}", key, default);
                default.to_string()
            }
            Err(source) => {
                return Err(ConfigError::EnvVar {
                    key: key.to_string(),
                    source,
                })
            }
        };

        raw.trim().parse::<T>().map_err(|e| ConfigError::Parse {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }
}
