//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup, validated, and passed explicitly to
//! [`crate::server::run`].
//!
//! ## Cache Backend
//!
//! `CACHE_BACKEND` selects where resolutions are stored:
//!
//! - `postgres` (default) - `locations` table; needs `DATABASE_URL` or
//!   `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD`, `DB_NAME`
//! - `redis` - needs `REDIS_URL` or `REDIS_HOST`, `REDIS_PORT`,
//!   `REDIS_PASSWORD`, `REDIS_DB`
//! - `memory` - process-local, lost on restart
//!
//! ## Geocoding
//!
//! - `GOOGLE_MAPS_API_KEY` - API credential (missing key is logged, not fatal)
//! - `GEOCODER_BASE_URL` - Endpoint (default: Google Maps Geocoding API)
//! - `GEOCODER_TIMEOUT_SECS` - Per-request timeout (default: 10, max: 120)
//!
//! ## Optional Variables
//!
//! - `LISTEN` - Bind address (default: `0.0.0.0:3000`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//! - `DB_MAX_CONNECTIONS`, `DB_CONNECT_TIMEOUT`, `DB_IDLE_TIMEOUT`, `DB_MAX_LIFETIME` - Pool settings

use anyhow::{Context, Result};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::infrastructure::geocoding::DEFAULT_GEOCODER_URL;
use crate::utils::connection_string::mask_connection_string;

/// Storage backend for cached resolutions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    Postgres,
    Redis,
    Memory,
}

impl FromStr for CacheBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "redis" => Ok(Self::Redis),
            "memory" => Ok(Self::Memory),
            other => anyhow::bail!(
                "CACHE_BACKEND must be 'postgres', 'redis' or 'memory', got '{}'",
                other
            ),
        }
    }
}

impl fmt::Display for CacheBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Postgres => "postgres",
            Self::Redis => "redis",
            Self::Memory => "memory",
        })
    }
}

/// Service configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    pub cache_backend: CacheBackend,
    pub database_url: Option<String>,
    pub redis_url: Option<String>,
    pub google_maps_api_key: Option<String>,
    pub geocoder_base_url: String,
    pub geocoder_timeout_secs: u64,
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: String,

    // ── PgPool settings ─────────────────────────────────────────────────────
    /// Maximum number of connections in the pool (`DB_MAX_CONNECTIONS`, default: 10).
    pub db_max_connections: u32,
    /// Timeout for acquiring a connection in seconds (`DB_CONNECT_TIMEOUT`, default: 30).
    pub db_connect_timeout: u64,
    /// Idle connection lifetime in seconds (`DB_IDLE_TIMEOUT`, default: 600).
    pub db_idle_timeout: u64,
    /// Maximum connection lifetime in seconds (`DB_MAX_LIFETIME`, default: 1800).
    pub db_max_lifetime: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("cache_backend", &self.cache_backend)
            .field(
                "database_url",
                &self.database_url.as_deref().map(mask_connection_string),
            )
            .field(
                "redis_url",
                &self.redis_url.as_deref().map(mask_connection_string),
            )
            .field(
                "google_maps_api_key",
                &self.google_maps_api_key.as_ref().map(|_| "***"),
            )
            .field("geocoder_base_url", &self.geocoder_base_url)
            .field("geocoder_timeout_secs", &self.geocoder_timeout_secs)
            .field("listen_addr", &self.listen_addr)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .finish_non_exhaustive()
    }
}

fn parse_env<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `CACHE_BACKEND` is invalid, or if it selects
    /// postgres and database components are only partially provided.
    pub fn from_env() -> Result<Self> {
        let cache_backend: CacheBackend = env::var("CACHE_BACKEND")
            .unwrap_or_else(|_| "postgres".to_string())
            .parse()?;

        let database_url = match cache_backend {
            CacheBackend::Postgres => {
                Self::load_database_url().context("Failed to load database configuration")?
            }
            CacheBackend::Redis | CacheBackend::Memory => None,
        };
        let redis_url = Self::load_redis_url();

        let google_maps_api_key = env::var("GOOGLE_MAPS_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());
        let geocoder_base_url =
            env::var("GEOCODER_BASE_URL").unwrap_or_else(|_| DEFAULT_GEOCODER_URL.to_string());

        Ok(Self {
            cache_backend,
            database_url,
            redis_url,
            google_maps_api_key,
            geocoder_base_url,
            geocoder_timeout_secs: parse_env("GEOCODER_TIMEOUT_SECS", 10),
            listen_addr: env::var("LISTEN").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            log_level: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string()),
            db_max_connections: parse_env("DB_MAX_CONNECTIONS", 10),
            db_connect_timeout: parse_env("DB_CONNECT_TIMEOUT", 30),
            db_idle_timeout: parse_env("DB_IDLE_TIMEOUT", 600),
            db_max_lifetime: parse_env("DB_MAX_LIFETIME", 1800),
        })
    }

    /// Loads database URL with fallback to component-based configuration.
    ///
    /// Priority:
    /// 1. `DATABASE_URL` environment variable
    /// 2. Constructed from `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD`, `DB_NAME`
    ///    when `DB_NAME` is set
    ///
    /// Returns `Ok(None)` if neither is configured.
    fn load_database_url() -> Result<Option<String>> {
        if let Ok(url) = env::var("DATABASE_URL") {
            return Ok(Some(url));
        }

        if env::var("DB_NAME").is_err() {
            return Ok(None);
        }

        let host = env::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string());
        let port = env::var("DB_PORT").unwrap_or_else(|_| "5432".to_string());
        let user =
            env::var("DB_USER").context("DB_USER must be set when DATABASE_URL is not provided")?;
        let password = env::var("DB_PASSWORD")
            .context("DB_PASSWORD must be set when DATABASE_URL is not provided")?;
        let name = env::var("DB_NAME")?;

        Ok(Some(format!(
            "postgres://{}:{}@{}:{}/{}",
            user, password, host, port, name
        )))
    }

    /// Loads Redis URL with fallback to component-based configuration.
    ///
    /// Priority:
    /// 1. `REDIS_URL` environment variable
    /// 2. Constructed from `REDIS_HOST`, `REDIS_PORT`, `REDIS_PASSWORD`, `REDIS_DB`
    ///
    /// Returns `None` if Redis is not configured.
    fn load_redis_url() -> Option<String> {
        if let Ok(url) = env::var("REDIS_URL") {
            return Some(url);
        }

        let host = env::var("REDIS_HOST").ok()?;
        let port = env::var("REDIS_PORT").unwrap_or_else(|_| "6379".to_string());
        let db = env::var("REDIS_DB").unwrap_or_else(|_| "0".to_string());

        let url = match env::var("REDIS_PASSWORD") {
            Ok(pwd) if !pwd.is_empty() => format!("redis://:{}@{}:{}/{}", pwd, host, port, db),
            _ => format!("redis://{}:{}/{}", host, port, db),
        };

        Some(url)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the selected backend has no connection URL, or the URL has the wrong scheme
    /// - `GEOCODER_BASE_URL` is not an absolute http(s) URL
    /// - `GEOCODER_TIMEOUT_SECS` is outside 1..=120
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is invalid
    pub fn validate(&self) -> Result<()> {
        match self.cache_backend {
            CacheBackend::Postgres => {
                let Some(ref url) = self.database_url else {
                    anyhow::bail!(
                        "DATABASE_URL (or DB_* components) must be set when CACHE_BACKEND=postgres"
                    );
                };
                if !url.starts_with("postgres://") && !url.starts_with("postgresql://") {
                    anyhow::bail!(
                        "DATABASE_URL must start with 'postgres://' or 'postgresql://', got '{}'",
                        mask_connection_string(url)
                    );
                }
            }
            CacheBackend::Redis => {
                let Some(ref url) = self.redis_url else {
                    anyhow::bail!(
                        "REDIS_URL (or REDIS_HOST) must be set when CACHE_BACKEND=redis"
                    );
                };
                if !url.starts_with("redis://") && !url.starts_with("rediss://") {
                    anyhow::bail!(
                        "REDIS_URL must start with 'redis://' or 'rediss://', got '{}'",
                        mask_connection_string(url)
                    );
                }
            }
            CacheBackend::Memory => {}
        }

        let geocoder_url = url::Url::parse(&self.geocoder_base_url).with_context(|| {
            format!(
                "GEOCODER_BASE_URL is not a valid URL: '{}'",
                self.geocoder_base_url
            )
        })?;
        if !matches!(geocoder_url.scheme(), "http" | "https") {
            anyhow::bail!(
                "GEOCODER_BASE_URL must use http or https, got '{}'",
                geocoder_url.scheme()
            );
        }

        if self.geocoder_timeout_secs == 0 || self.geocoder_timeout_secs > 120 {
            anyhow::bail!(
                "GEOCODER_TIMEOUT_SECS must be between 1 and 120, got {}",
                self.geocoder_timeout_secs
            );
        }

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if self.db_max_connections == 0 {
            anyhow::bail!("DB_MAX_CONNECTIONS must be at least 1");
        }
        if self.db_connect_timeout == 0 {
            anyhow::bail!("DB_CONNECT_TIMEOUT must be greater than 0");
        }

        Ok(())
    }

    /// Returns the upstream request timeout.
    pub fn geocoder_timeout(&self) -> Duration {
        Duration::from_secs(self.geocoder_timeout_secs)
    }

    /// Logs a configuration summary without credentials.
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Cache backend: {}", self.cache_backend);

        match self.cache_backend {
            CacheBackend::Postgres => {
                if let Some(ref url) = self.database_url {
                    tracing::info!("  Database: {}", mask_connection_string(url));
                }
            }
            CacheBackend::Redis => {
                if let Some(ref url) = self.redis_url {
                    tracing::info!("  Redis: {}", mask_connection_string(url));
                }
            }
            CacheBackend::Memory => {}
        }

        tracing::info!("  Geocoder: {}", self.geocoder_base_url);
        tracing::info!("  Geocoder timeout: {}s", self.geocoder_timeout_secs);
        tracing::info!(
            "  Google Maps API key: {}",
            if self.google_maps_api_key.is_some() {
                "configured"
            } else {
                "NOT SET"
            }
        );
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
    }
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if required variables are missing or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
