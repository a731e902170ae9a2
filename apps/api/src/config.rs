//! API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable             | Default           |
//! |----------------------|-------------------|
//! | `HTTP_HOST`          | `0.0.0.0`         |
//! | `HTTP_PORT`          | `9999`            |
//! | `DATABASE_PATH`      | `./data/tally.db` |
//! | `DB_MAX_CONNECTIONS` | `5`               |
//! | `TOKEN_TTL_SECS`     | `3600`            |

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use tally_core::DEFAULT_TOKEN_TTL_SECS;
use tally_db::DbConfig;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Interface to bind
    pub http_host: String,

    /// HTTP port
    pub http_port: u16,

    /// SQLite database file
    pub database_path: PathBuf,

    /// Pool size
    pub db_max_connections: u32,

    /// Lifetime of every issued bearer token, in seconds
    pub token_ttl_secs: i64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            http_host: "0.0.0.0".to_string(),
            http_port: 9999,
            database_path: PathBuf::from("./data/tally.db"),
            db_max_connections: 5,
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ApiConfig::default();

        let config = ApiConfig {
            http_host: lookup("HTTP_HOST").unwrap_or(defaults.http_host),
            http_port: parse_or(&lookup, "HTTP_PORT", defaults.http_port)?,
            database_path: lookup("DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", defaults.db_max_connections)?,
            token_ttl_secs: parse_or(&lookup, "TOKEN_TTL_SECS", defaults.token_ttl_secs)?,
        };

        if config.token_ttl_secs <= 0 {
            return Err(ConfigError::InvalidValue("TOKEN_TTL_SECS".to_string()));
        }

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()));
        }

        Ok(config)
    }

    /// Token lifetime as a duration.
    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.token_ttl_secs)
    }

    /// Database pool settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path).max_connections(self.db_max_connections)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
