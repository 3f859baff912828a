//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use tracing::Level;

use mood_journal_core::aggregator::DEFAULT_PAGE_SIZE;

/// Upper bound on `QUERY_PAGE_SIZE`.
pub const MAX_QUERY_PAGE_SIZE: u32 = 1000;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Which `DocumentStore` implementation backs the service.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!("'{}' is not one of: postgres, memory", other)),
        }
    }
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub log_level: Level,
    pub query_page_size: usize,
    pub request_timeout: Duration,
    pub cors_allowed_origin: String,
}

impl Default for Config {
    /// In-memory settings, used by tests and local experiments.
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([127, 0, 0, 1], 3000)),
            store_backend: StoreBackend::Memory,
            database_url: None,
            database_max_connections: 5,
            log_level: Level::INFO,
            query_page_size: DEFAULT_PAGE_SIZE,
            request_timeout: Duration::from_secs(10),
            cors_allowed_origin: "http://localhost:8081".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Server Settings ---
        let bind_address_str =
            lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let cors_allowed_origin = lookup("CORS_ALLOWED_ORIGIN")
            .unwrap_or_else(|| "http://localhost:8081".to_string());

        // --- Store Settings ---
        let store_backend = lookup("STORE_BACKEND")
            .unwrap_or_else(|| "postgres".to_string())
            .parse::<StoreBackend>()
            .map_err(|e| ConfigError::InvalidValue("STORE_BACKEND".to_string(), e))?;

        let database_url = lookup("DATABASE_URL");
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::MissingVar("DATABASE_URL".to_string()));
        }

        let database_max_connections: u32 = parse_positive(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?;
        let query_page_size: u32 =
            parse_positive(&lookup, "QUERY_PAGE_SIZE", DEFAULT_PAGE_SIZE as u32)?;
        if query_page_size > MAX_QUERY_PAGE_SIZE {
            return Err(ConfigError::InvalidValue(
                "QUERY_PAGE_SIZE".to_string(),
                format!("{} exceeds the maximum of {}", query_page_size, MAX_QUERY_PAGE_SIZE),
            ));
        }
        let request_timeout_ms: u64 = parse_positive(&lookup, "REQUEST_TIMEOUT_MS", 10_000)?;

        Ok(Self {
            bind_address,
            store_backend,
            database_url,
            database_max_connections,
            log_level,
            query_page_size: query_page_size as usize,
            request_timeout: Duration::from_millis(request_timeout_ms),
            cors_allowed_origin,
        })
    }
}

/// Reads an integer variable that must be at least 1, falling back to `default`.
fn parse_positive<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + PartialOrd + From<u8>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match raw.parse::<T>() {
        Ok(value) if value >= T::from(1) => Ok(value),
        _ => Err(ConfigError::InvalidValue(
            key.to_string(),
            format!("'{}' is not a positive integer", raw),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn postgres_backend_requires_database_url() {
        let err = load(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(var) if var == "DATABASE_URL"));
    }

    #[test]
    fn memory_backend_uses_defaults() {
        let config = load(&[("STORE_BACKEND", "memory")]).unwrap();
        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(config.query_page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.request_timeout, Duration::from_millis(10_000));
        assert_eq!(config.bind_address.port(), 3000);
    }

    #[test]
    fn rejects_oversized_page_size() {
        for raw in ["1001", "18446744073709551615"] {
            let err = load(&[("STORE_BACKEND", "memory"), ("QUERY_PAGE_SIZE", raw)]).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue(var, _) if var == "QUERY_PAGE_SIZE"));
        }
        let config = load(&[("STORE_BACKEND", "memory"), ("QUERY_PAGE_SIZE", "1000")]).unwrap();
        assert_eq!(config.query_page_size, 1000);
    }

    #[test]
    fn rejects_zero_page_size() {
        let err = load(&[("STORE_BACKEND", "memory"), ("QUERY_PAGE_SIZE", "0")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(var, _) if var == "QUERY_PAGE_SIZE"));
    }

    #[test]
    fn rejects_unknown_backend() {
        let err = load(&[("STORE_BACKEND", "firestore")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(var, _) if var == "STORE_BACKEND"));
    }
}
