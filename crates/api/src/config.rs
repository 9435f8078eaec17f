//! Process configuration, read once from the environment at startup.
//!
//! | Variable | Default |
//! |---|---|
//! | `STOCKROOM_BIND_ADDR` | `0.0.0.0:8080` |
//! | `DATABASE_URL` | unset: in-memory stores |
//! | `STOCKROOM_DB_MAX_CONNECTIONS` | `10` |
//! | `STOCKROOM_DB_ACQUIRE_TIMEOUT_SECS` | `5` |
//! | `STOCKROOM_MAX_PAGE_SIZE` | `100` |
//! | `STOCKROOM_REQUEST_TIMEOUT_SECS` | `10` |
//! | `STOCKROOM_LOG_FORMAT` | `json` (`json` or `compact`) |

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use stockroom_infra::DatabaseSettings;
use stockroom_inventory::ServiceConfig;
use stockroom_observability::{LogConfig, LogFormat};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: cannot parse '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("{var} must be greater than zero")]
    Zero { var: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// `None` runs on the in-memory stores.
    pub database: Option<DatabaseSettings>,
    pub service: ServiceConfig,
    pub request_timeout: Duration,
    pub log: LogConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup (the environment in
    /// production, a map in tests). Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = parse_or(&get, "STOCKROOM_BIND_ADDR", || {
            SocketAddr::from(([0, 0, 0, 0], 8080))
        })?;

        let database = match get("DATABASE_URL") {
            None => None,
            Some(url) => Some(DatabaseSettings {
                url,
                max_connections: positive(
                    parse_or(&get, "STOCKROOM_DB_MAX_CONNECTIONS", || 10)?,
                    "STOCKROOM_DB_MAX_CONNECTIONS",
                )?,
                acquire_timeout: Duration::from_secs(positive(
                    parse_or(&get, "STOCKROOM_DB_ACQUIRE_TIMEOUT_SECS", || 5)?,
                    "STOCKROOM_DB_ACQUIRE_TIMEOUT_SECS",
                )?),
            }),
        };

        let max_page_size = positive(
            parse_or(&get, "STOCKROOM_MAX_PAGE_SIZE", || 100)?,
            "STOCKROOM_MAX_PAGE_SIZE",
        )?;
        let request_timeout = Duration::from_secs(positive(
            parse_or(&get, "STOCKROOM_REQUEST_TIMEOUT_SECS", || 10)?,
            "STOCKROOM_REQUEST_TIMEOUT_SECS",
        )?);
        let format: LogFormat = parse_or(&get, "STOCKROOM_LOG_FORMAT", LogFormat::default)?;

        Ok(Self {
            bind_addr,
            database,
            service: ServiceConfig { max_page_size },
            request_timeout,
            log: LogConfig {
                format,
                ..LogConfig::default()
            },
        })
    }
}

fn parse_or<T, G, D>(get: &G, var: &'static str, default: D) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
    D: FnOnce() -> T,
{
    match get(var) {
        None => Ok(default()),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
            value,
        }),
    }
}

fn positive<T: Default + PartialEq>(value: T, var: &'static str) -> Result<T, ConfigError> {
    if value == T::default() {
        return Err(ConfigError::Zero { var });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_without_any_variable() {
        let config = from_pairs(&[]).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:8080".parse().unwrap());
        assert!(config.database.is_none());
        assert_eq!(config.service.max_page_size, 100);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.log.format, LogFormat::Json);
    }

    #[test]
    fn database_settings_follow_database_url() {
        let config = from_pairs(&[
            ("DATABASE_URL", "postgres://localhost/stockroom"),
            ("STOCKROOM_DB_MAX_CONNECTIONS", "4"),
        ])
        .unwrap();
        let db = config.database.unwrap();
        assert_eq!(db.url, "postgres://localhost/stockroom");
        assert_eq!(db.max_connections, 4);
        assert_eq!(db.acquire_timeout, Duration::from_secs(5));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = from_pairs(&[("DATABASE_URL", "  "), ("STOCKROOM_LOG_FORMAT", "")]).unwrap();
        assert!(config.database.is_none());
        assert_eq!(config.log.format, LogFormat::Json);
    }

    #[test]
    fn invalid_values_name_the_variable() {
        let err = from_pairs(&[("STOCKROOM_MAX_PAGE_SIZE", "lots")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "STOCKROOM_MAX_PAGE_SIZE", .. }));

        let err = from_pairs(&[("STOCKROOM_LOG_FORMAT", "xml")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "STOCKROOM_LOG_FORMAT", .. }));
    }

    #[test]
    fn zero_limits_are_rejected() {
        let err = from_pairs(&[("STOCKROOM_REQUEST_TIMEOUT_SECS", "0")]).unwrap_err();
        assert_eq!(err, ConfigError::Zero { var: "STOCKROOM_REQUEST_TIMEOUT_SECS" });
    }
}
