use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use game_core::DEFAULT_LEADERBOARD_SIZE;
use game_persistence::connection::DEFAULT_DATABASE_URL;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Sqlite,
    Rest,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "rest" => Ok(Self::Rest),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown record store backend {:?}", other)),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: String, value: String },
    #[error("{key} must be set when RECORD_STORE=rest")]
    Missing { key: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub record_store: StoreBackend,
    pub database_url: String,
    pub record_store_url: Option<String>,
    pub record_store_key: Option<String>,
    pub record_store_timeout_seconds: u64,
    pub leaderboard_size: u64,
    pub session_timeout_minutes: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key/value source; unset keys take their defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let config = Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_value(&lookup, "PORT", 8080)?,
            record_store: parse_value(&lookup, "RECORD_STORE", StoreBackend::Sqlite)?,
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            record_store_url: lookup("RECORD_STORE_URL"),
            record_store_key: lookup("RECORD_STORE_KEY"),
            record_store_timeout_seconds: parse_value(
                &lookup,
                "RECORD_STORE_TIMEOUT_SECONDS",
                5,
            )?,
            leaderboard_size: parse_value(
                &lookup,
                "LEADERBOARD_SIZE",
                DEFAULT_LEADERBOARD_SIZE,
            )?,
            session_timeout_minutes: parse_value(&lookup, "SESSION_TIMEOUT_MINUTES", 30)?,
        };

        if config.record_store == StoreBackend::Rest {
            for (key, value) in [
                ("RECORD_STORE_URL", &config.record_store_url),
                ("RECORD_STORE_KEY", &config.record_store_key),
            ] {
                if value.is_none() {
                    return Err(ConfigError::Missing {
                        key: key.to_string(),
                    });
                }
            }
        }

        if config.leaderboard_size == 0 {
            return Err(ConfigError::Invalid {
                key: "LEADERBOARD_SIZE".to_string(),
                value: "0".to_string(),
            });
        }

        Ok(config)
    }

    /// Idle time after which a session is dropped
    pub fn session_timeout(&self) -> Duration {
        Duration::from_secs(self.session_timeout_minutes.saturating_mul(60))
    }
}

fn parse_value<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            key: key.to_string(),
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.record_store, StoreBackend::Sqlite);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.leaderboard_size, 10);
        assert_eq!(config.session_timeout_minutes, 30);
        assert_eq!(config.record_store_timeout_seconds, 5);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "9000"),
            ("RECORD_STORE", "Memory"),
            ("LEADERBOARD_SIZE", "25"),
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.record_store, StoreBackend::Memory);
        assert_eq!(config.leaderboard_size, 25);
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            config_from(&[("PORT", "eighty")]).unwrap_err(),
            ConfigError::Invalid {
                key: "PORT".to_string(),
                value: "eighty".to_string()
            }
        );
        assert!(config_from(&[("RECORD_STORE", "redis")]).is_err());
        assert!(config_from(&[("LEADERBOARD_SIZE", "0")]).is_err());
    }

    #[test]
    fn test_rest_backend_requires_url_and_key() {
        assert_eq!(
            config_from(&[("RECORD_STORE", "rest")]).unwrap_err(),
            ConfigError::Missing {
                key: "RECORD_STORE_URL".to_string()
            }
        );
        assert_eq!(
            config_from(&[("RECORD_STORE", "rest"), ("RECORD_STORE_URL", "https://example.test")])
                .unwrap_err(),
            ConfigError::Missing {
                key: "RECORD_STORE_KEY".to_string()
            }
        );

        let config = config_from(&[
            ("RECORD_STORE", "rest"),
            ("RECORD_STORE_URL", "https://example.test"),
            ("RECORD_STORE_KEY", "anon"),
        ])
        .unwrap();
        assert_eq!(config.record_store_url.as_deref(), Some("https://example.test"));
    }

    #[test]
    fn test_session_timeout() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.session_timeout(), Duration::from_secs(30 * 60));

        let config = config_from(&[("SESSION_TIMEOUT_MINUTES", "18446744073709551615")]).unwrap();
        assert_eq!(config.session_timeout(), Duration::from_secs(u64::MAX));
    }
}
