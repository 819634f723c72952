use std::time::Duration;

use thiserror::Error;

use crate::logging::LogLevel;

pub const DEFAULT_ROOM_TTL: Duration = Duration::from_secs(3600);
/// Longest accepted `ROOM_TTL_SECS`, one year.
pub const MAX_ROOM_TTL: Duration = Duration::from_secs(365 * 24 * 3600);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key}={value:?} is invalid: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub log_level: LogLevel,
    pub room_ttl: Duration,
    pub service_name: String,
}

impl Config {
    /// Reads the process environment, with `.env` filling in anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let database_url = var("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".to_owned());

        let port = match var("PORT") {
            Some(value) => value.trim().parse::<u16>().map_err(|err| ConfigError::Invalid {
                key: "PORT",
                reason: err.to_string(),
                value,
            })?,
            None => 8080,
        };

        let log_level = match var("LOG_LEVEL") {
            Some(value) => value
                .parse::<LogLevel>()
                .map_err(|reason| ConfigError::Invalid {
                    key: "LOG_LEVEL",
                    value,
                    reason,
                })?,
            None => LogLevel::default(),
        };

        let room_ttl = match var("ROOM_TTL_SECS") {
            Some(value) => match value.trim().parse::<u64>() {
                Ok(0) => {
                    return Err(ConfigError::Invalid {
                        key: "ROOM_TTL_SECS",
                        value,
                        reason: "must be positive".to_owned(),
                    });
                }
                Ok(secs) if secs > MAX_ROOM_TTL.as_secs() => {
                    return Err(ConfigError::Invalid {
                        key: "ROOM_TTL_SECS",
                        value,
                        reason: format!("must be at most {}", MAX_ROOM_TTL.as_secs()),
                    });
                }
                Ok(secs) => Duration::from_secs(secs),
                Err(err) => {
                    return Err(ConfigError::Invalid {
                        key: "ROOM_TTL_SECS",
                        reason: err.to_string(),
                        value,
                    });
                }
            },
            None => DEFAULT_ROOM_TTL,
        };

        let service_name = var("SERVICE_NAME").unwrap_or_else(|| env!("CARGO_PKG_NAME").to_owned());

        Ok(Self {
            database_url,
            host,
            port,
            log_level,
            room_ttl,
            service_name,
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
