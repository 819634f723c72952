use std::{fmt, str::FromStr};

use tracing_subscriber::EnvFilter;

/// `LOG_LEVEL` values. `RUST_LOG`, when set, overrides it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Error,
}

impl LogLevel {
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "ERROR" => Ok(LogLevel::Error),
            _ => Err("expected one of DEBUG, INFO, ERROR".to_owned()),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.directive().to_ascii_uppercase())
    }
}

pub fn filter(level: LogLevel) -> anyhow::Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    // sqlx logs every statement at info
    Ok(EnvFilter::new(level.directive()).add_directive("sqlx=warn".parse()?))
}

pub fn init(level: LogLevel) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(filter(level)?)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))
}
