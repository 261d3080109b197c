//! Runtime configuration for the exporter.
//!
//! Everything comes in through the CLI flags; validation happens once at
//! startup and any [`ConfigError`] is fatal before serving begins.

use std::str::FromStr;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("service URL must not be empty")]
    EmptyServiceUrl,

    #[error("invalid service URL {url:?}: {reason}")]
    InvalidServiceUrl { url: String, reason: String },

    #[error(
        "invalid log level {value:?}, expected one of: panic, fatal, error, warn, info, debug, trace"
    )]
    InvalidLogLevel { value: String },
}

/// Minimum severity emitted to the log output.
///
/// `panic` and `fatal` are accepted as aliases of `error` so existing
/// deployments keep their flag values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "panic" | "fatal" | "error" => Ok(LogLevel::Error),
            "warn" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(ConfigError::InvalidLogLevel {
                value: s.to_string(),
            }),
        }
    }
}

impl LogLevel {
    pub fn as_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

/// Validated application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub service_url: Url,
    pub port: u16,
    pub log_level: LogLevel,
}

impl Config {
    pub fn new(service: &str, port: u16, log_level: &str) -> Result<Self, ConfigError> {
        if service.trim().is_empty() {
            return Err(ConfigError::EmptyServiceUrl);
        }

        let service_url = Url::parse(service).map_err(|e| ConfigError::InvalidServiceUrl {
            url: service.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            service_url,
            port,
            log_level: log_level.parse()?,
        })
    }
}
