//! # Service Configuration
//!
//! Read once at startup from environment variables:
//!
//! | Variable                    | Default   | Meaning |
//! |-----------------------------|-----------|---------|
//! | `PORT`                      | `8080`    | HTTP port |
//! | `PRONTUARIO_BIND`           | `0.0.0.0` | Bind address |
//! | `DATABASE_URL`              | unset     | PostgreSQL URL; unset means in-memory store |
//! | `PRONTUARIO_DATA_FILE`      | unset     | YAML/JSON drafts loaded into the in-memory store |
//! | `PRONTUARIO_SEED_EXAMPLES`  | `true`    | Seed the example records into an empty in-memory store |
//! | `PRONTUARIO_LOG_FORMAT`     | `text`    | `text` or `json` |
//!
//! Invalid values are reported as [`ConfigError`], never a panic.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::InvalidLogFormat(s.to_string())),
        }
    }
}

/// Service configuration.
///
/// Custom `Debug` redacts the database URL, which usually embeds a password.
#[derive(Clone)]
pub struct AppConfig {
    pub port: u16,
    pub bind: IpAddr,
    pub database_url: Option<String>,
    pub data_file: Option<PathBuf>,
    pub seed_examples: bool,
    pub log_format: LogFormat,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("bind", &self.bind)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[REDACTED]"),
            )
            .field("data_file", &self.data_file)
            .field("seed_examples", &self.seed_examples)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            database_url: None,
            data_file: None,
            seed_examples: true,
            log_format: LogFormat::Text,
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through `lookup`, which returns a variable's value
    /// if it is set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let set = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let port = match set("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => defaults.port,
        };
        let bind = match set("PRONTUARIO_BIND") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidBind(raw))?,
            None => defaults.bind,
        };
        let seed_examples = match set("PRONTUARIO_SEED_EXAMPLES") {
            Some(raw) => parse_bool("PRONTUARIO_SEED_EXAMPLES", &raw)?,
            None => defaults.seed_examples,
        };
        let log_format = match set("PRONTUARIO_LOG_FORMAT") {
            Some(raw) => raw.trim().parse()?,
            None => defaults.log_format,
        };

        Ok(Self {
            port,
            bind,
            database_url: set("DATABASE_URL"),
            data_file: set("PRONTUARIO_DATA_FILE").map(PathBuf::from),
            seed_examples,
            log_format,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

fn parse_bool(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            var,
            value: raw.to_string(),
        }),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("PORT must be a number between 0 and 65535, got {0:?}")]
    InvalidPort(String),
    #[error("PRONTUARIO_BIND must be an IP address, got {0:?}")]
    InvalidBind(String),
    #[error("{var} must be true or false, got {value:?}")]
    InvalidBool { var: &'static str, value: String },
    #[error("PRONTUARIO_LOG_FORMAT must be text or json, got {0:?}")]
    InvalidLogFormat(String),
}
