//! Runtime configuration read from the environment (and `.env` via dotenvy).

use std::{net::SocketAddr, path::PathBuf};

use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub listen: SocketAddr,
    pub jwt_secret: String,
    pub monitoring_log_dir: PathBuf,
    pub db_max_connections: u32,
    /// Create missing tables on startup.
    pub auto_migrate: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| dotenvy::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| lookup(name).ok_or(ConfigError::Missing(name));

        let listen = match lookup("LISTEN_ADDR") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "LISTEN_ADDR",
                value,
            })?,
            None => SocketAddr::from(([0, 0, 0, 0], 8080)),
        };

        let db_max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "DB_MAX_CONNECTIONS",
                value,
            })?,
            None => 10,
        };

        let auto_migrate = match lookup("AUTO_MIGRATE").as_deref() {
            None | Some("") | Some("0") | Some("false") => false,
            Some("1") | Some("true") => true,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "AUTO_MIGRATE",
                    value: other.to_string(),
                });
            }
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            listen,
            jwt_secret: required("JWT_SECRET")?,
            monitoring_log_dir: lookup("MONITORING_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./logs")),
            db_max_connections,
            auto_migrate,
        })
    }
}
