use crate::core::{AppError, Result};
use std::env;

pub mod billing;
pub mod database;
pub mod server;

pub use billing::BillingConfig;
pub use database::DatabaseConfig;
pub use server::ServerConfig;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub billing: BillingConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
    pub log_format: LogFormat,
    pub cors_allowed_origin: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Where aggregates are persisted
#[derive(Debug, Clone)]
pub enum StorageConfig {
    Memory,
    MySql(DatabaseConfig),
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let log_format = match env::var("LOG_FORMAT")
            .unwrap_or_else(|_| "pretty".to_string())
            .to_lowercase()
            .as_str()
        {
            "json" => LogFormat::Json,
            "pretty" | "text" => LogFormat::Pretty,
            other => {
                return Err(AppError::Configuration(format!(
                    "Invalid LOG_FORMAT '{}'. Expected 'pretty' or 'json'",
                    other
                )))
            }
        };

        let storage = match env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "memory".to_string())
            .to_lowercase()
            .as_str()
        {
            "memory" => StorageConfig::Memory,
            "mysql" => StorageConfig::MySql(DatabaseConfig::from_env()?),
            other => {
                return Err(AppError::Configuration(format!(
                    "Invalid STORAGE_BACKEND '{}'. Expected 'memory' or 'mysql'",
                    other
                )))
            }
        };

        let config = Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "debug".to_string()),
                log_format,
                cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                    .ok()
                    .filter(|origin| !origin.trim().is_empty()),
            },
            server: ServerConfig::from_env()?,
            storage,
            billing: BillingConfig::from_env()?,
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.server.validate()?;
        self.billing.validate()?;

        if let StorageConfig::MySql(database) = &self.storage {
            if database.pool_size > database.max_connections {
                return Err(AppError::Configuration(
                    "DATABASE_POOL_SIZE cannot exceed DATABASE_MAX_CONNECTIONS".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Reads an optional numeric variable, falling back to `default`
pub(crate) fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Configuration(format!("Invalid {}", name))),
        Err(_) => Ok(default),
    }
}
