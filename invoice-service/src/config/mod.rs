//! Configuration module for invoice-service.

use dashboard_core::config as core_config;
use dashboard_core::error::AppError;
use secrecy::Secret;
use sqlx::postgres::PgSslMode;
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct InvoiceConfig {
    pub common: core_config::Config,
    pub service_name: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: Secret<String>,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub ssl_mode: PgSslMode,
}

impl InvoiceConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        Ok(Self {
            common,
            service_name: env::var("SERVICE_NAME").unwrap_or_else(|_| "invoice-service".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|s| !s.is_empty()),
            database: DatabaseConfig {
                url: Secret::new(env::var("POSTGRES_URL").map_err(|_| {
                    AppError::ConfigError(anyhow::anyhow!("POSTGRES_URL is required"))
                })?),
                max_connections: parse_or(env::var("DATABASE_MAX_CONNECTIONS").ok(), 10),
                min_connections: parse_or(env::var("DATABASE_MIN_CONNECTIONS").ok(), 1),
                acquire_timeout: Duration::from_secs(parse_or(
                    env::var("DATABASE_ACQUIRE_TIMEOUT_SECS").ok(),
                    30,
                )),
                ssl_mode: parse_ssl_mode(env::var("DATABASE_SSL_MODE").ok().as_deref())?,
            },
        })
    }
}

/// Parse an optional numeric setting, keeping the default on absence or garbage.
fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|s| s.trim().parse().ok()).unwrap_or(default)
}

/// Connections require TLS unless told otherwise.
fn parse_ssl_mode(value: Option<&str>) -> Result<PgSslMode, AppError> {
    match value {
        None => Ok(PgSslMode::Require),
        Some(mode) => PgSslMode::from_str(mode.trim()).map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!("Invalid DATABASE_SSL_MODE '{}': {}", mode, e))
        }),
    }
}
