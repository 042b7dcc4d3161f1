//! PostgreSQL connector with pooled connections and startup retry.

use core_config::database::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::time::Duration;
use tracing::{info, log::LevelFilter, warn};

/// Retry configuration for database connections
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    pub max_retries: u32,
    /// Initial delay between retries in milliseconds
    pub initial_delay_ms: u64,
    /// Maximum delay between retries in milliseconds
    pub max_delay_ms: u64,
}

impl RetryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 100,
            max_delay_ms: 5000,
        }
    }
}

/// Connect to PostgreSQL with pooled connection settings
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(database_url);
    opt.max_connections(20)
        .min_connections(2)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .sqlx_logging(true)
        .sqlx_logging_level(LevelFilter::Debug); // SeaORM requires log::LevelFilter

    let db = Database::connect(opt).await?;

    info!("Connected to PostgreSQL");
    Ok(db)
}

/// Connect from config with exponential-backoff retry on startup.
///
/// Transient connection failures during service startup (database still
/// coming up) are retried up to `max_retries` times.
pub async fn connect_with_retry(
    config: &DatabaseConfig,
    retry: Option<RetryConfig>,
) -> Result<DatabaseConnection, DbErr> {
    let retry = retry.unwrap_or_default();
    let mut attempt = 0;
    let mut delay = retry.initial_delay_ms;

    loop {
        match connect(&config.url).await {
            Ok(db) => return Ok(db),
            Err(e) if attempt < retry.max_retries => {
                attempt += 1;
                warn!(
                    attempt = attempt,
                    max_retries = retry.max_retries,
                    delay_ms = delay,
                    error = %e,
                    "Database connection failed, retrying"
                );
                tokio::time::sleep(Duration::from_millis(delay)).await;
                delay = (delay * 2).min(retry.max_delay_ms);
            }
            Err(e) => return Err(e),
        }
    }
}
