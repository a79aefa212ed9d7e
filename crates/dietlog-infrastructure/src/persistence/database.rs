use dietlog_domain::shared::DomainError;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use super::RepositoryErrorMapper;
use crate::config::DatabaseConfig;

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn new(config: &DatabaseConfig) -> Result<Self, DomainError> {
        if let Some(parent) = config.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                DomainError::Infrastructure(format!("Failed to create DB directory: {}", e))
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(&config.path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(config.busy_timeout);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_with(options)
            .await
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Connect database"))?;

        info!(
            path = %config.path.display(),
            max_connections = config.max_connections,
            "Database pool ready"
        );

        Ok(Self { pool })
    }

    /// Private in-memory database.
    ///
    /// Uses a single connection that is never recycled, since every SQLite
    /// memory connection is its own database.
    pub async fn in_memory() -> Result<Self, DomainError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Parse memory URL"))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Connect memory database"))?;

        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> Result<(), DomainError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| RepositoryErrorMapper::map_migrate_error(e, "Run migrations"))?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
