pub mod operations;
pub mod schema;

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use thiserror::Error;

use crate::config::Config;
use crate::db::schema::{split_sql_statements, SCHEMA_SQL};

/// Handle on the persistent store. Thin wrapper over a SQLite pool; all
/// reads and writes go through `sqlx` queries in `operations`.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn from_env() -> Result<Self, DbInitError> {
        Self::from_config(&Config::from_env()).await
    }

    pub async fn from_config(config: &Config) -> Result<Self, DbInitError> {
        let url = config
            .database_url
            .as_deref()
            .ok_or(DbInitError::MissingDatabaseUrl)?;
        Self::connect(url).await
    }

    pub async fn connect(url: &str) -> Result<Self, DbInitError> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(30));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.bootstrap().await?;
        Ok(db)
    }

    /// In-memory store for tests. A single connection, so every query sees
    /// the same database.
    pub async fn in_memory() -> Result<Self, DbInitError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.bootstrap().await?;
        Ok(db)
    }

    async fn bootstrap(&self) -> Result<(), sqlx::Error> {
        for statement in split_sql_statements(SCHEMA_SQL) {
            sqlx::query(&statement).execute(&self.pool).await?;
        }
        tracing::debug!("database schema ready");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[derive(Debug, Error)]
pub enum DbInitError {
    #[error("DATABASE_URL is not set")]
    MissingDatabaseUrl,
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}
