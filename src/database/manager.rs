use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from the document store and its connection pool
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate value for unique field: {0}")]
    Duplicate(&'static str),

    #[error("Document version changed since it was read")]
    VersionConflict,

    #[error("Document serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Owns the process-wide Postgres pool
pub struct DatabaseManager;

impl DatabaseManager {
    fn slot() -> &'static OnceLock<PgPool> {
        static POOL: OnceLock<PgPool> = OnceLock::new();
        &POOL
    }

    /// Connect once; later calls hand back the same pool
    pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        if let Some(pool) = Self::slot().get() {
            return Ok(pool.clone());
        }

        let connection_string = Self::build_connection_string(config)?;
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(&connection_string)
            .await?;

        // A concurrent caller may have won the race; keep theirs
        let pool = Self::slot().get_or_init(|| pool).clone();
        info!("Connected database pool (max {} connections)", config.max_connections);
        Ok(pool)
    }

    fn build_connection_string(config: &DatabaseConfig) -> Result<String, DatabaseError> {
        let base = config
            .url
            .as_deref()
            .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;

        let mut url = url::Url::parse(base).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        if let Some(name) = config.name.as_deref() {
            if !Self::is_valid_db_name(name) {
                return Err(DatabaseError::InvalidDatabaseUrl);
            }
            url.set_path(&format!("/{}", name));
        }
        Ok(url.into())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    pub async fn close() {
        if let Some(pool) = Self::slot().get() {
            pool.close().await;
            info!("Closed database pool");
        }
    }

    fn is_valid_db_name(name: &str) -> bool {
        !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    }
}
