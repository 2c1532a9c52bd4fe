//! Token store connection pool and initialization.

use std::path::{Path, PathBuf};

use sqlx::SqlitePool;
use tracing::info;

use crate::{
    error::{DbError, DbResult},
    sqlite_runtime::create_file_pool,
};

/// Token store pool wrapper
#[derive(Debug, Clone)]
pub struct TokenDbPool {
    pool: SqlitePool,
}

impl TokenDbPool {
    /// Open the token store, creating the file and running migrations.
    ///
    /// `path` overrides the default location in the user data directory.
    pub async fn open(path: Option<&Path>) -> DbResult<Self> {
        let db_path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::default_path()?,
        };
        info!("Initializing token store at: {}", db_path.display());

        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let pool = create_file_pool(&db_path, 5).await?;

        Self::run_migrations(&pool).await?;

        info!("Token store initialized successfully");
        Ok(Self { pool })
    }

    /// Get the inner SQLx pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Default database file path
    pub fn default_path() -> DbResult<PathBuf> {
        let data_dir = dirs::data_dir().ok_or(DbError::NoConfigDir)?;
        Ok(data_dir.join("spotiford").join("spotiford.sqlite3"))
    }

    pub(crate) async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
        sqlx::migrate!("./migrations/tokens")
            .run(pool)
            .await
            .map_err(|e| DbError::Migration(e.to_string()))?;

        info!("Token store migrations completed");
        Ok(())
    }

    /// Close the pool gracefully
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Create a TokenDbPool from an existing SqlitePool (for testing)
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }
}
