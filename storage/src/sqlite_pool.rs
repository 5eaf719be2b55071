//! SQLite connection pool wrapper for the storage crate.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

/// Manages a single SQLite pool; creates the DB file (and its directory) if missing.
#[derive(Clone)]
pub struct SqlitePoolManager {
    pool: SqlitePool,
}

impl SqlitePoolManager {
    /// Creates a pool for the given database path, `sqlite:` URL, or `:memory:`.
    ///
    /// In-memory databases are per connection, so they get a single-connection pool.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        info!(database_url = %database_url, "Initializing SQLite pool");

        if database_url == ":memory:" || database_url.starts_with("sqlite::memory:") {
            let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
            let pool = SqlitePoolOptions::new()
                .max_connections(1)
                .connect_with(options)
                .await?;
            return Ok(Self { pool });
        }

        let path = database_url
            .strip_prefix("sqlite://")
            .or_else(|| database_url.strip_prefix("sqlite:"))
            .or_else(|| database_url.strip_prefix("file:"))
            .unwrap_or(database_url);

        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .create_if_missing(true)
            .filename(path);

        let pool = SqlitePool::connect_with(options).await?;

        Ok(Self { pool })
    }

    /// Returns the underlying pool for running queries.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
