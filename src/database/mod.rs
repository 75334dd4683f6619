use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::DatabaseConfig;

/// Shared SQLite connection pool, opened once at startup and closed on shutdown
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    pub fn pool(&self) -> Pool<Sqlite> {
        self.pool.clone()
    }

    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        if let Some(parent) = sqlite_file_path(&config.url).and_then(Path::parent) {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .connect_with(options)
            .await?;

        debug!(
            "Opened SQLite pool for {} (max {} connections)",
            config.url, config.max_connections
        );

        Ok(Self { pool })
    }

    /// Private in-memory database on a single pinned connection
    pub async fn new_in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Apply the embedded bootstrap schema
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Database schema is up to date");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}

/// File path portion of a `sqlite:` URL, or `None` for in-memory databases
fn sqlite_file_path(url: &str) -> Option<&Path> {
    let rest = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or(rest);

    if path.is_empty() || path == ":memory:" {
        None
    } else {
        Some(Path::new(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_path_from_url() {
        assert_eq!(
            sqlite_file_path("sqlite://./db/mercari.sqlite3"),
            Some(Path::new("./db/mercari.sqlite3"))
        );
        assert_eq!(
            sqlite_file_path("sqlite:data.db?mode=rwc"),
            Some(Path::new("data.db"))
        );
        assert_eq!(sqlite_file_path("sqlite::memory:"), None);
        assert_eq!(sqlite_file_path("postgres://localhost/db"), None);
    }

    #[tokio::test]
    async fn creates_file_and_parent_directory() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("db").join("mercari.sqlite3");
        let config = DatabaseConfig {
            url: format!("sqlite://{}", db_path.display()),
            ..DatabaseConfig::default()
        };

        let database = Database::new(&config).await.unwrap();
        database.migrate().await.unwrap();
        database.close().await;

        assert!(db_path.exists());
    }

    #[tokio::test]
    async fn migration_is_idempotent() {
        let database = Database::new_in_memory().await.unwrap();
        database.migrate().await.unwrap();
        database.migrate().await.unwrap();

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('items', 'categories') ORDER BY name",
        )
        .fetch_all(&database.pool())
        .await
        .unwrap();
        assert_eq!(tables, vec!["categories".to_string(), "items".to_string()]);
    }
}
