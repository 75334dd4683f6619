//! Repository pattern implementation for data access
//!
//! Handlers and services talk to [`ItemRepository`] and
//! [`CategoryRepository`] trait objects. Two adapters exist:
//!
//! - [`SqliteItemRepository`] / [`SqliteCategoryRepository`] over a shared pool
//! - [`JsonFileStore`], a single JSON document implementing both traits
//!
//! [`Repositories::connect`] picks one according to the configured backend.

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

pub mod category;
pub mod item;
pub mod json_file;
pub mod traits;

pub use category::SqliteCategoryRepository;
pub use item::SqliteItemRepository;
pub use json_file::JsonFileStore;
pub use traits::*;

use crate::config::{DatabaseBackend, DatabaseConfig};
use crate::database::Database;

/// The active pair of repositories plus whatever handle owns their storage
#[derive(Clone)]
pub struct Repositories {
    pub items: Arc<dyn ItemRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    database: Option<Database>,
}

impl Repositories {
    /// Open the configured backend, applying the schema for SQLite
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        match config.backend {
            DatabaseBackend::Sqlite => {
                info!("Using SQLite database: {}", config.url);
                let database = Database::new(config).await?;
                database.migrate().await?;
                Ok(Self::sqlite(database))
            }
            DatabaseBackend::Json => {
                info!("Using JSON file store: {}", config.json_path.display());
                Ok(Self::json(JsonFileStore::new(config.json_path.clone())))
            }
        }
    }

    pub fn sqlite(database: Database) -> Self {
        Self {
            items: Arc::new(SqliteItemRepository::new(database.pool())),
            categories: Arc::new(SqliteCategoryRepository::new(database.pool())),
            database: Some(database),
        }
    }

    pub fn json(store: JsonFileStore) -> Self {
        let store = Arc::new(store);
        Self {
            items: store.clone(),
            categories: store,
            database: None,
        }
    }

    /// Release pooled connections; a no-op for the JSON backend
    pub async fn close(&self) {
        if let Some(database) = &self.database {
            database.close().await;
        }
    }
}
