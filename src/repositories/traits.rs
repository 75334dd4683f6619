//! Repository trait definitions
//!
//! Both persistence adapters (SQLite and the flat JSON document) implement
//! these traits, so handlers and services never know which one is active.

use async_trait::async_trait;

use crate::errors::{RepositoryError, RepositoryResult};
use crate::models::{Category, Item, NewItem};

/// Category lookup and creation
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// All categories in insertion order
    async fn list(&self) -> RepositoryResult<Vec<Category>>;

    /// Find a category by its ID
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Category))` - Category found
    /// * `Ok(None)` - Category not found
    /// * `Err(RepositoryError)` - Storage failure
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Category>>;

    /// Resolve a category name to its ID.
    ///
    /// Names are not unique; when several categories share a name the one
    /// with the lowest ID wins.
    async fn find_id_by_name(&self, name: &str) -> RepositoryResult<Option<i64>>;

    /// Insert a category. No duplicate check is performed.
    async fn create(&self, name: &str) -> RepositoryResult<Category>;

    /// Like [`Self::find_by_id`], but a missing row is an error
    async fn get_by_id(&self, id: i64) -> RepositoryResult<Category> {
        self.find_by_id(id).await?.ok_or_else(|| {
            RepositoryError::record_not_found("categories", "id", id.to_string())
        })
    }

    /// Like [`Self::find_id_by_name`], but a missing name is an error
    async fn get_id_by_name(&self, name: &str) -> RepositoryResult<i64> {
        self.find_id_by_name(name)
            .await?
            .ok_or_else(|| RepositoryError::record_not_found("categories", "name", name))
    }
}

/// Item listing, search and insertion
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// All items in storage order
    async fn list(&self) -> RepositoryResult<Vec<Item>>;

    /// Find an item by its ID
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Item>>;

    /// Items whose name contains `keyword`. An empty keyword matches everything.
    async fn search(&self, keyword: &str) -> RepositoryResult<Vec<Item>>;

    /// Insert a row and return it with its store-assigned ID
    async fn insert(&self, item: NewItem) -> RepositoryResult<Item>;

    /// Like [`Self::find_by_id`], but a missing row is an error
    async fn get_by_id(&self, id: i64) -> RepositoryResult<Item> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::record_not_found("items", "id", id.to_string()))
    }
}
