//! Listing service
//!
//! Coordinates items, categories and the image store. Item creation is the
//! only multi-step operation: the category is resolved before anything is
//! written, and a freshly written image is removed again if the row insert
//! fails.

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::errors::{AppError, AppResult};
use crate::image_assets::ImageStore;
use crate::models::{Category, Item, ItemCreateRequest, NewItem};
use crate::repositories::Repositories;

#[derive(Clone)]
pub struct ListingService {
    repositories: Repositories,
    images: ImageStore,
    /// Held from image write to row insert so `StoredImage::created` stays accurate
    create_lock: Arc<Mutex<()>>,
}

impl ListingService {
    pub fn new(repositories: Repositories, images: ImageStore) -> Self {
        Self {
            repositories,
            images,
            create_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn images(&self) -> &ImageStore {
        &self.images
    }

    pub async fn list_items(&self) -> AppResult<Vec<Item>> {
        Ok(self.repositories.items.list().await?)
    }

    pub async fn get_item(&self, id: i64) -> AppResult<Item> {
        Ok(self.repositories.items.get_by_id(id).await?)
    }

    pub async fn search_items(&self, keyword: &str) -> AppResult<Vec<Item>> {
        Ok(self.repositories.items.search(keyword).await?)
    }

    /// Resolve the category, store the image, then insert the row.
    ///
    /// An unknown category fails before any file or row is written. If the
    /// insert fails, the image is deleted again only when this call created
    /// it; a file shared with earlier uploads is left alone. Creations are
    /// serialized from the image write onwards, otherwise a concurrent upload
    /// of the same bytes could reference a file this call is about to delete.
    pub async fn create_item(&self, request: ItemCreateRequest) -> AppResult<Item> {
        if request.name.trim().is_empty() {
            return Err(AppError::validation("name is required"));
        }
        if request.category.trim().is_empty() {
            return Err(AppError::validation("category is required"));
        }

        let category_id = self
            .repositories
            .categories
            .get_id_by_name(&request.category)
            .await?;

        let _guard = self.create_lock.lock().await;
        let stored = self.images.put(&request.image).await?;

        let new_item = NewItem {
            name: request.name,
            category_id,
            image_name: stored.file_name.clone(),
        };

        match self.repositories.items.insert(new_item).await {
            Ok(item) => {
                info!(
                    "Receive item: {} (id {}, image {})",
                    item.name, item.id, item.image_name
                );
                Ok(item)
            }
            Err(insert_error) => {
                error!("Failed to insert item row: {}", insert_error);
                if stored.created {
                    if let Err(cleanup_error) = self.images.remove(&stored.file_name).await {
                        warn!(
                            "Failed to remove orphaned image {}: {}",
                            stored.file_name, cleanup_error
                        );
                    }
                }
                Err(insert_error.into())
            }
        }
    }

    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        Ok(self.repositories.categories.list().await?)
    }

    pub async fn get_category(&self, id: i64) -> AppResult<Category> {
        Ok(self.repositories.categories.get_by_id(id).await?)
    }

    pub async fn create_category(&self, name: &str) -> AppResult<Category> {
        if name.trim().is_empty() {
            return Err(AppError::validation("name is required"));
        }

        let category = self.repositories.categories.create(name).await?;
        info!("Receive category: {} (id {})", category.name, category.id);
        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;
    use crate::errors::{RepositoryError, RepositoryResult};
    use crate::image_assets::digest_bytes;
    use crate::repositories::ItemRepository;
    use async_trait::async_trait;
    use std::time::Duration;
    use tempfile::TempDir;

    async fn sqlite_service(dir: &TempDir) -> ListingService {
        let database = Database::new_in_memory().await.unwrap();
        database.migrate().await.unwrap();
        ListingService::new(
            Repositories::sqlite(database),
            ImageStore::new(dir.path().join("images"), "default.jpg"),
        )
    }

    fn request(name: &str, category: &str, image: &[u8]) -> ItemCreateRequest {
        ItemCreateRequest {
            name: name.to_string(),
            category: category.to_string(),
            image: image.to_vec(),
        }
    }

    fn image_count(service: &ListingService) -> usize {
        match std::fs::read_dir(service.images().image_dir()) {
            Ok(entries) => entries.count(),
            Err(_) => 0,
        }
    }

    /// Delegates reads to a real repository but refuses every insert
    struct RejectingItems(Arc<dyn ItemRepository>);

    #[async_trait]
    impl ItemRepository for RejectingItems {
        async fn list(&self) -> RepositoryResult<Vec<Item>> {
            self.0.list().await
        }

        async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Item>> {
            self.0.find_by_id(id).await
        }

        async fn search(&self, keyword: &str) -> RepositoryResult<Vec<Item>> {
            self.0.search(keyword).await
        }

        async fn insert(&self, _item: NewItem) -> RepositoryResult<Item> {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Err(RepositoryError::query_failed("insert_item", "database is locked"))
        }
    }

    /// Same store and creation lock as `service`, but every insert fails
    fn with_rejecting_items(service: &ListingService) -> ListingService {
        let mut failing = service.clone();
        failing.repositories.items = Arc::new(RejectingItems(service.repositories.items.clone()));
        failing
    }

    #[tokio::test]
    async fn create_item_resolves_category_and_stores_image() {
        let dir = TempDir::new().unwrap();
        let service = sqlite_service(&dir).await;
        let category = service.create_category("fashion").await.unwrap();

        let item = service
            .create_item(request("jacket", "fashion", b"jpeg bytes"))
            .await
            .unwrap();

        assert_eq!(item.category_id, category.id);
        assert_eq!(item.category.as_deref(), Some("fashion"));
        assert_eq!(item.image_name, format!("{}.jpg", digest_bytes(b"jpeg bytes")));
        assert!(service.images().image_dir().join(&item.image_name).exists());
    }

    #[tokio::test]
    async fn unknown_category_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let service = sqlite_service(&dir).await;

        let err = service
            .create_item(request("jacket", "missing", b"jpeg bytes"))
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(image_count(&service), 0);
        assert!(service.list_items().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn identical_uploads_share_a_file_but_not_a_row() {
        let dir = TempDir::new().unwrap();
        let service = sqlite_service(&dir).await;
        service.create_category("toys").await.unwrap();

        let first = service
            .create_item(request("ball", "toys", b"same"))
            .await
            .unwrap();
        let second = service
            .create_item(request("another ball", "toys", b"same"))
            .await
            .unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(first.image_name, second.image_name);
        assert_eq!(image_count(&service), 1);
    }

    #[tokio::test]
    async fn failed_insert_removes_fresh_image() {
        let dir = TempDir::new().unwrap();
        let service = sqlite_service(&dir).await;
        service.create_category("toys").await.unwrap();
        let failing = with_rejecting_items(&service);

        let err = failing
            .create_item(request("ball", "toys", b"fresh"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Repository(_)));
        assert_eq!(image_count(&service), 0);
    }

    #[tokio::test]
    async fn failed_insert_keeps_shared_image() {
        let dir = TempDir::new().unwrap();
        let service = sqlite_service(&dir).await;
        service.create_category("toys").await.unwrap();
        let existing = service
            .create_item(request("ball", "toys", b"shared"))
            .await
            .unwrap();

        let failing = with_rejecting_items(&service);
        failing
            .create_item(request("ball again", "toys", b"shared"))
            .await
            .unwrap_err();

        assert!(service
            .images()
            .image_dir()
            .join(&existing.image_name)
            .exists());
        assert_eq!(service.list_items().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn concurrent_upload_survives_failed_insert_of_same_bytes() {
        let dir = TempDir::new().unwrap();
        let service = sqlite_service(&dir).await;
        service.create_category("toys").await.unwrap();
        let failing = with_rejecting_items(&service);

        let (failed, stored) = tokio::join!(
            failing.create_item(request("ball", "toys", b"raced")),
            service.create_item(request("ball twin", "toys", b"raced")),
        );

        assert!(failed.is_err());
        let stored = stored.unwrap();
        assert!(service
            .images()
            .image_dir()
            .join(&stored.image_name)
            .exists());
        assert_eq!(service.list_items().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn blank_fields_are_validation_errors() {
        let dir = TempDir::new().unwrap();
        let service = sqlite_service(&dir).await;

        let err = service
            .create_item(request("  ", "toys", b"x"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));

        let err = service.create_category("").await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }
}
