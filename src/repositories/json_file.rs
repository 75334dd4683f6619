//! Flat JSON document adapter
//!
//! Keeps items and categories in a single `{"items": [...], "categories": [...]}`
//! file. The whole document is read for every operation and rewritten on
//! every insert, serialized through one async mutex. Suitable only for tiny
//! data sets and single-process use.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::{fs, sync::Mutex};

use super::traits::{CategoryRepository, ItemRepository};
use crate::errors::RepositoryResult;
use crate::models::{Category, Item, NewItem};

#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    items: Vec<Item>,
    #[serde(default)]
    categories: Vec<Category>,
}

impl Document {
    fn category_name(&self, id: i64) -> Option<String> {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.clone())
    }

    fn with_category(&self, item: &Item) -> Item {
        Item {
            category: self.category_name(item.category_id),
            ..item.clone()
        }
    }

    fn next_item_id(&self) -> i64 {
        self.items.iter().map(|i| i.id).max().unwrap_or(0) + 1
    }

    fn next_category_id(&self) -> i64 {
        self.categories.iter().map(|c| c.id).max().unwrap_or(0) + 1
    }
}

/// Case handling mirrors SQLite `LIKE`: ASCII letters compare case-insensitively
fn name_contains(name: &str, keyword: &str) -> bool {
    name.to_ascii_lowercase()
        .contains(&keyword.to_ascii_lowercase())
}

pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> RepositoryResult<Document> {
        match fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Document::default()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Document::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, document: &Document) -> RepositoryResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let contents = serde_json::to_vec_pretty(document)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, contents).await?;
        fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl CategoryRepository for JsonFileStore {
    async fn list(&self) -> RepositoryResult<Vec<Category>> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.categories)
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Category>> {
        let _guard = self.lock.lock().await;
        let document = self.load().await?;
        Ok(document.categories.into_iter().find(|c| c.id == id))
    }

    async fn find_id_by_name(&self, name: &str) -> RepositoryResult<Option<i64>> {
        let _guard = self.lock.lock().await;
        let document = self.load().await?;
        Ok(document
            .categories
            .iter()
            .filter(|c| c.name == name)
            .map(|c| c.id)
            .min())
    }

    async fn create(&self, name: &str) -> RepositoryResult<Category> {
        let _guard = self.lock.lock().await;
        let mut document = self.load().await?;

        let category = Category {
            id: document.next_category_id(),
            name: name.to_string(),
        };
        document.categories.push(category.clone());
        self.save(&document).await?;

        Ok(category)
    }
}

#[async_trait]
impl ItemRepository for JsonFileStore {
    async fn list(&self) -> RepositoryResult<Vec<Item>> {
        let _guard = self.lock.lock().await;
        let document = self.load().await?;
        Ok(document
            .items
            .iter()
            .map(|item| document.with_category(item))
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Item>> {
        let _guard = self.lock.lock().await;
        let document = self.load().await?;
        Ok(document
            .items
            .iter()
            .find(|item| item.id == id)
            .map(|item| document.with_category(item)))
    }

    async fn search(&self, keyword: &str) -> RepositoryResult<Vec<Item>> {
        let _guard = self.lock.lock().await;
        let document = self.load().await?;
        Ok(document
            .items
            .iter()
            .filter(|item| name_contains(&item.name, keyword))
            .map(|item| document.with_category(item))
            .collect())
    }

    async fn insert(&self, item: NewItem) -> RepositoryResult<Item> {
        let _guard = self.lock.lock().await;
        let mut document = self.load().await?;

        let stored = Item {
            id: document.next_item_id(),
            name: item.name,
            category_id: item.category_id,
            category: None,
            image_name: item.image_name,
        };
        document.items.push(stored.clone());
        self.save(&document).await?;

        Ok(document.with_category(&stored))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("items.json"));

        assert!(ItemRepository::list(&store).await.unwrap().is_empty());
        assert!(CategoryRepository::list(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn inserts_persist_across_instances() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db").join("items.json");

        {
            let store = JsonFileStore::new(path.clone());
            let category = store.create("fashion").await.unwrap();
            store
                .insert(NewItem {
                    name: "jacket".to_string(),
                    category_id: category.id,
                    image_name: "abc.jpg".to_string(),
                })
                .await
                .unwrap();
        }

        let reopened = JsonFileStore::new(path);
        let items = ItemRepository::list(&reopened).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, 1);
        assert_eq!(items[0].category.as_deref(), Some("fashion"));
    }

    #[tokio::test]
    async fn reads_legacy_items_only_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("items.json");
        std::fs::write(
            &path,
            r#"{"items":[{"id":7,"name":"shoes","category_id":1,"image_name":"x.jpg"}]}"#,
        )
        .unwrap();

        let store = JsonFileStore::new(path);
        let item = ItemRepository::find_by_id(&store, 7).await.unwrap().unwrap();
        assert_eq!(item.name, "shoes");
        assert_eq!(item.category, None);

        let next = store
            .insert(NewItem {
                name: "hat".to_string(),
                category_id: 1,
                image_name: String::new(),
            })
            .await
            .unwrap();
        assert_eq!(next.id, 8);
    }

    #[test]
    fn contains_ignores_ascii_case() {
        assert!(name_contains("Blue Jacket", "jacket"));
        assert!(name_contains("anything", ""));
        assert!(!name_contains("shoes", "hat"));
    }
}
