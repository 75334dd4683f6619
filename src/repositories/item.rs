//! SQLite-backed item repository

use async_trait::async_trait;
use sqlx::{Pool, Sqlite};

use super::traits::ItemRepository;
use crate::errors::{RepositoryError, RepositoryResult};
use crate::models::{Item, NewItem};

const SELECT_ITEMS: &str = r#"
    SELECT i.id, i.name, i.category_id, c.name AS category, i.image_name
    FROM items i
    LEFT JOIN categories c ON c.id = i.category_id
"#;

#[derive(Clone)]
pub struct SqliteItemRepository {
    pool: Pool<Sqlite>,
}

impl SqliteItemRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }
}

/// Escape `LIKE` wildcards so the keyword is matched literally
fn like_pattern(keyword: &str) -> String {
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');
    for ch in keyword.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl ItemRepository for SqliteItemRepository {
    async fn list(&self) -> RepositoryResult<Vec<Item>> {
        sqlx::query_as::<_, Item>(&format!("{SELECT_ITEMS} ORDER BY i.id"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::query_failed("list_items", e.to_string()))
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Item>> {
        sqlx::query_as::<_, Item>(&format!("{SELECT_ITEMS} WHERE i.id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::query_failed("find_item_by_id", e.to_string()))
    }

    async fn search(&self, keyword: &str) -> RepositoryResult<Vec<Item>> {
        sqlx::query_as::<_, Item>(&format!(
            "{SELECT_ITEMS} WHERE i.name LIKE ? ESCAPE '\\' ORDER BY i.id"
        ))
        .bind(like_pattern(keyword))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::query_failed("search_items", e.to_string()))
    }

    async fn insert(&self, item: NewItem) -> RepositoryResult<Item> {
        let result =
            sqlx::query("INSERT INTO items (name, category_id, image_name) VALUES (?, ?, ?)")
                .bind(&item.name)
                .bind(item.category_id)
                .bind(&item.image_name)
                .execute(&self.pool)
                .await
                .map_err(|e| RepositoryError::query_failed("insert_item", e.to_string()))?;

        self.get_by_id(result.last_insert_rowid()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_wraps_and_escapes() {
        assert_eq!(like_pattern(""), "%%");
        assert_eq!(like_pattern("jacket"), "%jacket%");
        assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }
}
