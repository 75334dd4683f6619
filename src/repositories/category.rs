//! SQLite-backed category repository

use async_trait::async_trait;
use sqlx::{Pool, Sqlite};

use super::traits::CategoryRepository;
use crate::errors::{RepositoryError, RepositoryResult};
use crate::models::Category;

#[derive(Clone)]
pub struct SqliteCategoryRepository {
    pool: Pool<Sqlite>,
}

impl SqliteCategoryRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for SqliteCategoryRepository {
    async fn list(&self) -> RepositoryResult<Vec<Category>> {
        sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::query_failed("list_categories", e.to_string()))
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Category>> {
        sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::query_failed("find_category_by_id", e.to_string()))
    }

    async fn find_id_by_name(&self, name: &str) -> RepositoryResult<Option<i64>> {
        sqlx::query_scalar::<_, i64>(
            "SELECT id FROM categories WHERE name = ? ORDER BY id LIMIT 1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::query_failed("find_category_id_by_name", e.to_string()))
    }

    async fn create(&self, name: &str) -> RepositoryResult<Category> {
        let result = sqlx::query("INSERT INTO categories (name) VALUES (?)")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::query_failed("create_category", e.to_string()))?;

        Ok(Category {
            id: result.last_insert_rowid(),
            name: name.to_string(),
        })
    }
}
