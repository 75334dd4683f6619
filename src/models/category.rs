use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryList {
    pub categories: Vec<Category>,
}

/// Form body for `POST /categories`
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryCreateRequest {
    #[serde(default)]
    pub name: String,
}
