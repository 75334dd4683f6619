use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub category_id: i64,
    /// Category name resolved at read time; never persisted on the item itself
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Content-addressed file name inside the image directory
    pub image_name: String,
}

/// Row data for inserting an item once its category and image are resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub category_id: i64,
    pub image_name: String,
}

/// Validated `POST /items` payload
#[derive(Debug, Clone)]
pub struct ItemCreateRequest {
    pub name: String,
    pub category: String,
    pub image: Vec<u8>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemList {
    pub items: Vec<Item>,
}

/// Query string for `GET /search`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub keyword: String,
}
