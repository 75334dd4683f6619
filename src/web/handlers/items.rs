//! Item HTTP handlers

use axum::{
    extract::{Multipart, Query, Request, State},
    response::IntoResponse,
    Json,
};
use tracing::debug;

use crate::errors::{AppError, AppResult};
use crate::models::{Item, ItemCreateRequest, ItemList, SearchQuery};
use crate::web::{
    extractors::{self, multipart_error, IdPath},
    responses::message,
    AppState,
};

pub async fn list_items(State(state): State<AppState>) -> AppResult<Json<ItemList>> {
    let items = state.listing.list_items().await?;
    Ok(Json(ItemList { items }))
}

pub async fn get_item(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> AppResult<Json<Item>> {
    Ok(Json(state.listing.get_item(id).await?))
}

pub async fn search_items(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<ItemList>> {
    debug!("Searching items for keyword '{}'", query.keyword);
    let items = state.listing.search_items(&query.keyword).await?;
    Ok(Json(ItemList { items }))
}

/// `POST /items` with multipart fields `name`, `category` and `image`
pub async fn create_item(
    State(state): State<AppState>,
    request: Request,
) -> AppResult<impl IntoResponse> {
    let multipart = extractors::multipart(request, &state).await?;
    let request = read_item_form(multipart).await?;
    let item = state.listing.create_item(request).await?;
    Ok(message(format!("item received: {}", item.name)))
}

async fn read_item_form(mut multipart: Multipart) -> AppResult<ItemCreateRequest> {
    let mut name: Option<String> = None;
    let mut category: Option<String> = None;
    let mut image: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        match field.name() {
            Some("name") => {
                name = Some(field.text().await.map_err(multipart_error)?);
            }
            Some("category") => {
                category = Some(field.text().await.map_err(multipart_error)?);
            }
            Some("image") => {
                image = Some(field.bytes().await.map_err(multipart_error)?.to_vec());
            }
            _ => {} // Ignore other fields
        }
    }

    Ok(ItemCreateRequest {
        name: name.ok_or_else(|| AppError::validation("name is required"))?,
        category: category.ok_or_else(|| AppError::validation("category is required"))?,
        image: image.ok_or_else(|| AppError::validation("image is required"))?,
    })
}

