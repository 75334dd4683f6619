//! Category HTTP handlers

use axum::{
    extract::{FromRequest, Request, State},
    http::header,
    response::IntoResponse,
    Form, Json,
};

use crate::errors::AppResult;
use crate::models::{Category, CategoryCreateRequest, CategoryList};
use crate::web::{
    extractors::{self, body_error, multipart_error, IdPath},
    responses::message,
    AppState,
};

pub async fn list_categories(State(state): State<AppState>) -> AppResult<Json<CategoryList>> {
    let categories = state.listing.list_categories().await?;
    Ok(Json(CategoryList { categories }))
}

pub async fn get_category(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> AppResult<Json<Category>> {
    Ok(Json(state.listing.get_category(id).await?))
}

/// `POST /categories` with a `name` field, sent either url-encoded or as multipart
pub async fn create_category(
    State(state): State<AppState>,
    request: Request,
) -> AppResult<impl IntoResponse> {
    let form = read_category_form(request, &state).await?;
    let category = state.listing.create_category(&form.name).await?;
    Ok(message(format!("category received: {}", category.name)))
}

async fn read_category_form(
    request: Request,
    state: &AppState,
) -> AppResult<CategoryCreateRequest> {
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"));

    if !is_multipart {
        let Form(form) = Form::<CategoryCreateRequest>::from_request(request, state)
            .await
            .map_err(|e| body_error(e.status(), "form body", e))?;
        return Ok(form);
    }

    let mut multipart = extractors::multipart(request, state).await?;

    let mut name = String::new();
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() == Some("name") {
            name = field.text().await.map_err(multipart_error)?;
        }
    }

    Ok(CategoryCreateRequest { name })
}
