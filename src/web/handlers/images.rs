//! Image HTTP handlers

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};

use crate::errors::AppResult;
use crate::web::AppState;

/// `GET /image/:filename`
///
/// Serves the stored bytes as JPEG. Unknown `.jpg` names get the default
/// placeholder; any other name is a 400.
pub async fn get_image(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> AppResult<impl IntoResponse> {
    let data = state.listing.images().read(&file_name).await?;

    Ok(([(header::CONTENT_TYPE, "image/jpeg")], data))
}
