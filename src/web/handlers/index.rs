use axum::response::IntoResponse;

use crate::web::responses::message;

pub async fn index() -> impl IntoResponse {
    message("Hello, world!")
}
