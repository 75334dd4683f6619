//! Request extractors and validation

use axum::{
    async_trait,
    extract::{multipart::MultipartError, FromRequest, FromRequestParts, Multipart, Path, Request},
    http::{request::Parts, StatusCode},
    response::Response,
};
use std::fmt::Display;

use super::responses::bad_request;
use crate::errors::{AppError, AppResult};

const INVALID_ID_MESSAGE: &str = "Invalid ID format";
const BODY_TOO_LARGE_MESSAGE: &str = "Request body too large";

/// Integer `:id` path parameter.
///
/// Anything that does not parse as an `i64` is rejected with
/// `400 {"message": "Invalid ID format"}` before a handler runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdPath(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| bad_request(INVALID_ID_MESSAGE))?;

        raw.trim()
            .parse::<i64>()
            .map(IdPath)
            .map_err(|_| bad_request(INVALID_ID_MESSAGE))
    }
}

/// Extract a multipart body, reporting rejections through [`AppError`]
pub async fn multipart<S>(request: Request, state: &S) -> AppResult<Multipart>
where
    S: Send + Sync,
{
    Multipart::from_request(request, state)
        .await
        .map_err(|e| body_error(e.status(), "multipart body", e))
}

/// Error for a failure while reading multipart fields
pub fn multipart_error(error: MultipartError) -> AppError {
    body_error(error.status(), "multipart body", error)
}

/// 413 when the body hit the upload limit, 400 otherwise
pub fn body_error(status: StatusCode, what: &str, error: impl Display) -> AppError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::payload_too_large(BODY_TOO_LARGE_MESSAGE)
    } else {
        AppError::validation(format!("Invalid {}: {}", what, error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_rejections_map_to_payload_too_large() {
        let err = body_error(StatusCode::PAYLOAD_TOO_LARGE, "multipart body", "length limit");
        assert!(matches!(err, AppError::PayloadTooLarge { .. }));

        let err = body_error(StatusCode::BAD_REQUEST, "form body", "missing field");
        match err {
            AppError::Validation { message } => {
                assert_eq!(message, "Invalid form body: missing field")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
