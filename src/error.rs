use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde::Serialize;

use crate::store::StoreError;

pub const FORBIDDEN_MESSAGE: &str = "You do not have permission to access this page";

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Display)]
pub enum AppError {
    #[display(fmt = "{}", _0)]
    NotFound(String),
    #[display(fmt = "{}", _0)]
    Unauthorized(String),
    #[display(fmt = "{}", _0)]
    Forbidden(String),
    #[display(fmt = "{}", _0)]
    Conflict(String),
    #[display(fmt = "{}", _0)]
    BadRequest(String),
    #[display(fmt = "Internal Server Error")]
    Internal(anyhow::Error),
}

impl AppError {
    pub fn forbidden() -> Self {
        AppError::Forbidden(FORBIDDEN_MESSAGE.to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::Internal(err) = self {
            tracing::error!(error = ?err, "Internal server error");
        }

        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
        })
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate => AppError::Conflict("Record already exists".to_string()),
            StoreError::Database(e) => AppError::Internal(e.into()),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn response_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.error_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[actix_web::test]
    async fn maps_variants_to_status_and_error_body() {
        let (status, json) = response_json(AppError::NotFound("missing".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "missing");

        let (status, json) = response_json(AppError::forbidden()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["error"], FORBIDDEN_MESSAGE);

        let (status, _) = response_json(AppError::Conflict("dup".into())).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn internal_errors_hide_details() {
        let (status, json) = response_json(AppError::Internal(anyhow::anyhow!("pool closed"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "Internal Server Error");
    }

    #[test]
    fn duplicate_store_error_becomes_conflict() {
        let err = AppError::from(StoreError::Duplicate);
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }
}
