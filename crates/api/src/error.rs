use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use shopfront_catalog::CatalogError;
use thiserror::Error;

/// One offending field of a malformed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Invalid input parameters")]
    Validation(Vec<FieldError>),

    #[error("Database error occurred while {0}.")]
    Store(&'static str, #[source] CatalogError),

    #[error("Service temporarily unavailable. Please retry shortly.")]
    Unavailable,
}

impl ApiError {
    /// Maps a catalog failure, naming the operation in the generic message
    /// returned for store errors.
    pub fn from_catalog(action: &'static str, error: CatalogError) -> Self {
        match error {
            CatalogError::InvalidInput(message) => ApiError::BadRequest(message),
            CatalogError::ProductNotFound(_)
            | CatalogError::DepartmentNotFound(_)
            | CatalogError::PageNotFound { .. } => ApiError::NotFound(error.to_string()),
            CatalogError::PoolExhausted => ApiError::Unavailable,
            store @ CatalogError::Store(_) => ApiError::Store(action, store),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Store(..) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(error: CatalogError) -> Self {
        ApiError::from_catalog("processing the request", error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            ApiError::Validation(details) => json!({
                "success": false,
                "error": self.to_string(),
                "details": details,
            }),
            ApiError::Store(action, source) => {
                tracing::error!(action, error = %source, "Store error");
                json!({ "success": false, "error": self.to_string() })
            }
            ApiError::Unavailable => {
                tracing::warn!("Database pool exhausted");
                json!({ "success": false, "error": self.to_string() })
            }
            _ => json!({ "success": false, "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_errors_map_to_statuses() {
        let cases = [
            (CatalogError::InvalidInput("bad".into()), StatusCode::BAD_REQUEST),
            (CatalogError::ProductNotFound(1), StatusCode::NOT_FOUND),
            (CatalogError::DepartmentNotFound(1), StatusCode::NOT_FOUND),
            (CatalogError::PageNotFound { page: 2, total_pages: 1 }, StatusCode::NOT_FOUND),
            (CatalogError::PoolExhausted, StatusCode::SERVICE_UNAVAILABLE),
            (
                CatalogError::Store(sqlx_error()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(ApiError::from(error).status(), expected);
        }
    }

    #[test]
    fn store_message_hides_driver_text() {
        let error = ApiError::from_catalog("fetching products", CatalogError::Store(sqlx_error()));
        let message = error.to_string();
        assert_eq!(message, "Database error occurred while fetching products.");
        assert!(!message.contains("relation"));
    }

    fn sqlx_error() -> shopfront_catalog::sqlx::Error {
        shopfront_catalog::sqlx::Error::Protocol("relation \"products\" does not exist".to_string())
    }
}
