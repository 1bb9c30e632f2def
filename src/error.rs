use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Can't convert parameter '{param}' to a datetime: {value:?}. Use a UTC timestamp in milliseconds")]
    TimestampConversion { param: &'static str, value: String },

    #[error("'operation' not found in query params. Supported operations: 'avg', 'min', 'max'")]
    UnsupportedOperation,

    #[error("Content-type not supported. json only")]
    UnsupportedContentType,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid query string: {}", .0.body_text())]
    InvalidQuery(#[from] QueryRejection),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::TimestampConversion { .. }
            | AppError::UnsupportedOperation
            | AppError::UnsupportedContentType
            | AppError::InvalidQuery(_)
            | AppError::Serialization(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AppError::TimestampConversion { .. } => "timestamp_conversion",
            AppError::UnsupportedOperation => "unsupported_operation",
            AppError::UnsupportedContentType => "unsupported_content_type",
            AppError::Unauthorized => "unauthorized",
            AppError::Validation(_) => "validation",
            AppError::NotFound(_) => "not_found",
            AppError::InvalidQuery(_) => "invalid_query",
            AppError::Serialization(_) => "invalid_body",
            AppError::Database(_) => "storage",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                "Database error".to_string()
            }
            AppError::Serialization(ref e) => format!("Invalid data format: {}", e),
            ref other => other.to_string(),
        };

        let body = Json(json!({
            "error": self.kind(),
            "message": message,
        }));

        (self.status(), body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
