use axum::{Json, http::StatusCode, response::{IntoResponse, Response}};
use serde::Serialize;
use sqlx::error::ErrorKind;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[source] sqlx::Error),

    #[error("Integrity violation: {0}")]
    IntegrityViolation(String),

    #[error("No stored term to refresh against")]
    NoBaselineTerm,

    #[error("Source error: {0}")]
    Source(String),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Not found")]
    NotFound,

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.kind() {
                ErrorKind::UniqueViolation
                | ErrorKind::ForeignKeyViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::CheckViolation => {
                    return AppError::IntegrityViolation(db_err.message().to_string());
                }
                _ => {}
            }
        }
        AppError::StorageUnavailable(err)
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not Found".to_string()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NoBaselineTerm => (
                StatusCode::CONFLICT,
                "No stored term to refresh against".to_string(),
            ),
            AppError::Source(msg) => {
                error!("source error: {}", msg);
                (StatusCode::BAD_GATEWAY, msg)
            }
            AppError::IntegrityViolation(msg) => {
                error!("integrity violation: {}", msg);
                (StatusCode::UNPROCESSABLE_ENTITY, msg)
            }
            AppError::StorageUnavailable(e) => {
                error!("database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error occurred".to_string(),
                )
            }
            AppError::Migration(e) => {
                error!("migration error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: status.to_string(),
            message: error_message,
        });

        (status, body).into_response()
    }
}
