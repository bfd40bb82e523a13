use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use core_types::CoreError;
use database::DbError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// The request was malformed; `field` names the offending form field or
    /// path segment.
    #[error("{message}")]
    BadRequest { field: &'static str, message: String },
    #[error("Not found")]
    NotFound,
    #[error("Database error: {0}")]
    Database(DbError),
    #[error("File storage error: {0}")]
    Storage(#[from] std::io::Error),
}

impl AppError {
    pub fn bad_request(field: &'static str, message: impl Into<String>) -> Self {
        AppError::BadRequest { field, message: message.into() }
    }
}

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound => AppError::NotFound,
            other => AppError::Database(other),
        }
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        AppError::BadRequest { field: err.field(), message: err.to_string() }
    }
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::BadRequest { field, message } => {
                tracing::warn!(field, %message, "Rejected request.");
                (StatusCode::BAD_REQUEST, json!({ "error": message, "field": field }))
            }
            AppError::NotFound => return StatusCode::NOT_FOUND.into_response(),
            AppError::Database(db_err) => {
                tracing::error!(error = ?db_err, "Database error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "An internal database error occurred" }),
                )
            }
            AppError::Storage(io_err) => {
                tracing::error!(error = ?io_err, "File storage error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Failed to save image" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
