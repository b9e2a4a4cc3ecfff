use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use ideaboard_core::error::CoreError;
use ideaboard_store::{StoreReadError, StoreWriteError};

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and the store's read and write
/// errors. Implements [`IntoResponse`] to
/// produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `ideaboard_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A failed store write.
    #[error(transparent)]
    Write(#[from] StoreWriteError),

    /// A failed store read or live query.
    #[error(transparent)]
    Read(#[from] StoreReadError),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Internal(msg) => internal(msg),
            },

            // --- Store errors ---
            AppError::Write(err) => classify_write_error(err),
            AppError::Read(err) => classify_read_error(err),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal(msg: &str) -> (StatusCode, &'static str, String) {
    tracing::error!(error = %msg, "Internal error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// Classify a store write error into an HTTP status, error code, and message.
///
/// - `NotFound` maps to 404.
/// - `Conflict` (a failed version precondition) maps to 409.
/// - `Rejected` (the store refused or could not be reached) maps to 502.
/// - Everything else maps to 500 with a sanitized message.
fn classify_write_error(err: &StoreWriteError) -> (StatusCode, &'static str, String) {
    match err {
        StoreWriteError::NotFound { collection, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{collection} document {id} not found"),
        ),
        StoreWriteError::Conflict { .. } => (StatusCode::CONFLICT, "CONFLICT", err.to_string()),
        StoreWriteError::Rejected(reason) => {
            tracing::warn!(reason = %reason, "Store rejected write");
            (
                StatusCode::BAD_GATEWAY,
                "STORE_REJECTED",
                format!("Write rejected: {reason}"),
            )
        }
        StoreWriteError::Read(read) => classify_read_error(read),
        StoreWriteError::Encode(msg) => internal(msg),
    }
}

/// Unreachable or failed live queries map to 503; undecodable documents to 500.
fn classify_read_error(err: &StoreReadError) -> (StatusCode, &'static str, String) {
    match err {
        StoreReadError::Unavailable { .. } | StoreReadError::Closed { .. } => {
            tracing::warn!(error = %err, "Store unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "STORE_UNAVAILABLE",
                err.to_string(),
            )
        }
        StoreReadError::Decode { .. } => internal(&err.to_string()),
    }
}
