use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use roster_db::StoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`StoreError`] for repository failures and adds HTTP-specific
/// variants. Implements [`IntoResponse`] to produce consistent JSON error
/// responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A repository failure from `roster_db`.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A request body failed `validator` checks.
    #[error(transparent)]
    Validation(#[from] validator::ValidationErrors),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Store(err) => classify_store_error(err),

            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                errors.to_string(),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Map a repository failure to an HTTP status, error code, and message.
///
/// - `RecordNotFound` maps to 404.
/// - `NoRowsAffected` maps to 404: an update that changed nothing either
///   matched no row or wrote identical values, and the two are not told apart.
/// - `QueryBuilder` (unknown sort key, empty update, bad raw condition) maps to 400.
/// - Everything else maps to 500 with a sanitized message.
fn classify_store_error(err: &StoreError) -> (StatusCode, &'static str, String) {
    match err {
        StoreError::RecordNotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string()),
        StoreError::NoRowsAffected { .. } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "No matching record was changed".to_string(),
        ),
        StoreError::QueryBuilder(inner) => {
            (StatusCode::BAD_REQUEST, "BAD_REQUEST", inner.to_string())
        }
        other => {
            tracing::error!(error = %other, kind = ?other.kind(), "Repository error");
            internal()
        }
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}
