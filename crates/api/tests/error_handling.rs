//! Tests for `AppError` → HTTP response mapping.
//!
//! These call `IntoResponse` directly; no router or database is involved.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use roster_api::error::AppError;
use roster_core::error::QueryBuilderError;
use roster_db::{SqlError, StoreError};
use validator::Validate;

async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn record_not_found_returns_404() {
    let err = AppError::Store(StoreError::RecordNotFound { entity: "Role" });

    let (status, json) = error_to_response(err).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Role not found");
}

#[tokio::test]
async fn no_rows_affected_returns_404() {
    let err = AppError::Store(StoreError::NoRowsAffected {
        label: "update_role",
    });

    let (status, json) = error_to_response(err).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn query_builder_error_returns_400() {
    let err = AppError::Store(StoreError::QueryBuilder(
        QueryBuilderError::UnknownSortColumn("secret".into()),
    ));

    let (status, json) = error_to_response(err).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["error"].as_str().unwrap().contains("secret"));
}

#[tokio::test]
async fn validation_error_returns_400() {
    #[derive(Validate)]
    struct Signup {
        #[validate(email)]
        email: String,
    }
    let errors = Signup {
        email: "nope".into(),
    }
    .validate()
    .unwrap_err();

    let (status, json) = error_to_response(AppError::Validation(errors)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn transaction_failures_return_sanitized_500() {
    let err = AppError::Store(StoreError::TxCommit {
        id: 12,
        source: SqlError::Other("password=hunter2 in dsn".into()),
    });

    let (status, json) = error_to_response(err).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn bad_request_keeps_message() {
    let (status, json) = error_to_response(AppError::BadRequest("bad id".into())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "bad id");
}
