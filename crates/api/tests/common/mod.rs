#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use roster_api::config::ServerConfig;
use roster_api::router::build_app_router;
use roster_api::state::AppState;
use roster_core::value::SqlValue;
use roster_db::row::Row;
use roster_db::testing::ScriptedDatabase;
use roster_db::Domain;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".parse().unwrap()],
        request_timeout_secs: 30,
    }
}

/// Build the full application router over the scripted database.
pub fn build_test_app(db: Arc<ScriptedDatabase>) -> Router {
    let state = AppState {
        domain: Domain::new(db),
        config: Arc::new(test_config()),
    };
    build_app_router(state)
}

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, json: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(json)).await
}

pub async fn patch_json(app: Router, uri: &str, json: serde_json::Value) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(json)).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn user_row(id: i64, username: &str) -> Row {
    Row::new()
        .with("id", id)
        .with("fk_role_id", 1i64)
        .with("email", format!("{username}@example.com"))
        .with("username", username)
        .with("password", "$argon2id$v=19$stored")
        .with("display_name", username)
        .with("status", 1i64)
        .with("created_at", "2024-03-01 10:20:30")
        .with("created_by", "seed")
        .with("updated_at", "2024-03-01 10:20:30")
        .with("updated_by", SqlValue::Null)
}

pub fn role_row(id: i64, name: &str) -> Row {
    Row::new()
        .with("id", id)
        .with("name", name)
        .with("type", 1i64)
        .with("rank", 10i64)
        .with("status", 1i64)
        .with("created_at", "2024-03-01 10:20:30")
        .with("created_by", "seed")
        .with("updated_at", "2024-03-01 10:20:30")
        .with("updated_by", "seed")
}
