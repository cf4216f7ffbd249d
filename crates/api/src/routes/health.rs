use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::response::DataResponse;
use crate::state::AppState;

/// Liveness payload shared by `/health` and `/api/v1/ping`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
}

fn current() -> HealthResponse {
    HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    }
}

/// GET /health
async fn health_check() -> Json<HealthResponse> {
    Json(current())
}

/// GET /api/v1/ping
pub async fn ping() -> Json<DataResponse<HealthResponse>> {
    Json(DataResponse { data: current() })
}

/// Mount health check routes (root level, not under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
