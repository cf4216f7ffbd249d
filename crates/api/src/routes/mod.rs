pub mod health;
pub mod roles;
pub mod users;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /ping                 liveness with version
/// /users                list, create
/// /users/{id}           get, update
/// /roles                list, create
/// /roles/{id}           get, update
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ping", get(health::ping))
        .nest("/users", users::router())
        .nest("/roles", roles::router())
}
