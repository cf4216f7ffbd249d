use std::sync::Arc;

use roster_db::Domain;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: the repositories hold an `Arc` to the database handle.
#[derive(Clone)]
pub struct AppState {
    pub domain: Domain,
    pub config: Arc<ServerConfig>,
}
