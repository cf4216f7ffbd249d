//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope. List responses add a
//! `pagination` object when the list was non-empty.

use roster_core::pagination::Pagination;
use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "data": [...], "pagination": {...} }` envelope for list endpoints.
#[derive(Debug, Serialize)]
pub struct ListResponse<T: Serialize> {
    pub data: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}
