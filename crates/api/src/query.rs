//! Query-string parameter types for the list endpoints.
//!
//! Each entity has a flat struct (equality filters plus the shared paging
//! keys) that converts into its repository filter. `sort_by` is a
//! comma-separated list; a `-` prefix sorts descending.

use roster_core::param::{PaginationParam, QueryOption};
use roster_core::types::DbId;
use roster_db::models::role::RoleParam;
use roster_db::models::user::UserParam;
use serde::Deserialize;

/// `GET /users` query string.
#[derive(Debug, Default, Deserialize)]
pub struct UserListQuery {
    pub role_id: Option<DbId>,
    pub email: Option<String>,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    #[serde(default)]
    pub include_pagination: bool,
    pub sort_by: Option<String>,
    #[serde(default)]
    pub active_only: bool,
}

impl From<UserListQuery> for UserParam {
    fn from(q: UserListQuery) -> Self {
        Self {
            id: None,
            role_id: q.role_id,
            email: q.email,
            username: q.username,
            display_name: q.display_name,
            query_option: query_option(q.active_only),
            pagination: pagination(q.page, q.limit, q.include_pagination, q.sort_by.as_deref()),
        }
    }
}

/// `GET /roles` query string.
#[derive(Debug, Default, Deserialize)]
pub struct RoleListQuery {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub role_type: Option<i64>,
    pub rank: Option<i64>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    #[serde(default)]
    pub include_pagination: bool,
    pub sort_by: Option<String>,
    #[serde(default)]
    pub active_only: bool,
}

impl From<RoleListQuery> for RoleParam {
    fn from(q: RoleListQuery) -> Self {
        Self {
            id: None,
            name: q.name,
            role_type: q.role_type,
            rank: q.rank,
            query_option: query_option(q.active_only),
            pagination: pagination(q.page, q.limit, q.include_pagination, q.sort_by.as_deref()),
        }
    }
}

fn query_option(active_only: bool) -> QueryOption {
    QueryOption {
        is_active: active_only,
        ..QueryOption::default()
    }
}

fn pagination(
    page: Option<i64>,
    limit: Option<i64>,
    include_pagination: bool,
    sort_by: Option<&str>,
) -> PaginationParam {
    PaginationParam {
        page: page.unwrap_or_default(),
        limit: limit.unwrap_or_default(),
        include_pagination,
        sort_by: split_sort(sort_by.unwrap_or_default()),
    }
}

fn split_sort(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(String::from)
        .collect()
}
