//! Handlers for the `/roles` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use roster_core::param::QueryOption;
use roster_core::types::DbId;
use roster_db::models::role::{CreateRoleParam, Role, RoleParam, UpdateRoleParam};
use validator::Validate;

use crate::error::AppResult;
use crate::query::RoleListQuery;
use crate::response::{DataResponse, ListResponse};
use crate::state::AppState;

/// POST /api/v1/roles
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateRoleParam>,
) -> AppResult<(StatusCode, Json<DataResponse<Role>>)> {
    input.validate()?;
    let role = state.domain.role.create(&input).await?;
    tracing::info!(role_id = role.id, name = %role.name, "Role created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: role })))
}

/// GET /api/v1/roles
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<RoleListQuery>,
) -> AppResult<Json<ListResponse<Role>>> {
    let params = RoleParam::from(query);
    let (data, pagination) = state.domain.role.get_list(&params).await?;
    Ok(Json(ListResponse { data, pagination }))
}

/// GET /api/v1/roles/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Role>>> {
    let role = state.domain.role.get(&RoleParam::by_id(id)).await?;
    Ok(Json(DataResponse { data: role }))
}

/// PATCH /api/v1/roles/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRoleParam>,
) -> AppResult<Json<DataResponse<Role>>> {
    input.validate()?;

    let filter = RoleParam {
        id: Some(id),
        query_option: QueryOption::active(),
        ..RoleParam::default()
    };
    state.domain.role.update(&input, &filter).await?;

    let role = state.domain.role.get(&RoleParam::by_id(id)).await?;
    Ok(Json(DataResponse { data: role }))
}
