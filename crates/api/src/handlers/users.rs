//! Handlers for the `/users` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use roster_core::param::QueryOption;
use roster_core::types::DbId;
use roster_db::models::user::{CreateUserParam, UpdateUserParam, User, UserParam};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::password::hash_password;
use crate::query::UserListQuery;
use crate::response::{DataResponse, ListResponse};
use crate::state::AppState;

/// POST /api/v1/users
///
/// The plaintext password is validated, then replaced by its Argon2id hash
/// before it reaches the repository.
pub async fn create(
    State(state): State<AppState>,
    Json(mut input): Json<CreateUserParam>,
) -> AppResult<(StatusCode, Json<DataResponse<User>>)> {
    input.validate()?;

    let hash = hash(&input.password)?;
    input.password = hash;

    let user = state.domain.user.create(&input).await?;
    tracing::info!(user_id = user.id, "User created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: user })))
}

/// GET /api/v1/users
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
) -> AppResult<Json<ListResponse<User>>> {
    let params = UserParam::from(query);
    let (data, pagination) = state.domain.user.get_list(&params).await?;
    Ok(Json(ListResponse { data, pagination }))
}

/// GET /api/v1/users/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<User>>> {
    let user = state.domain.user.get(&UserParam::by_id(id)).await?;
    Ok(Json(DataResponse { data: user }))
}

/// PATCH /api/v1/users/{id}
///
/// Only active users are updated. Returns the user as stored afterwards.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateUserParam>,
) -> AppResult<Json<DataResponse<User>>> {
    input.validate()?;
    if let Some(password) = input.password.as_deref() {
        input.password = Some(hash(password)?);
    }

    let filter = UserParam {
        id: Some(id),
        query_option: QueryOption::active(),
        ..UserParam::default()
    };
    state.domain.user.update(&input, &filter).await?;

    let user = state.domain.user.get(&UserParam::by_id(id)).await?;
    Ok(Json(DataResponse { data: user }))
}

fn hash(password: &str) -> AppResult<String> {
    hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))
}
