//! User lookup endpoints, forwarded to the auth service.

use crate::error::map_rpc_failure;
use crate::state::AppState;
use axum::routing::get;
use axum::{Json, Router, extract::State};
use axum_helpers::{AppError, AuthUser, UuidPath};
use domain_users::UserResponse;
use messaging::subjects;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_users))
        .route("/{id}", get(get_user))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "",
    responses(
        (status = 200, description = "All users", body = [UserResponse]),
        (status = 401, description = "Missing or invalid token", body = axum_helpers::ErrorResponse),
    ),
    tag = "users"
)]
pub(crate) async fn list_users(
    _user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users: Vec<UserResponse> = state
        .rpc
        .call(subjects::GET_ALL_USERS, &serde_json::json!({}))
        .await
        .map_err(map_rpc_failure)?;

    Ok(Json(users))
}

#[utoipa::path(
    get,
    path = "/{id}",
    params(("id" = uuid::Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "The user", body = UserResponse),
        (status = 404, description = "No such user", body = axum_helpers::ErrorResponse),
    ),
    tag = "users"
)]
pub(crate) async fn get_user(
    _user: AuthUser,
    State(state): State<AppState>,
    UuidPath(id): UuidPath,
) -> Result<Json<UserResponse>, AppError> {
    let user: UserResponse = state
        .rpc
        .call(subjects::GET_USER_BY_ID, &id)
        .await
        .map_err(map_rpc_failure)?;

    Ok(Json(user))
}
