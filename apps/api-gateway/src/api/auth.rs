//! Authentication endpoints.
//!
//! Registration, login and refresh are forwarded to the auth service over
//! the broker. The profile endpoint answers from the verified token alone,
//! no service call involved.

use crate::error::map_rpc_failure;
use crate::state::AppState;
use axum::routing::{get, post};
use axum::{Json, Router, extract::State, http::StatusCode};
use axum_helpers::{AppError, AuthUser, ValidatedJson};
use domain_users::{
    LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, RegisterRequest, UserResponse,
};
use messaging::subjects;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/profile", get(profile))
        .with_state(state)
}

/// The caller's identity as carried in the access token
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub email: String,
    pub username: String,
}

#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Invalid input", body = axum_helpers::ErrorResponse),
        (status = 409, description = "Username or email taken", body = axum_helpers::ErrorResponse),
    ),
    tag = "auth"
)]
pub(crate) async fn register(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user: UserResponse = state
        .rpc
        .call(subjects::REGISTER, &input)
        .await
        .map_err(map_rpc_failure)?;

    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Tokens issued", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = axum_helpers::ErrorResponse),
    ),
    tag = "auth"
)]
pub(crate) async fn login(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response: LoginResponse = state
        .rpc
        .call(subjects::LOGIN, &input)
        .await
        .map_err(map_rpc_failure)?;

    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Access token re-issued", body = RefreshResponse),
        (status = 401, description = "Invalid refresh token", body = axum_helpers::ErrorResponse),
    ),
    tag = "auth"
)]
pub(crate) async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<RefreshRequest>,
) -> Result<Json<RefreshResponse>, AppError> {
    let response: RefreshResponse = state
        .rpc
        .call(subjects::REFRESH_TOKEN, &input)
        .await
        .map_err(map_rpc_failure)?;

    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/profile",
    responses(
        (status = 200, description = "The authenticated user", body = ProfileResponse),
        (status = 401, description = "Missing or invalid token", body = axum_helpers::ErrorResponse),
    ),
    tag = "auth"
)]
pub(crate) async fn profile(user: AuthUser) -> Json<ProfileResponse> {
    Json(ProfileResponse {
        id: user.id,
        email: user.email,
        username: user.name,
    })
}
