use crate::state::AppState;
use axum::Router;

pub mod auth;
pub mod comments;
pub mod tasks;
pub mod users;

/// Composes the API routes without the `/api` prefix; `create_router` adds
/// the prefix, docs and middleware on top.
pub fn routes(state: AppState) -> Router {
    Router::new()
        .nest("/auth", auth::router(state.clone()))
        .nest("/users", users::router(state.clone()))
        .nest(
            "/tasks",
            tasks::router(state.clone()).merge(comments::router(state)),
        )
}
