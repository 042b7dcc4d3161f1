//! Comment endpoints, nested under a task.

use crate::error::map_rpc_failure;
use crate::state::AppState;
use axum::routing::get;
use axum::{Json, Router, extract::State, http::StatusCode};
use axum_helpers::{AppError, AuthUser, UuidPath, ValidatedJson};
use domain_tasks::{Comment, CreateComment, CreateCommentRequest};
use messaging::subjects;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/{taskId}/comments",
            get(list_comments).post(create_comment),
        )
        .with_state(state)
}

#[utoipa::path(
    post,
    path = "/{taskId}/comments",
    params(("taskId" = uuid::Uuid, Path, description = "Task id")),
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment created", body = Comment),
        (status = 404, description = "No such task", body = axum_helpers::ErrorResponse),
    ),
    tag = "comments"
)]
pub(crate) async fn create_comment(
    user: AuthUser,
    State(state): State<AppState>,
    UuidPath(task_id): UuidPath,
    ValidatedJson(input): ValidatedJson<CreateCommentRequest>,
) -> Result<(StatusCode, Json<Comment>), AppError> {
    let command = CreateComment {
        content: input.content,
        task_id,
        user_id: user.id,
    };
    let comment: Comment = state
        .rpc
        .call(subjects::CREATE_COMMENT, &command)
        .await
        .map_err(map_rpc_failure)?;

    Ok((StatusCode::CREATED, Json(comment)))
}

#[utoipa::path(
    get,
    path = "/{taskId}/comments",
    params(("taskId" = uuid::Uuid, Path, description = "Task id")),
    responses(
        (status = 200, description = "Comments on the task, oldest first", body = [Comment]),
        (status = 404, description = "No such task", body = axum_helpers::ErrorResponse),
    ),
    tag = "comments"
)]
pub(crate) async fn list_comments(
    _user: AuthUser,
    State(state): State<AppState>,
    UuidPath(task_id): UuidPath,
) -> Result<Json<Vec<Comment>>, AppError> {
    let comments: Vec<Comment> = state
        .rpc
        .call(subjects::FIND_COMMENTS_BY_TASK, &task_id)
        .await
        .map_err(map_rpc_failure)?;

    Ok(Json(comments))
}
