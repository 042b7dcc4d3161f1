//! Task endpoints, forwarded to the tasks service.
//!
//! The task owner is always the authenticated caller; client payloads never
//! choose a user id. History is hydrated with usernames from the auth
//! service, one lookup per distinct user, and a failed lookup degrades to a
//! placeholder instead of failing the read.

use crate::error::map_rpc_failure;
use crate::state::AppState;
use axum::routing::{get, post};
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
};
use axum_helpers::{AppError, AuthUser, UuidPath, ValidatedJson};
use domain_tasks::{
    AuditLog, CreateTask, CreateTaskRequest, RemoveTaskResponse, Task, TaskDetail, TaskFilter,
    TaskPriority, TaskStatus, UpdateTask, UpdateTaskCommand,
};
use domain_users::UserResponse;
use futures::future::join_all;
use messaging::subjects;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Shown when the user behind an audit entry cannot be resolved.
const UNKNOWN_USER: &str = "unknown user";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", post(create_task).get(list_tasks))
        .route(
            "/{id}",
            get(get_task).patch(update_task).delete(remove_task),
        )
        .route("/{id}/history", get(task_history))
        .with_state(state)
}

/// Optional filters for listing the caller's tasks
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct TaskListQuery {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
}

/// Audit entry hydrated with the acting user's name
#[derive(Debug, Serialize, ToSchema)]
pub struct TaskHistoryEntry {
    #[serde(flatten)]
    pub log: AuditLog,
    pub username: String,
}

fn merge_usernames(
    logs: Vec<AuditLog>,
    usernames: &HashMap<Uuid, String>,
) -> Vec<TaskHistoryEntry> {
    logs.into_iter()
        .map(|log| {
            let username = usernames
                .get(&log.user_id)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_USER.to_string());
            TaskHistoryEntry { log, username }
        })
        .collect()
}

#[utoipa::path(
    post,
    path = "",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = Task),
        (status = 400, description = "Invalid input", body = axum_helpers::ErrorResponse),
    ),
    tag = "tasks"
)]
pub(crate) async fn create_task(
    user: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), AppError> {
    let command = CreateTask::from_request(input, user.id);
    let task: Task = state
        .rpc
        .call(subjects::CREATE_TASK, &command)
        .await
        .map_err(map_rpc_failure)?;

    Ok((StatusCode::CREATED, Json(task)))
}

#[utoipa::path(
    get,
    path = "",
    params(TaskListQuery),
    responses(
        (status = 200, description = "The caller's tasks, newest first", body = [Task]),
    ),
    tag = "tasks"
)]
pub(crate) async fn list_tasks(
    user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<TaskListQuery>,
) -> Result<Json<Vec<Task>>, AppError> {
    let filter = TaskFilter {
        user_id: user.id,
        status: query.status,
        priority: query.priority,
    };
    let tasks: Vec<Task> = state
        .rpc
        .call(subjects::FIND_ALL_TASKS, &filter)
        .await
        .map_err(map_rpc_failure)?;

    Ok(Json(tasks))
}

#[utoipa::path(
    get,
    path = "/{id}",
    params(("id" = Uuid, Path, description = "Task id")),
    responses(
        (status = 200, description = "Task with assignees, comments and history", body = TaskDetail),
        (status = 404, description = "No such task", body = axum_helpers::ErrorResponse),
    ),
    tag = "tasks"
)]
pub(crate) async fn get_task(
    _user: AuthUser,
    State(state): State<AppState>,
    UuidPath(id): UuidPath,
) -> Result<Json<TaskDetail>, AppError> {
    let detail: TaskDetail = state
        .rpc
        .call(subjects::FIND_ONE_TASK, &id)
        .await
        .map_err(map_rpc_failure)?;

    Ok(Json(detail))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    params(("id" = Uuid, Path, description = "Task id")),
    request_body = UpdateTask,
    responses(
        (status = 200, description = "Updated task", body = Task),
        (status = 404, description = "No such task", body = axum_helpers::ErrorResponse),
    ),
    tag = "tasks"
)]
pub(crate) async fn update_task(
    user: AuthUser,
    State(state): State<AppState>,
    UuidPath(id): UuidPath,
    ValidatedJson(update): ValidatedJson<UpdateTask>,
) -> Result<Json<Task>, AppError> {
    let command = UpdateTaskCommand {
        id,
        update,
        user_id: user.id,
    };
    let task: Task = state
        .rpc
        .call(subjects::UPDATE_TASK, &command)
        .await
        .map_err(map_rpc_failure)?;

    Ok(Json(task))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    params(("id" = Uuid, Path, description = "Task id")),
    responses(
        (status = 200, description = "Task deleted", body = RemoveTaskResponse),
        (status = 404, description = "No such task", body = axum_helpers::ErrorResponse),
    ),
    tag = "tasks"
)]
pub(crate) async fn remove_task(
    _user: AuthUser,
    State(state): State<AppState>,
    UuidPath(id): UuidPath,
) -> Result<Json<RemoveTaskResponse>, AppError> {
    let response: RemoveTaskResponse = state
        .rpc
        .call(subjects::REMOVE_TASK, &id)
        .await
        .map_err(map_rpc_failure)?;

    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/{id}/history",
    params(("id" = Uuid, Path, description = "Task id")),
    responses(
        (status = 200, description = "Audit trail with usernames, newest first", body = [TaskHistoryEntry]),
        (status = 404, description = "No such task", body = axum_helpers::ErrorResponse),
    ),
    tag = "tasks"
)]
pub(crate) async fn task_history(
    _user: AuthUser,
    State(state): State<AppState>,
    UuidPath(id): UuidPath,
) -> Result<Json<Vec<TaskHistoryEntry>>, AppError> {
    let logs: Vec<AuditLog> = state
        .rpc
        .call(subjects::FIND_TASK_HISTORY, &id)
        .await
        .map_err(map_rpc_failure)?;

    if logs.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let user_ids: HashSet<Uuid> = logs.iter().map(|log| log.user_id).collect();

    let lookups = user_ids.into_iter().map(|user_id| {
        let rpc = state.rpc.clone();
        async move {
            let result: Result<UserResponse, _> =
                rpc.call(subjects::GET_USER_BY_ID, &user_id).await;
            (user_id, result)
        }
    });

    let mut usernames = HashMap::new();
    for (user_id, result) in join_all(lookups).await {
        match result {
            Ok(user) => {
                usernames.insert(user_id, user.username);
            }
            Err(e) => {
                tracing::warn!(user_id = %user_id, error = %e, "User lookup failed, using placeholder");
            }
        }
    }

    Ok(Json(merge_usernames(logs, &usernames)))
}
