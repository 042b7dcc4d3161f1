use utoipa::OpenApi;

/// Authentication endpoints
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::auth::register,
        crate::api::auth::login,
        crate::api::auth::refresh,
        crate::api::auth::profile,
    ),
    components(schemas(
        domain_users::RegisterRequest,
        domain_users::LoginRequest,
        domain_users::LoginResponse,
        domain_users::RefreshRequest,
        domain_users::RefreshResponse,
        domain_users::UserResponse,
        crate::api::auth::ProfileResponse,
    )),
    tags((name = "auth", description = "Registration, login and token refresh"))
)]
pub struct AuthApiDoc;

/// User lookup endpoints
#[derive(OpenApi)]
#[openapi(
    paths(crate::api::users::list_users, crate::api::users::get_user),
    components(schemas(domain_users::UserResponse)),
    tags((name = "users", description = "User lookups"))
)]
pub struct UsersApiDoc;

/// Task, comment and history endpoints
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::tasks::create_task,
        crate::api::tasks::list_tasks,
        crate::api::tasks::get_task,
        crate::api::tasks::update_task,
        crate::api::tasks::remove_task,
        crate::api::tasks::task_history,
        crate::api::comments::create_comment,
        crate::api::comments::list_comments,
    ),
    components(schemas(
        domain_tasks::Task,
        domain_tasks::TaskDetail,
        domain_tasks::TaskStatus,
        domain_tasks::TaskPriority,
        domain_tasks::CreateTaskRequest,
        domain_tasks::UpdateTask,
        domain_tasks::RemoveTaskResponse,
        domain_tasks::Comment,
        domain_tasks::CreateCommentRequest,
        domain_tasks::AuditLog,
        domain_tasks::AuditAction,
        domain_tasks::AuditDetails,
        crate::api::tasks::TaskHistoryEntry,
    )),
    tags(
        (name = "tasks", description = "Task CRUD and audit history"),
        (name = "comments", description = "Comments on tasks"),
    )
)]
pub struct TasksApiDoc;

#[derive(OpenApi)]
#[openapi(
    components(schemas(axum_helpers::ErrorResponse)),
    info(
        title = "Task Management API",
        version = "0.1.0",
        description = "Gateway for the task management services: auth, tasks, comments and audit history"
    ),
    servers((url = "/api", description = "API base path")),
    nest(
        (path = "/auth", api = AuthApiDoc),
        (path = "/users", api = UsersApiDoc),
        (path = "/tasks", api = TasksApiDoc)
    )
)]
pub struct ApiDoc;
