//! Broker subjects for the internal command and event contract.
//!
//! Request/reply commands use the exact command name as the subject; each
//! owning service subscribes with its queue group so replicas load-balance.

// Auth service commands
pub const REGISTER: &str = "register";
pub const LOGIN: &str = "login";
pub const REFRESH_TOKEN: &str = "refresh_token";
pub const GET_USER_BY_ID: &str = "get_user_by_id";
pub const GET_ALL_USERS: &str = "get_all_users";

// Tasks service commands
pub const CREATE_TASK: &str = "create_task";
pub const FIND_ALL_TASKS: &str = "find_all_tasks";
pub const FIND_ONE_TASK: &str = "find_one_task";
pub const UPDATE_TASK: &str = "update_task";
pub const REMOVE_TASK: &str = "remove_task";
pub const FIND_TASK_HISTORY: &str = "find_task_history";
pub const CREATE_COMMENT: &str = "create_comment";
pub const FIND_COMMENTS_BY_TASK: &str = "find_comments_by_task";

// Fire-and-forget domain events
pub const TASK_CREATED: &str = "task_created";
pub const TASK_UPDATED: &str = "task_updated";
pub const TASK_DELETED: &str = "task_deleted";

// Queue groups
pub const AUTH_QUEUE_GROUP: &str = "auth-service";
pub const TASKS_QUEUE_GROUP: &str = "tasks-service";
pub const NOTIFICATIONS_QUEUE_GROUP: &str = "notifications-service";

/// All command subjects owned by the auth service
pub const AUTH_COMMANDS: &[&str] = &[REGISTER, LOGIN, REFRESH_TOKEN, GET_USER_BY_ID, GET_ALL_USERS];

/// All command subjects owned by the tasks service
pub const TASKS_COMMANDS: &[&str] = &[
    CREATE_TASK,
    FIND_ALL_TASKS,
    FIND_ONE_TASK,
    UPDATE_TASK,
    REMOVE_TASK,
    FIND_TASK_HISTORY,
    CREATE_COMMENT,
    FIND_COMMENTS_BY_TASK,
];

/// All domain event subjects the notifications service relays
pub const TASK_EVENTS: &[&str] = &[TASK_CREATED, TASK_UPDATED, TASK_DELETED];
