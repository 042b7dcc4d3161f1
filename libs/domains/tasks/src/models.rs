use chrono::{DateTime, Utc};
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use strum::Display;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Task status
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    Default,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "task_status")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Task not started
    #[default]
    #[sea_orm(string_value = "TODO")]
    Todo,
    /// Task in progress
    #[sea_orm(string_value = "IN_PROGRESS")]
    InProgress,
    /// Task under review
    #[sea_orm(string_value = "REVIEW")]
    Review,
    /// Task completed
    #[sea_orm(string_value = "DONE")]
    Done,
}

/// Task priority levels
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    Default,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "task_priority")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskPriority {
    #[sea_orm(string_value = "LOW")]
    Low,
    /// Default priority
    #[default]
    #[sea_orm(string_value = "MEDIUM")]
    Medium,
    #[sea_orm(string_value = "HIGH")]
    High,
    #[sea_orm(string_value = "URGENT")]
    Urgent,
}

/// Audit log action kinds
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "audit_action")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    #[sea_orm(string_value = "STATUS_CHANGE")]
    StatusChange,
    #[sea_orm(string_value = "PRIORITY_CHANGE")]
    PriorityChange,
    #[sea_orm(string_value = "COMMENT_ADDED")]
    CommentAdded,
}

/// Task entity - represents a task owned by a user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Task {
    /// Unique identifier
    pub id: Uuid,
    /// Task title
    pub title: String,
    /// Task description
    pub description: Option<String>,
    /// Task status
    pub status: TaskStatus,
    /// Task priority
    pub priority: TaskPriority,
    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,
    /// Owner (creator) of the task
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// A user assigned to a task. No lifecycle of its own: assignees are
/// created and replaced alongside the task.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Assignee {
    pub id: Uuid,
    #[serde(rename = "taskId")]
    pub task_id: Uuid,
    #[serde(rename = "userId")]
    pub user_id: Uuid,
}

/// Comment on a task
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Comment {
    pub id: Uuid,
    pub content: String,
    #[serde(rename = "taskId")]
    pub task_id: Uuid,
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Structured detail for a field-change audit entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuditDetails {
    pub field: String,
    #[serde(rename = "oldValue")]
    pub old_value: String,
    #[serde(rename = "newValue")]
    pub new_value: String,
}

/// Append-only audit trail entry for a task
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuditLog {
    pub id: Uuid,
    #[serde(rename = "taskId")]
    pub task_id: Uuid,
    /// The acting user
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub action: AuditAction,
    pub details: Option<AuditDetails>,
    pub timestamp: DateTime<Utc>,
}

impl AuditLog {
    pub fn new(
        task_id: Uuid,
        user_id: Uuid,
        action: AuditAction,
        details: Option<AuditDetails>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            task_id,
            user_id,
            action,
            details,
            timestamp: Utc::now(),
        }
    }

    /// Entry recording a single changed field with its old and new values
    pub fn field_change(
        task_id: Uuid,
        user_id: Uuid,
        action: AuditAction,
        field: &str,
        old_value: impl ToString,
        new_value: impl ToString,
    ) -> Self {
        Self::new(
            task_id,
            user_id,
            action,
            Some(AuditDetails {
                field: field.to_string(),
                old_value: old_value.to_string(),
                new_value: new_value.to_string(),
            }),
        )
    }
}

/// Client-facing DTO for creating a task (owner comes from the verified token)
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, rename = "assigneeIds")]
    pub assignee_ids: Vec<Uuid>,
}

/// Wire command for `create_task`: the request plus the owner id the
/// gateway took from the verified token
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateTask {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, rename = "assigneeIds")]
    pub assignee_ids: Vec<Uuid>,
    #[serde(rename = "userId")]
    pub user_id: Uuid,
}

impl CreateTask {
    pub fn from_request(request: CreateTaskRequest, user_id: Uuid) -> Self {
        Self {
            title: request.title,
            description: request.description,
            status: request.status,
            priority: request.priority,
            due_date: request.due_date,
            assignee_ids: request.assignee_ids,
            user_id,
        }
    }
}

/// DTO for partially updating a task
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateTask {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<DateTime<Utc>>,
    #[serde(rename = "assigneeIds")]
    pub assignee_ids: Option<Vec<Uuid>>,
}

/// Wire command for `update_task`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateTaskCommand {
    pub id: Uuid,
    #[serde(rename = "updateTaskDto")]
    pub update: UpdateTask,
    /// The acting user, recorded in audit entries
    #[serde(rename = "userId")]
    pub user_id: Uuid,
}

/// Wire payload for `find_all_tasks`
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, IntoParams)]
pub struct TaskFilter {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
}

/// Client-facing DTO for creating a comment
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1))]
    pub content: String,
}

/// Wire command for `create_comment`
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateComment {
    #[validate(length(min = 1))]
    pub content: String,
    #[serde(rename = "taskId")]
    pub task_id: Uuid,
    #[serde(rename = "userId")]
    pub user_id: Uuid,
}

/// Task with its owned relations, returned by `find_one_task`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TaskDetail {
    #[serde(flatten)]
    pub task: Task,
    pub assignees: Vec<Assignee>,
    pub comments: Vec<Comment>,
    #[serde(rename = "auditLogs")]
    pub audit_logs: Vec<AuditLog>,
}

/// Reply shape for `remove_task`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RemoveTaskResponse {
    pub deleted: bool,
}

impl Task {
    /// Build a new task from a create command (assignees handled separately)
    pub fn new(input: &CreateTask) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            title: input.title.clone(),
            description: input.description.clone(),
            status: input.status,
            priority: input.priority,
            due_date: input.due_date,
            user_id: input.user_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update in place
    pub fn apply_update(&mut self, update: &UpdateTask) {
        if let Some(ref title) = update.title {
            self.title = title.clone();
        }
        if let Some(ref description) = update.description {
            self.description = Some(description.clone());
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(priority) = update.priority {
            self.priority = priority;
        }
        if let Some(due_date) = update.due_date {
            self.due_date = Some(due_date);
        }
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_format_is_screaming_snake() {
        assert_eq!(
            serde_json::to_value(TaskStatus::InProgress).unwrap(),
            serde_json::json!("IN_PROGRESS")
        );
        assert_eq!(TaskStatus::InProgress.to_string(), "IN_PROGRESS");
    }

    #[test]
    fn test_task_serializes_with_camel_case_user_id() {
        let task = Task::new(&CreateTask {
            title: "Ship it".to_string(),
            description: None,
            status: TaskStatus::default(),
            priority: TaskPriority::default(),
            due_date: None,
            assignee_ids: vec![],
            user_id: Uuid::new_v4(),
        });

        let json = serde_json::to_value(&task).unwrap();
        assert!(json.get("userId").is_some());
        assert!(json.get("user_id").is_none());
        assert_eq!(json["status"], "TODO");
        assert_eq!(json["priority"], "MEDIUM");
    }

    #[test]
    fn test_audit_details_wire_field_names() {
        let log = AuditLog::field_change(
            Uuid::new_v4(),
            Uuid::new_v4(),
            AuditAction::StatusChange,
            "status",
            TaskStatus::Todo,
            TaskStatus::Done,
        );

        let json = serde_json::to_value(&log).unwrap();
        assert_eq!(json["action"], "STATUS_CHANGE");
        assert_eq!(json["details"]["field"], "status");
        assert_eq!(json["details"]["oldValue"], "TODO");
        assert_eq!(json["details"]["newValue"], "DONE");
    }

    #[test]
    fn test_apply_update_only_touches_provided_fields() {
        let mut task = Task::new(&CreateTask {
            title: "Original".to_string(),
            description: Some("keep me".to_string()),
            status: TaskStatus::Todo,
            priority: TaskPriority::High,
            due_date: None,
            assignee_ids: vec![],
            user_id: Uuid::new_v4(),
        });

        task.apply_update(&UpdateTask {
            status: Some(TaskStatus::Review),
            ..Default::default()
        });

        assert_eq!(task.status, TaskStatus::Review);
        assert_eq!(task.title, "Original");
        assert_eq!(task.priority, TaskPriority::High);
        assert_eq!(task.description.as_deref(), Some("keep me"));
    }
}
