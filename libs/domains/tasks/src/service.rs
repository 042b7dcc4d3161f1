use crate::error::{TaskError, TaskResult};
use crate::models::{
    AuditAction, AuditLog, Comment, CreateComment, CreateTask, Task, TaskDetail, TaskFilter,
    UpdateTaskCommand,
};
use crate::repository::TaskRepository;
use chrono::Utc;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

/// Task domain logic, generic over the storage backend.
#[derive(Clone)]
pub struct TaskService<R: TaskRepository> {
    repository: Arc<R>,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self, input), fields(user_id = %input.user_id))]
    pub async fn create_task(&self, input: CreateTask) -> TaskResult<Task> {
        input
            .validate()
            .map_err(|e| TaskError::Validation(e.to_string()))?;

        let task = Task::new(&input);
        self.repository.create(task, input.assignee_ids).await
    }

    #[instrument(skip(self), fields(user_id = %filter.user_id))]
    pub async fn find_all(&self, filter: TaskFilter) -> TaskResult<Vec<Task>> {
        self.repository.list(filter).await
    }

    #[instrument(skip(self))]
    pub async fn find_one(&self, id: Uuid) -> TaskResult<TaskDetail> {
        self.repository
            .get_detail(id)
            .await?
            .ok_or(TaskError::NotFound(id))
    }

    /// Apply a partial update. Status and priority changes are recorded as
    /// audit entries attributed to the acting user; no entry is written for
    /// a field that did not actually change.
    #[instrument(skip(self, command), fields(task_id = %command.id))]
    pub async fn update_task(&self, command: UpdateTaskCommand) -> TaskResult<Task> {
        command
            .update
            .validate()
            .map_err(|e| TaskError::Validation(e.to_string()))?;

        let current = self
            .repository
            .get_by_id(command.id)
            .await?
            .ok_or(TaskError::NotFound(command.id))?;

        let mut updated = current.clone();
        updated.apply_update(&command.update);

        let mut audit = Vec::new();
        if updated.status != current.status {
            audit.push(AuditLog::field_change(
                current.id,
                command.user_id,
                AuditAction::StatusChange,
                "status",
                current.status,
                updated.status,
            ));
        }
        if updated.priority != current.priority {
            audit.push(AuditLog::field_change(
                current.id,
                command.user_id,
                AuditAction::PriorityChange,
                "priority",
                current.priority,
                updated.priority,
            ));
        }

        self.repository
            .update_with_audit(updated, command.update.assignee_ids, audit)
            .await
    }

    /// Delete a task and everything hanging off it. Returns the task as it
    /// was before deletion so callers can still describe it in events.
    #[instrument(skip(self))]
    pub async fn remove_task(&self, id: Uuid) -> TaskResult<Task> {
        let task = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(TaskError::NotFound(id))?;

        if !self.repository.delete_cascade(id).await? {
            return Err(TaskError::NotFound(id));
        }
        Ok(task)
    }

    #[instrument(skip(self))]
    pub async fn find_task_history(&self, task_id: Uuid) -> TaskResult<Vec<AuditLog>> {
        self.repository
            .get_by_id(task_id)
            .await?
            .ok_or(TaskError::NotFound(task_id))?;

        self.repository.list_audit(task_id).await
    }

    #[instrument(skip(self, input), fields(task_id = %input.task_id))]
    pub async fn create_comment(&self, input: CreateComment) -> TaskResult<Comment> {
        input
            .validate()
            .map_err(|e| TaskError::Validation(e.to_string()))?;

        self.repository
            .get_by_id(input.task_id)
            .await?
            .ok_or(TaskError::NotFound(input.task_id))?;

        let comment = Comment {
            id: Uuid::now_v7(),
            content: input.content,
            task_id: input.task_id,
            user_id: input.user_id,
            created_at: Utc::now(),
        };
        let audit = AuditLog::new(
            comment.task_id,
            comment.user_id,
            AuditAction::CommentAdded,
            None,
        );
        self.repository.create_comment_with_audit(comment, audit).await
    }

    #[instrument(skip(self))]
    pub async fn find_comments(&self, task_id: Uuid) -> TaskResult<Vec<Comment>> {
        self.repository
            .get_by_id(task_id)
            .await?
            .ok_or(TaskError::NotFound(task_id))?;

        self.repository.list_comments(task_id).await
    }
}
