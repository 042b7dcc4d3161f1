use crate::error::TaskResult;
use crate::models::{AuditLog, Comment, Task, TaskDetail, TaskFilter};
use async_trait::async_trait;
use uuid::Uuid;

/// Persistence seam for tasks, comments and audit history.
///
/// Mutations that touch several tables (assignee rewrites, audit entries,
/// the delete cascade) are single methods so implementations can run them
/// in one transaction.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Insert a task together with its initial assignee rows.
    async fn create(&self, task: Task, assignee_ids: Vec<Uuid>) -> TaskResult<Task>;

    async fn get_by_id(&self, id: Uuid) -> TaskResult<Option<Task>>;

    /// Task plus assignees, comments and audit history in one read.
    async fn get_detail(&self, id: Uuid) -> TaskResult<Option<TaskDetail>>;

    /// Owned tasks matching the filter, newest first.
    async fn list(&self, filter: TaskFilter) -> TaskResult<Vec<Task>>;

    /// Persist an updated task, optionally replacing its assignee set, and
    /// append the given audit entries. All in one transaction.
    async fn update_with_audit(
        &self,
        task: Task,
        assignee_ids: Option<Vec<Uuid>>,
        audit: Vec<AuditLog>,
    ) -> TaskResult<Task>;

    /// Delete a task and its comments, audit entries and assignee rows.
    /// Returns false when the task does not exist.
    async fn delete_cascade(&self, id: Uuid) -> TaskResult<bool>;

    /// Audit entries for a task, newest first.
    async fn list_audit(&self, task_id: Uuid) -> TaskResult<Vec<AuditLog>>;

    /// Insert a comment and its COMMENT_ADDED audit entry in one transaction.
    async fn create_comment_with_audit(
        &self,
        comment: Comment,
        audit: AuditLog,
    ) -> TaskResult<Comment>;

    /// Comments on a task, oldest first.
    async fn list_comments(&self, task_id: Uuid) -> TaskResult<Vec<Comment>>;
}
