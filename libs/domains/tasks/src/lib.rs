//! Task domain: tasks, assignees, comments, and the append-only audit trail.

pub mod entity;
pub mod error;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{TaskError, TaskResult};
pub use models::{
    AuditAction, AuditDetails, AuditLog, Assignee, Comment, CreateComment, CreateCommentRequest,
    CreateTask, CreateTaskRequest, RemoveTaskResponse, Task, TaskDetail, TaskFilter, TaskPriority,
    TaskStatus, UpdateTask, UpdateTaskCommand,
};
pub use postgres::PgTaskRepository;
pub use repository::TaskRepository;
pub use service::TaskService;
