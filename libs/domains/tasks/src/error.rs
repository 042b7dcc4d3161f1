use messaging::RpcError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Task not found: {0}")]
    NotFound(Uuid),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type TaskResult<T> = Result<T, TaskError>;

impl From<sea_orm::DbErr> for TaskError {
    fn from(err: sea_orm::DbErr) -> Self {
        TaskError::Database(err.to_string())
    }
}

/// Convert TaskError to the wire error envelope at the responder boundary
impl From<TaskError> for RpcError {
    fn from(err: TaskError) -> Self {
        match &err {
            TaskError::NotFound(id) => {
                RpcError::not_found(format!("Task with ID \"{}\" not found", id))
            }
            TaskError::Validation(msg) => RpcError::validation(msg.clone()),
            TaskError::Database(msg) => {
                tracing::error!("Database error: {}", msg);
                RpcError::internal("An internal error occurred".to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use messaging::ErrorKind;

    #[test]
    fn test_not_found_maps_to_not_found_kind() {
        let id = Uuid::new_v4();
        let err: RpcError = TaskError::NotFound(id).into();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(err.message.contains(&id.to_string()));
    }

    #[test]
    fn test_database_error_is_masked() {
        let err: RpcError = TaskError::Database("connection string leak".to_string()).into();
        assert_eq!(err.kind, ErrorKind::Internal);
        assert!(!err.message.contains("connection"));
    }
}
