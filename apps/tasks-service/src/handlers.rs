//! Broker command dispatch for the tasks service.

use crate::events::TaskEvents;
use async_trait::async_trait;
use domain_tasks::{
    CreateComment, CreateTask, TaskFilter, TaskRepository, TaskService, UpdateTaskCommand,
};
use messaging::{CommandHandler, EventPublisher, RpcError, subjects};
use serde::de::DeserializeOwned;
use uuid::Uuid;

/// Routes task command subjects to the task service and publishes the
/// matching lifecycle event after each successful write.
pub struct TaskCommandHandler<R: TaskRepository> {
    service: TaskService<R>,
    events: TaskEvents,
}

impl<R: TaskRepository> TaskCommandHandler<R> {
    pub fn new(service: TaskService<R>, publisher: EventPublisher) -> Self {
        Self {
            service,
            events: TaskEvents::new(publisher),
        }
    }
}

fn decode<T: DeserializeOwned>(payload: &[u8]) -> Result<T, RpcError> {
    serde_json::from_slice(payload).map_err(|e| RpcError::validation(format!("Invalid payload: {e}")))
}

/// Single-id commands carry the task id as a bare JSON string.
fn decode_id(payload: &[u8]) -> Result<Uuid, RpcError> {
    decode::<Uuid>(payload)
}

#[async_trait]
impl<R: TaskRepository + 'static> CommandHandler for TaskCommandHandler<R> {
    async fn handle(&self, subject: &str, payload: &[u8]) -> Result<serde_json::Value, RpcError> {
        let reply = match subject {
            subjects::CREATE_TASK => {
                let command: CreateTask = decode(payload)?;
                let task = self.service.create_task(command).await?;
                self.events.task_created(&task).await;
                serde_json::to_value(task)
            }
            subjects::FIND_ALL_TASKS => {
                let filter: TaskFilter = decode(payload)?;
                serde_json::to_value(self.service.find_all(filter).await?)
            }
            subjects::FIND_ONE_TASK => {
                let id = decode_id(payload)?;
                serde_json::to_value(self.service.find_one(id).await?)
            }
            subjects::UPDATE_TASK => {
                let command: UpdateTaskCommand = decode(payload)?;
                let task = self.service.update_task(command).await?;
                self.events.task_updated(&task).await;
                serde_json::to_value(task)
            }
            subjects::REMOVE_TASK => {
                let id = decode_id(payload)?;
                let removed = self.service.remove_task(id).await?;
                self.events.task_deleted(&removed).await;
                serde_json::to_value(domain_tasks::RemoveTaskResponse { deleted: true })
            }
            subjects::FIND_TASK_HISTORY => {
                let id = decode_id(payload)?;
                serde_json::to_value(self.service.find_task_history(id).await?)
            }
            subjects::CREATE_COMMENT => {
                let command: CreateComment = decode(payload)?;
                serde_json::to_value(self.service.create_comment(command).await?)
            }
            subjects::FIND_COMMENTS_BY_TASK => {
                let id = decode_id(payload)?;
                serde_json::to_value(self.service.find_comments(id).await?)
            }
            other => {
                return Err(RpcError::internal(format!("Unhandled command: {other}")));
            }
        };

        reply.map_err(|e| RpcError::internal(format!("Failed to encode reply: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_id_accepts_bare_json_string() {
        let id = Uuid::new_v4();
        let payload = serde_json::to_vec(&id.to_string()).unwrap();
        assert_eq!(decode_id(&payload).unwrap(), id);
    }

    #[test]
    fn test_decode_filter_with_camel_case_user_id() {
        let user_id = Uuid::new_v4();
        let payload = serde_json::json!({"userId": user_id, "status": "IN_PROGRESS"});
        let filter: TaskFilter = decode(&serde_json::to_vec(&payload).unwrap()).unwrap();
        assert_eq!(filter.user_id, user_id);
        assert_eq!(filter.status, Some(domain_tasks::TaskStatus::InProgress));
        assert_eq!(filter.priority, None);
    }

    #[test]
    fn test_decode_update_command_envelope() {
        let payload = serde_json::json!({
            "id": Uuid::new_v4(),
            "updateTaskDto": {"status": "DONE"},
            "userId": Uuid::new_v4(),
        });
        let command: UpdateTaskCommand = decode(&serde_json::to_vec(&payload).unwrap()).unwrap();
        assert_eq!(command.update.status, Some(domain_tasks::TaskStatus::Done));
        assert!(command.update.title.is_none());
    }
}
