//! Domain events emitted after successful task writes.
//!
//! Events are best-effort: publishing happens after the write committed and
//! a broker failure is logged, never propagated back to the command caller.

use domain_tasks::Task;
use messaging::{EventPublisher, subjects};
use serde::Serialize;
use uuid::Uuid;

/// `task_deleted` carries only the id and the owner; the row is gone.
#[derive(Debug, Clone, Serialize)]
pub struct TaskDeletedEvent {
    pub id: Uuid,
    #[serde(rename = "userId")]
    pub user_id: Uuid,
}

/// Emits task lifecycle events on their well-known subjects.
#[derive(Clone)]
pub struct TaskEvents {
    publisher: EventPublisher,
}

impl TaskEvents {
    pub fn new(publisher: EventPublisher) -> Self {
        Self { publisher }
    }

    pub async fn task_created(&self, task: &Task) {
        self.publisher.publish(subjects::TASK_CREATED, task).await;
    }

    pub async fn task_updated(&self, task: &Task) {
        self.publisher.publish(subjects::TASK_UPDATED, task).await;
    }

    pub async fn task_deleted(&self, task: &Task) {
        let event = TaskDeletedEvent {
            id: task.id,
            user_id: task.user_id,
        };
        self.publisher.publish(subjects::TASK_DELETED, &event).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deleted_event_wire_shape() {
        let event = TaskDeletedEvent {
            id: Uuid::nil(),
            user_id: Uuid::nil(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "00000000-0000-0000-0000-000000000000",
                "userId": "00000000-0000-0000-0000-000000000000",
            })
        );
    }
}
