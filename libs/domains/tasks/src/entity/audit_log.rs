use crate::models::AuditAction;
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sea-ORM Entity for the audit_logs table.
///
/// `details` is stored as jsonb; rows are append-only and removed only by
/// the task delete cascade.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "audit_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub task_id: Uuid,
    pub user_id: Uuid,
    pub action: AuditAction,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub details: Option<Json>,
    pub timestamp: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::task::Entity",
        from = "Column::TaskId",
        to = "super::task::Column::Id"
    )]
    Task,
}

impl Related<super::task::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Task.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::models::AuditLog {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            task_id: model.task_id,
            user_id: model.user_id,
            action: model.action,
            details: model
                .details
                .and_then(|json| serde_json::from_value(json).ok()),
            timestamp: model.timestamp.into(),
        }
    }
}

impl From<crate::models::AuditLog> for ActiveModel {
    fn from(log: crate::models::AuditLog) -> Self {
        ActiveModel {
            id: Set(log.id),
            task_id: Set(log.task_id),
            user_id: Set(log.user_id),
            action: Set(log.action),
            details: Set(log
                .details
                .as_ref()
                .and_then(|d| serde_json::to_value(d).ok())),
            timestamp: Set(log.timestamp.into()),
        }
    }
}
