use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sea-ORM Entity for the comments table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "comments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub task_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
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

impl From<Model> for crate::models::Comment {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            content: model.content,
            task_id: model.task_id,
            user_id: model.user_id,
            created_at: model.created_at.into(),
        }
    }
}

impl From<crate::models::Comment> for ActiveModel {
    fn from(comment: crate::models::Comment) -> Self {
        ActiveModel {
            id: Set(comment.id),
            content: Set(comment.content),
            task_id: Set(comment.task_id),
            user_id: Set(comment.user_id),
            created_at: Set(comment.created_at.into()),
        }
    }
}
