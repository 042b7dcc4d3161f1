use crate::entity::{assignee, audit_log, comment, task};
use crate::error::TaskResult;
use crate::models::{AuditLog, Comment, Task, TaskDetail, TaskFilter};
use crate::repository::TaskRepository;
use async_trait::async_trait;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use uuid::Uuid;

/// PostgreSQL-backed task repository.
#[derive(Clone)]
pub struct PgTaskRepository {
    db: DatabaseConnection,
}

impl PgTaskRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn insert_assignees(
        txn: &DatabaseTransaction,
        task_id: Uuid,
        assignee_ids: &[Uuid],
    ) -> Result<(), sea_orm::DbErr> {
        if assignee_ids.is_empty() {
            return Ok(());
        }
        let rows = assignee_ids.iter().map(|user_id| assignee::ActiveModel {
            id: Set(Uuid::now_v7()),
            task_id: Set(task_id),
            user_id: Set(*user_id),
        });
        assignee::Entity::insert_many(rows).exec(txn).await?;
        Ok(())
    }

    async fn insert_audit(
        txn: &DatabaseTransaction,
        audit: Vec<AuditLog>,
    ) -> Result<(), sea_orm::DbErr> {
        if audit.is_empty() {
            return Ok(());
        }
        let rows = audit.into_iter().map(audit_log::ActiveModel::from);
        audit_log::Entity::insert_many(rows).exec(txn).await?;
        Ok(())
    }
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn create(&self, task: Task, assignee_ids: Vec<Uuid>) -> TaskResult<Task> {
        let txn = self.db.begin().await?;
        let model = task::ActiveModel::from(task);
        let inserted = task::Entity::insert(model)
            .exec_with_returning(&txn)
            .await?;
        Self::insert_assignees(&txn, inserted.id, &assignee_ids).await?;
        txn.commit().await?;
        Ok(inserted.into())
    }

    async fn get_by_id(&self, id: Uuid) -> TaskResult<Option<Task>> {
        let model = task::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn get_detail(&self, id: Uuid) -> TaskResult<Option<TaskDetail>> {
        let Some(model) = task::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let assignees = assignee::Entity::find()
            .filter(assignee::Column::TaskId.eq(id))
            .all(&self.db)
            .await?;
        let comments = comment::Entity::find()
            .filter(comment::Column::TaskId.eq(id))
            .order_by_asc(comment::Column::CreatedAt)
            .all(&self.db)
            .await?;
        let audit_logs = audit_log::Entity::find()
            .filter(audit_log::Column::TaskId.eq(id))
            .order_by_desc(audit_log::Column::Timestamp)
            .all(&self.db)
            .await?;

        Ok(Some(TaskDetail {
            task: model.into(),
            assignees: assignees.into_iter().map(Into::into).collect(),
            comments: comments.into_iter().map(Into::into).collect(),
            audit_logs: audit_logs.into_iter().map(Into::into).collect(),
        }))
    }

    async fn list(&self, filter: TaskFilter) -> TaskResult<Vec<Task>> {
        let mut query = task::Entity::find().filter(task::Column::UserId.eq(filter.user_id));
        if let Some(status) = filter.status {
            query = query.filter(task::Column::Status.eq(status));
        }
        if let Some(priority) = filter.priority {
            query = query.filter(task::Column::Priority.eq(priority));
        }
        let models = query
            .order_by_desc(task::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn update_with_audit(
        &self,
        task: Task,
        assignee_ids: Option<Vec<Uuid>>,
        audit: Vec<AuditLog>,
    ) -> TaskResult<Task> {
        let txn = self.db.begin().await?;
        let task_id = task.id;
        let model = task::ActiveModel::from(task);
        let updated = task::Entity::update(model).exec(&txn).await?;
        if let Some(ids) = assignee_ids {
            assignee::Entity::delete_many()
                .filter(assignee::Column::TaskId.eq(task_id))
                .exec(&txn)
                .await?;
            Self::insert_assignees(&txn, task_id, &ids).await?;
        }
        Self::insert_audit(&txn, audit).await?;
        txn.commit().await?;
        Ok(updated.into())
    }

    async fn delete_cascade(&self, id: Uuid) -> TaskResult<bool> {
        let txn = self.db.begin().await?;
        comment::Entity::delete_many()
            .filter(comment::Column::TaskId.eq(id))
            .exec(&txn)
            .await?;
        audit_log::Entity::delete_many()
            .filter(audit_log::Column::TaskId.eq(id))
            .exec(&txn)
            .await?;
        assignee::Entity::delete_many()
            .filter(assignee::Column::TaskId.eq(id))
            .exec(&txn)
            .await?;
        let result = task::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;
        Ok(result.rows_affected > 0)
    }

    async fn list_audit(&self, task_id: Uuid) -> TaskResult<Vec<AuditLog>> {
        let models = audit_log::Entity::find()
            .filter(audit_log::Column::TaskId.eq(task_id))
            .order_by_desc(audit_log::Column::Timestamp)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn create_comment_with_audit(
        &self,
        comment: Comment,
        audit: AuditLog,
    ) -> TaskResult<Comment> {
        let txn = self.db.begin().await?;
        let inserted = comment::Entity::insert(comment::ActiveModel::from(comment))
            .exec_with_returning(&txn)
            .await?;
        Self::insert_audit(&txn, vec![audit]).await?;
        txn.commit().await?;
        Ok(inserted.into())
    }

    async fn list_comments(&self, task_id: Uuid) -> TaskResult<Vec<Comment>> {
        let models = comment::Entity::find()
            .filter(comment::Column::TaskId.eq(task_id))
            .order_by_asc(comment::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }
}
