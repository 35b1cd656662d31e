//! SeaORM-backed repository implementation for the domain port.
//!
//! Generic over `C: ConnectionTrait`, so it can be built on a
//! `DatabaseConnection` or on an open transaction.

use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use crate::contract::model::{OrderChange, OrderChangePatch};
use crate::domain::repo::{OrderChangesRepository, StorageError};
use crate::infra::storage::entity::{ActiveModel as OrderChangeAM, Column, Entity as OrderChangeEntity};

/// Sort a driver error into the domain's storage failure kinds.
pub(crate) fn classify_db_err(err: DbErr) -> StorageError {
    match &err {
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => StorageError::Unavailable(err.to_string()),
        _ => match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg))
            | Some(SqlErr::ForeignKeyConstraintViolation(msg)) => StorageError::Constraint(msg),
            _ => StorageError::Other(err.to_string()),
        },
    }
}

/// SeaORM repository impl.
/// Holds a connection object; its lifetime/ownership is up to the caller.
pub struct SeaOrmOrderChangesRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmOrderChangesRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

#[async_trait::async_trait]
impl<C> OrderChangesRepository for SeaOrmOrderChangesRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync + 'static,
{
    async fn insert(&self, record: OrderChange) -> Result<OrderChange, StorageError> {
        let m = OrderChangeAM {
            id: Set(record.id),
            order_id: Set(record.order_id),
            user_id: Set(record.user_id),
            change_date: Set(record.change_date),
            changes: Set(record.changes),
        };
        let stored = m.insert(&self.conn).await.map_err(classify_db_err)?;
        Ok(stored.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<OrderChange>, StorageError> {
        let found = OrderChangeEntity::find_by_id(id)
            .one(&self.conn)
            .await
            .map_err(classify_db_err)?;
        Ok(found.map(Into::into))
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<OrderChange>, StorageError> {
        let rows = OrderChangeEntity::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_asc(Column::Id)
            .all(&self.conn)
            .await
            .map_err(classify_db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_page(&self, offset: u64, limit: u64) -> Result<Vec<OrderChange>, StorageError> {
        let rows = OrderChangeEntity::find()
            .order_by_asc(Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.conn)
            .await
            .map_err(classify_db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(
        &self,
        id: Uuid,
        patch: OrderChangePatch,
    ) -> Result<Option<OrderChange>, StorageError> {
        if patch.is_empty() {
            return self.find_by_id(id).await;
        }

        // Only the Set columns end up in the UPDATE statement.
        let mut m = OrderChangeAM {
            id: Unchanged(id),
            ..Default::default()
        };
        if let Some(order_id) = patch.order_id {
            m.order_id = Set(order_id);
        }
        if let Some(user_id) = patch.user_id {
            m.user_id = Set(user_id);
        }
        if let Some(change_date) = patch.change_date {
            m.change_date = Set(change_date);
        }
        if let Some(changes) = patch.changes {
            m.changes = Set(changes);
        }

        match m.update(&self.conn).await {
            Ok(updated) => Ok(Some(updated.into())),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(classify_db_err(e)),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<Option<OrderChange>, StorageError> {
        let txn = self.conn.begin().await.map_err(classify_db_err)?;

        let Some(found) = OrderChangeEntity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(classify_db_err)?
        else {
            txn.rollback().await.map_err(classify_db_err)?;
            return Ok(None);
        };

        OrderChangeEntity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(classify_db_err)?;
        txn.commit().await.map_err(classify_db_err)?;

        Ok(Some(found.into()))
    }
}
