//! Read-only views of the `orders` and `users` tables owned by sibling
//! modules, used to populate order changes.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::contract::model::{OrderSummary, UserSummary};
use crate::domain::ports::ReferenceDirectory;
use crate::domain::repo::StorageError;
use crate::infra::storage::sea_orm_repo::classify_db_err;

pub mod order {
    use chrono::{DateTime, Utc};
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "orders")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub user_id: Uuid,
        pub status: String,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod user {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "users")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub name: String,
        pub email: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

impl From<order::Model> for OrderSummary {
    fn from(m: order::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            status: m.status,
            created_at: m.created_at,
        }
    }
}

impl From<user::Model> for UserSummary {
    fn from(m: user::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
        }
    }
}

/// SeaORM lookups over the reference tables.
pub struct SeaOrmReferenceDirectory<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmReferenceDirectory<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl<C> ReferenceDirectory for SeaOrmReferenceDirectory<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn orders_by_ids(&self, ids: &[Uuid]) -> Result<Vec<OrderSummary>, StorageError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = order::Entity::find()
            .filter(order::Column::Id.is_in(ids.iter().copied()))
            .all(&self.conn)
            .await
            .map_err(classify_db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn users_by_ids(&self, ids: &[Uuid]) -> Result<Vec<UserSummary>, StorageError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = user::Entity::find()
            .filter(user::Column::Id.is_in(ids.iter().copied()))
            .all(&self.conn)
            .await
            .map_err(classify_db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
