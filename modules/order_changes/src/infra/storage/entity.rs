use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

use crate::contract::model::OrderChange;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "order_changes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub order_id: Uuid,
    #[sea_orm(indexed)]
    pub user_id: Uuid,
    pub change_date: DateTime<Utc>,
    #[sea_orm(column_type = "Text")]
    pub changes: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for OrderChange {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            order_id: m.order_id,
            user_id: m.user_id,
            change_date: m.change_date,
            changes: m.changes,
        }
    }
}
