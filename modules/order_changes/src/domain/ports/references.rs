use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::model::{OrderSummary, UserSummary};
use crate::domain::repo::StorageError;

/// Output port: batched lookups of the entities an order change refers to.
///
/// Ids that do not exist are simply absent from the result.
#[async_trait]
pub trait ReferenceDirectory: Send + Sync {
    async fn orders_by_ids(&self, ids: &[Uuid]) -> Result<Vec<OrderSummary>, StorageError>;
    async fn users_by_ids(&self, ids: &[Uuid]) -> Result<Vec<UserSummary>, StorageError>;
}
