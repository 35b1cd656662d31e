use async_trait::async_trait;
use modkit::PageRequest;
use uuid::Uuid;

use crate::contract::{
    error::OrderChangesError,
    model::{NewOrderChange, OrderChange, OrderChangeDetails, OrderChangePatch},
};

/// Public API of the order_changes module for in-process consumers.
#[async_trait]
pub trait OrderChangesApi: Send + Sync {
    /// Create a record; the id is always generated here.
    async fn create_order_change(
        &self,
        new: NewOrderChange,
    ) -> Result<OrderChange, OrderChangesError>;

    /// Get one record with its references populated.
    async fn get_order_change(&self, id: Uuid) -> Result<OrderChangeDetails, OrderChangesError>;

    /// All records of one user, populated, oldest first.
    async fn list_user_order_changes(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<OrderChangeDetails>, OrderChangesError>;

    /// One page of all records, populated, oldest first.
    async fn list_order_changes_page(
        &self,
        page: PageRequest,
    ) -> Result<Vec<OrderChangeDetails>, OrderChangesError>;

    /// Apply a partial update and return the updated record.
    async fn update_order_change(
        &self,
        id: Uuid,
        patch: OrderChangePatch,
    ) -> Result<OrderChange, OrderChangesError>;

    /// Delete a record and return what was deleted.
    async fn delete_order_change(&self, id: Uuid) -> Result<OrderChange, OrderChangesError>;
}
