use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::contract::model::{OrderChange, OrderChangePatch};

/// Storage failures as the domain sees them. Adapters classify their
/// native errors into one of these.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("constraint violated: {0}")]
    Constraint(String),
    #[error("storage error: {0}")]
    Other(String),
}

/// Port for the domain layer: persistence operations the domain needs.
/// Object-safe and async-friendly via `async_trait`.
///
/// "Natural order" is ascending id; ids are UUID v7, so that is creation order.
#[async_trait]
pub trait OrderChangesRepository: Send + Sync {
    /// Insert a fully-formed record and return it as stored.
    async fn insert(&self, record: OrderChange) -> Result<OrderChange, StorageError>;
    /// Load a record by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<OrderChange>, StorageError>;
    /// All records of one user, natural order.
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<OrderChange>, StorageError>;
    /// Skip `offset`, take at most `limit`, natural order.
    async fn list_page(&self, offset: u64, limit: u64) -> Result<Vec<OrderChange>, StorageError>;
    /// Write only the fields present in `patch`. `None` when the id does not exist.
    async fn update(
        &self,
        id: Uuid,
        patch: OrderChangePatch,
    ) -> Result<Option<OrderChange>, StorageError>;
    /// Delete by id and return the removed record, `None` when it did not exist.
    async fn delete(&self, id: Uuid) -> Result<Option<OrderChange>, StorageError>;
}
