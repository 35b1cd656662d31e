use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use modkit::PageRequest;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::contract::model::{
    NewOrderChange, OrderChange, OrderChangeDetails, OrderChangePatch, OrderSummary, Reference,
    UserSummary,
};
use crate::domain::error::DomainError;
use crate::domain::ports::ReferenceDirectory;
use crate::domain::repo::OrderChangesRepository;

/// Domain service for order-change audit records.
/// Depends only on ports, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn OrderChangesRepository>,
    references: Arc<dyn ReferenceDirectory>,
    config: ServiceConfig,
}

/// Configuration for the domain service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub max_changes_length: usize,
    pub default_page_size: u64,
    pub max_page_size: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_changes_length: 4096,
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

impl Service {
    pub fn new(
        repo: Arc<dyn OrderChangesRepository>,
        references: Arc<dyn ReferenceDirectory>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            repo,
            references,
            config,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    #[instrument(
        name = "order_changes.service.create_order_change",
        skip(self, new),
        fields(order_id = %new.order_id, user_id = %new.user_id)
    )]
    pub async fn create_order_change(
        &self,
        new: NewOrderChange,
    ) -> Result<OrderChange, DomainError> {
        info!("Creating order change");

        self.validate_reference("orderId", new.order_id)?;
        self.validate_reference("userId", new.user_id)?;
        self.validate_changes(&new.changes)?;

        let record = OrderChange {
            id: Uuid::now_v7(),
            order_id: new.order_id,
            user_id: new.user_id,
            change_date: new.change_date.unwrap_or_else(Utc::now),
            changes: new.changes,
        };

        let stored = self.repo.insert(record).await?;
        info!(id = %stored.id, "Created order change");
        Ok(stored)
    }

    #[instrument(
        name = "order_changes.service.get_order_change",
        skip(self),
        fields(order_change_id = %id)
    )]
    pub async fn get_order_change(&self, id: Uuid) -> Result<OrderChangeDetails, DomainError> {
        debug!("Getting order change by id");

        let record = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(id))?;

        let mut populated = self.populate(vec![record]).await?;
        populated.pop().ok_or_else(|| DomainError::not_found(id))
    }

    #[instrument(name = "order_changes.service.list_user_order_changes", skip(self))]
    pub async fn list_user_order_changes(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<OrderChangeDetails>, DomainError> {
        debug!("Listing order changes of user");

        let records = self.repo.find_by_user(user_id).await?;
        debug!(count = records.len(), "Found order changes of user");
        self.populate(records).await
    }

    #[instrument(
        name = "order_changes.service.list_order_changes_page",
        skip(self, page),
        fields(page = page.page, limit = page.limit)
    )]
    pub async fn list_order_changes_page(
        &self,
        page: PageRequest,
    ) -> Result<Vec<OrderChangeDetails>, DomainError> {
        debug!("Listing order changes page");

        let page = PageRequest {
            page: page.page.max(1),
            limit: page.limit.clamp(1, self.config.max_page_size.max(1)),
        };
        let Some(offset) = page.offset() else {
            debug!("Page lies past the addressable rows");
            return Ok(Vec::new());
        };
        let records = self.repo.list_page(offset, page.limit).await?;
        debug!(count = records.len(), "Listed order changes page");
        self.populate(records).await
    }

    #[instrument(
        name = "order_changes.service.update_order_change",
        skip(self, patch),
        fields(order_change_id = %id)
    )]
    pub async fn update_order_change(
        &self,
        id: Uuid,
        patch: OrderChangePatch,
    ) -> Result<OrderChange, DomainError> {
        info!("Updating order change");

        self.validate_patch(&patch)?;

        let updated = self
            .repo
            .update(id, patch)
            .await?
            .ok_or_else(|| DomainError::not_found(id))?;

        info!("Updated order change");
        Ok(updated)
    }

    #[instrument(
        name = "order_changes.service.delete_order_change",
        skip(self),
        fields(order_change_id = %id)
    )]
    pub async fn delete_order_change(&self, id: Uuid) -> Result<OrderChange, DomainError> {
        info!("Deleting order change");

        let deleted = self
            .repo
            .delete(id)
            .await?
            .ok_or_else(|| DomainError::not_found(id))?;

        info!("Deleted order change");
        Ok(deleted)
    }

    // --- populate ---

    /// Resolve order and user references of `records` with one lookup per
    /// referenced collection. Input order is preserved.
    async fn populate(
        &self,
        records: Vec<OrderChange>,
    ) -> Result<Vec<OrderChangeDetails>, DomainError> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let order_ids = distinct(records.iter().map(|r| r.order_id));
        let user_ids = distinct(records.iter().map(|r| r.user_id));

        let orders: HashMap<Uuid, OrderSummary> = self
            .references
            .orders_by_ids(&order_ids)
            .await?
            .into_iter()
            .map(|o| (o.id, o))
            .collect();
        let users: HashMap<Uuid, UserSummary> = self
            .references
            .users_by_ids(&user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        debug!(orders = orders.len(), users = users.len(), "Resolved references");

        Ok(records
            .into_iter()
            .map(|r| OrderChangeDetails {
                id: r.id,
                order: resolve(&orders, r.order_id),
                user: resolve(&users, r.user_id),
                change_date: r.change_date,
                changes: r.changes,
            })
            .collect())
    }

    // --- validation helpers ---

    fn validate_patch(&self, patch: &OrderChangePatch) -> Result<(), DomainError> {
        if let Some(order_id) = patch.order_id {
            self.validate_reference("orderId", order_id)?;
        }
        if let Some(user_id) = patch.user_id {
            self.validate_reference("userId", user_id)?;
        }
        if let Some(ref changes) = patch.changes {
            self.validate_changes(changes)?;
        }
        Ok(())
    }

    fn validate_reference(&self, field: &str, id: Uuid) -> Result<(), DomainError> {
        if id.is_nil() {
            return Err(DomainError::validation(field, "must not be the nil id"));
        }
        Ok(())
    }

    fn validate_changes(&self, changes: &str) -> Result<(), DomainError> {
        if changes.trim().is_empty() {
            return Err(DomainError::validation("changes", "must not be empty"));
        }
        let len = changes.chars().count();
        if len > self.config.max_changes_length {
            return Err(DomainError::validation(
                "changes",
                format!(
                    "too long: {len} characters (max: {})",
                    self.config.max_changes_length
                ),
            ));
        }
        Ok(())
    }
}

fn distinct(ids: impl Iterator<Item = Uuid>) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = ids.collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

fn resolve<T: Clone>(found: &HashMap<Uuid, T>, id: Uuid) -> Reference<T> {
    found
        .get(&id)
        .cloned()
        .map_or(Reference::Unresolved(id), Reference::Resolved)
}
