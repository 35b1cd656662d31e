use async_trait::async_trait;
use modkit::PageRequest;
use std::sync::Arc;
use uuid::Uuid;

use crate::contract::{
    client::OrderChangesApi,
    error::OrderChangesError,
    model::{NewOrderChange, OrderChange, OrderChangeDetails, OrderChangePatch},
};
use crate::domain::service::Service;

/// Local implementation of the OrderChangesApi trait that delegates to the domain service
pub struct OrderChangesLocalClient {
    service: Arc<Service>,
}

impl OrderChangesLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl OrderChangesApi for OrderChangesLocalClient {
    async fn create_order_change(
        &self,
        new: NewOrderChange,
    ) -> Result<OrderChange, OrderChangesError> {
        self.service
            .create_order_change(new)
            .await
            .map_err(Into::into)
    }

    async fn get_order_change(&self, id: Uuid) -> Result<OrderChangeDetails, OrderChangesError> {
        self.service.get_order_change(id).await.map_err(Into::into)
    }

    async fn list_user_order_changes(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<OrderChangeDetails>, OrderChangesError> {
        self.service
            .list_user_order_changes(user_id)
            .await
            .map_err(Into::into)
    }

    async fn list_order_changes_page(
        &self,
        page: PageRequest,
    ) -> Result<Vec<OrderChangeDetails>, OrderChangesError> {
        self.service
            .list_order_changes_page(page)
            .await
            .map_err(Into::into)
    }

    async fn update_order_change(
        &self,
        id: Uuid,
        patch: OrderChangePatch,
    ) -> Result<OrderChange, OrderChangesError> {
        self.service
            .update_order_change(id, patch)
            .await
            .map_err(Into::into)
    }

    async fn delete_order_change(&self, id: Uuid) -> Result<OrderChange, OrderChangesError> {
        self.service
            .delete_order_change(id)
            .await
            .map_err(Into::into)
    }
}
