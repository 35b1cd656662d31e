use std::sync::Arc;

use axum::{Extension, Router};
use modkit::{RouteError, RouteTable};

use crate::api::rest::handlers;
use crate::domain::service::Service;

/// Build the module router. Paths are relative to the module base path.
///
/// `/user/{userId}` is matched ahead of `/{id}` regardless of the order below.
pub fn router(service: Arc<Service>) -> Result<Router, RouteError> {
    let table = RouteTable::<()>::new()
        .post("/", "order_changes.create", handlers::create_order_change)?
        .get("/", "order_changes.list", handlers::list_order_changes)?
        .get("/{id}", "order_changes.get", handlers::get_order_change)?
        .put("/{id}", "order_changes.update", handlers::update_order_change)?
        .delete("/{id}", "order_changes.delete", handlers::delete_order_change)?
        .get(
            "/user/{userId}",
            "order_changes.list_by_user",
            handlers::list_user_order_changes,
        )?;

    for (method, path, operation_id) in table.ordered() {
        tracing::debug!(%method, %path, operation_id, "Order changes route");
    }

    Ok(table.into_router().layer(Extension(service)))
}
