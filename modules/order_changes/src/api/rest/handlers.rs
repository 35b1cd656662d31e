use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        OriginalUri, Path, Query,
    },
    http::{StatusCode, Uri},
    response::Json,
    Extension,
};
use modkit::api::problem::{Problem, ProblemResponse};
use modkit::{PagePolicy, PageQuery};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::api::rest::dto::{
    CreateOrderChangeReq, OrderChangeDetailsDto, OrderChangeDto, UpdateOrderChangeReq,
};
use crate::api::rest::error::{invalid_body, invalid_id, map_domain_error, Operation};
use crate::domain::service::Service;

fn parse_id(raw: &str, field: &str, op: Operation, uri: &Uri) -> Result<Uuid, ProblemResponse> {
    Uuid::parse_str(raw).map_err(|_| {
        warn!(%field, value = %raw, "Malformed id in path");
        invalid_id(field, raw, op, uri.path())
    })
}

/// Create a new order change
#[utoipa::path(
    post,
    path = "/",
    tag = "order-changes",
    operation_id = "order_changes.create",
    request_body = CreateOrderChangeReq,
    responses(
        (status = 201, description = "The order change was successfully created", body = OrderChangeDto),
        (status = 400, description = "Missing or malformed fields", body = Problem),
        (status = 503, description = "Storage unavailable", body = Problem),
        (status = 500, description = "Internal error", body = Problem)
    )
)]
pub async fn create_order_change(
    Extension(svc): Extension<Arc<Service>>,
    OriginalUri(uri): OriginalUri,
    body: Result<Json<CreateOrderChangeReq>, JsonRejection>,
) -> Result<(StatusCode, Json<OrderChangeDto>), ProblemResponse> {
    const OP: Operation = Operation::Create;

    let Json(req) = body.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Rejected order change body");
        invalid_body(&rejection, OP, uri.path())
    })?;
    info!(order_id = %req.order_id, user_id = %req.user_id, "Creating order change");

    match svc.create_order_change(req.into()).await {
        Ok(created) => Ok((StatusCode::CREATED, Json(OrderChangeDto::from(created)))),
        Err(e) => {
            error!("Failed to create order change: {}", e);
            Err(map_domain_error(&e, OP, uri.path()))
        }
    }
}

/// Get all order changes with pagination
#[utoipa::path(
    get,
    path = "/",
    tag = "order-changes",
    operation_id = "order_changes.list",
    params(PageQuery),
    responses(
        (status = 200, description = "A page of order changes, references populated", body = [OrderChangeDetailsDto]),
        (status = 503, description = "Storage unavailable", body = Problem),
        (status = 500, description = "Internal error", body = Problem)
    )
)]
pub async fn list_order_changes(
    Extension(svc): Extension<Arc<Service>>,
    OriginalUri(uri): OriginalUri,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<Vec<OrderChangeDetailsDto>>, ProblemResponse> {
    const OP: Operation = Operation::List;

    let query = query.map(|Query(q)| q).unwrap_or_default();
    let policy = PagePolicy::new(svc.config().default_page_size, svc.config().max_page_size);
    let page = policy.resolve(&query);
    info!(page = page.page, limit = page.limit, "Listing order changes");

    match svc.list_order_changes_page(page).await {
        Ok(items) => Ok(Json(items.into_iter().map(Into::into).collect())),
        Err(e) => {
            error!("Failed to list order changes: {}", e);
            Err(map_domain_error(&e, OP, uri.path()))
        }
    }
}

/// Get all order changes made by one user
#[utoipa::path(
    get,
    path = "/user/{userId}",
    tag = "order-changes",
    operation_id = "order_changes.list_by_user",
    params(("userId" = String, Path, description = "User id (UUID)")),
    responses(
        (status = 200, description = "Order changes of the user, references populated", body = [OrderChangeDetailsDto]),
        (status = 400, description = "Malformed user id", body = Problem),
        (status = 503, description = "Storage unavailable", body = Problem),
        (status = 500, description = "Internal error", body = Problem)
    )
)]
pub async fn list_user_order_changes(
    Extension(svc): Extension<Arc<Service>>,
    Path(raw_user_id): Path<String>,
    OriginalUri(uri): OriginalUri,
) -> Result<Json<Vec<OrderChangeDetailsDto>>, ProblemResponse> {
    const OP: Operation = Operation::ListByUser;

    let user_id = parse_id(&raw_user_id, "userId", OP, &uri)?;
    info!(%user_id, "Listing order changes of user");

    match svc.list_user_order_changes(user_id).await {
        Ok(items) => Ok(Json(items.into_iter().map(Into::into).collect())),
        Err(e) => {
            error!("Failed to list order changes of user {}: {}", user_id, e);
            Err(map_domain_error(&e, OP, uri.path()))
        }
    }
}

/// Get an order change by id
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "order-changes",
    operation_id = "order_changes.get",
    params(("id" = String, Path, description = "Order change id (UUID)")),
    responses(
        (status = 200, description = "The order change, references populated", body = OrderChangeDetailsDto),
        (status = 400, description = "Malformed id", body = Problem),
        (status = 404, description = "No order change with this id", body = Problem),
        (status = 503, description = "Storage unavailable", body = Problem),
        (status = 500, description = "Internal error", body = Problem)
    )
)]
pub async fn get_order_change(
    Extension(svc): Extension<Arc<Service>>,
    Path(raw_id): Path<String>,
    OriginalUri(uri): OriginalUri,
) -> Result<Json<OrderChangeDetailsDto>, ProblemResponse> {
    const OP: Operation = Operation::Get;

    let id = parse_id(&raw_id, "id", OP, &uri)?;
    info!(%id, "Getting order change");

    match svc.get_order_change(id).await {
        Ok(details) => Ok(Json(details.into())),
        Err(e) => {
            error!("Failed to get order change {}: {}", id, e);
            Err(map_domain_error(&e, OP, uri.path()))
        }
    }
}

/// Update an order change with partial data
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "order-changes",
    operation_id = "order_changes.update",
    params(("id" = String, Path, description = "Order change id (UUID)")),
    request_body = UpdateOrderChangeReq,
    responses(
        (status = 200, description = "The updated order change", body = OrderChangeDto),
        (status = 400, description = "Malformed id or body", body = Problem),
        (status = 404, description = "No order change with this id", body = Problem),
        (status = 503, description = "Storage unavailable", body = Problem),
        (status = 500, description = "Internal error", body = Problem)
    )
)]
pub async fn update_order_change(
    Extension(svc): Extension<Arc<Service>>,
    Path(raw_id): Path<String>,
    OriginalUri(uri): OriginalUri,
    body: Result<Json<UpdateOrderChangeReq>, JsonRejection>,
) -> Result<Json<OrderChangeDto>, ProblemResponse> {
    const OP: Operation = Operation::Update;

    let id = parse_id(&raw_id, "id", OP, &uri)?;
    let Json(req) = body.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Rejected order change patch");
        invalid_body(&rejection, OP, uri.path())
    })?;
    info!(%id, "Updating order change");

    match svc.update_order_change(id, req.into()).await {
        Ok(updated) => Ok(Json(OrderChangeDto::from(updated))),
        Err(e) => {
            error!("Failed to update order change {}: {}", id, e);
            Err(map_domain_error(&e, OP, uri.path()))
        }
    }
}

/// Delete an order change by id
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "order-changes",
    operation_id = "order_changes.delete",
    params(("id" = String, Path, description = "Order change id (UUID)")),
    responses(
        (status = 200, description = "The deleted order change", body = OrderChangeDto),
        (status = 400, description = "Malformed id", body = Problem),
        (status = 404, description = "No order change with this id", body = Problem),
        (status = 503, description = "Storage unavailable", body = Problem),
        (status = 500, description = "Internal error", body = Problem)
    )
)]
pub async fn delete_order_change(
    Extension(svc): Extension<Arc<Service>>,
    Path(raw_id): Path<String>,
    OriginalUri(uri): OriginalUri,
) -> Result<Json<OrderChangeDto>, ProblemResponse> {
    const OP: Operation = Operation::Delete;

    let id = parse_id(&raw_id, "id", OP, &uri)?;
    info!(%id, "Deleting order change");

    match svc.delete_order_change(id).await {
        Ok(deleted) => Ok(Json(OrderChangeDto::from(deleted))),
        Err(e) => {
            error!("Failed to delete order change {}: {}", id, e);
            Err(map_domain_error(&e, OP, uri.path()))
        }
    }
}
