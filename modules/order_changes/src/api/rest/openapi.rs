use modkit::api::problem::Problem;
use utoipa::OpenApi;

use crate::api::rest::dto::{
    CreateOrderChangeReq, OrderChangeDetailsDto, OrderChangeDto, OrderRefDto, OrderSummaryDto,
    UpdateOrderChangeReq, UserRefDto, UserSummaryDto,
};
use crate::api::rest::handlers;

/// OpenAPI description of the order-changes routes, relative to the module base path.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::create_order_change,
        handlers::list_order_changes,
        handlers::list_user_order_changes,
        handlers::get_order_change,
        handlers::update_order_change,
        handlers::delete_order_change,
    ),
    components(
        schemas(
            OrderChangeDto,
            OrderChangeDetailsDto,
            CreateOrderChangeReq,
            UpdateOrderChangeReq,
            OrderSummaryDto,
            UserSummaryDto,
            OrderRefDto,
            UserRefDto,
            Problem,
        )
    ),
    tags(
        (name = "order-changes", description = "Audit records of changes made to orders")
    )
)]
pub struct OrderChangesApiDoc;
