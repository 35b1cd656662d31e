use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::contract::model::{
    NewOrderChange, OrderChange, OrderChangeDetails, OrderChangePatch, OrderSummary, Reference,
    UserSummary,
};

/// REST DTO for an order change with plain references.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(title = "OrderChange")]
pub struct OrderChangeDto {
    pub id: Uuid,
    pub order_id: Uuid,
    pub user_id: Uuid,
    #[schema(format = "date-time")]
    pub change_date: DateTime<Utc>,
    pub changes: String,
}

/// REST DTO for creating an order change.
///
/// A client-supplied `id` (or `_id`) is accepted and dropped.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateOrderChangeReq {
    #[serde(default, alias = "_id", skip_serializing)]
    #[schema(value_type = Option<Object>)]
    pub id: Option<serde_json::Value>,
    pub order_id: Uuid,
    pub user_id: Uuid,
    /// Defaults to the creation instant.
    #[serde(default)]
    #[schema(format = "date-time")]
    pub change_date: Option<DateTime<Utc>>,
    pub changes: String,
}

/// REST DTO for a partial update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateOrderChangeReq {
    /// Ids are immutable; a supplied value is ignored.
    #[serde(default, alias = "_id", skip_serializing)]
    #[schema(value_type = Option<Object>)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub order_id: Option<Uuid>,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    #[schema(format = "date-time")]
    pub change_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub changes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummaryDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: String,
    #[schema(format = "date-time")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummaryDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// The referenced order, or its bare id when it does not exist.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum OrderRefDto {
    Resolved(OrderSummaryDto),
    Unresolved(Uuid),
}

/// The referenced user, or its bare id when it does not exist.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum UserRefDto {
    Resolved(UserSummaryDto),
    Unresolved(Uuid),
}

/// REST DTO for an order change with `orderId` and `userId` populated.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(title = "OrderChangeDetails")]
pub struct OrderChangeDetailsDto {
    pub id: Uuid,
    pub order_id: OrderRefDto,
    pub user_id: UserRefDto,
    #[schema(format = "date-time")]
    pub change_date: DateTime<Utc>,
    pub changes: String,
}

// Conversion implementations between REST DTOs and contract models

impl From<OrderChange> for OrderChangeDto {
    fn from(r: OrderChange) -> Self {
        Self {
            id: r.id,
            order_id: r.order_id,
            user_id: r.user_id,
            change_date: r.change_date,
            changes: r.changes,
        }
    }
}

impl From<CreateOrderChangeReq> for NewOrderChange {
    fn from(req: CreateOrderChangeReq) -> Self {
        Self {
            order_id: req.order_id,
            user_id: req.user_id,
            change_date: req.change_date,
            changes: req.changes,
        }
    }
}

impl From<UpdateOrderChangeReq> for OrderChangePatch {
    fn from(req: UpdateOrderChangeReq) -> Self {
        Self {
            order_id: req.order_id,
            user_id: req.user_id,
            change_date: req.change_date,
            changes: req.changes,
        }
    }
}

impl From<OrderSummary> for OrderSummaryDto {
    fn from(o: OrderSummary) -> Self {
        Self {
            id: o.id,
            user_id: o.user_id,
            status: o.status,
            created_at: o.created_at,
        }
    }
}

impl From<UserSummary> for UserSummaryDto {
    fn from(u: UserSummary) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
        }
    }
}

impl From<Reference<OrderSummary>> for OrderRefDto {
    fn from(r: Reference<OrderSummary>) -> Self {
        match r {
            Reference::Resolved(o) => Self::Resolved(o.into()),
            Reference::Unresolved(id) => Self::Unresolved(id),
        }
    }
}

impl From<Reference<UserSummary>> for UserRefDto {
    fn from(r: Reference<UserSummary>) -> Self {
        match r {
            Reference::Resolved(u) => Self::Resolved(u.into()),
            Reference::Unresolved(id) => Self::Unresolved(id),
        }
    }
}

impl From<OrderChangeDetails> for OrderChangeDetailsDto {
    fn from(d: OrderChangeDetails) -> Self {
        Self {
            id: d.id,
            order_id: d.order.into(),
            user_id: d.user.into(),
            change_date: d.change_date,
            changes: d.changes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_req_drops_client_id_and_reads_camel_case() {
        let order_id = Uuid::now_v7();
        let user_id = Uuid::now_v7();
        let req: CreateOrderChangeReq = serde_json::from_value(json!({
            "_id": "64b7f0c2e1a4b2a9c8d7e6f5",
            "orderId": order_id,
            "userId": user_id,
            "changes": "qty 1->2"
        }))
        .unwrap();

        let new: NewOrderChange = req.into();
        assert_eq!(new.order_id, order_id);
        assert_eq!(new.user_id, user_id);
        assert!(new.change_date.is_none());
    }

    #[test]
    fn create_req_requires_fields_and_rejects_unknown_ones() {
        let missing = serde_json::from_value::<CreateOrderChangeReq>(json!({
            "orderId": Uuid::now_v7(),
            "changes": "x"
        }));
        assert!(missing.is_err());

        let unknown = serde_json::from_value::<CreateOrderChangeReq>(json!({
            "orderId": Uuid::now_v7(),
            "userId": Uuid::now_v7(),
            "changes": "x",
            "total": 10
        }));
        assert!(unknown.is_err());
    }

    #[test]
    fn references_serialize_as_object_or_bare_id() {
        let user_id = Uuid::now_v7();
        let order_id = Uuid::now_v7();
        let dto = OrderChangeDetailsDto {
            id: Uuid::now_v7(),
            order_id: OrderRefDto::Unresolved(order_id),
            user_id: UserRefDto::Resolved(UserSummaryDto {
                id: user_id,
                name: "Ada".into(),
                email: "ada@example.com".into(),
            }),
            change_date: Utc::now(),
            changes: "x".into(),
        };

        let v = serde_json::to_value(&dto).unwrap();
        assert_eq!(v["orderId"], json!(order_id));
        assert_eq!(v["userId"]["name"], "Ada");
        assert!(v.get("changeDate").is_some());
    }
}
