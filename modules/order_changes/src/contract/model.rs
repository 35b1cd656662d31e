use chrono::{DateTime, Utc};
use uuid::Uuid;

/// An audit record describing one change made to an order.
///
/// Pure domain type, no serde. REST DTOs live in `api::rest::dto`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderChange {
    pub id: Uuid,
    pub order_id: Uuid,
    pub user_id: Uuid,
    pub change_date: DateTime<Utc>,
    pub changes: String,
}

/// Data for creating a new order change. `change_date` defaults to now.
#[derive(Debug, Clone)]
pub struct NewOrderChange {
    pub order_id: Uuid,
    pub user_id: Uuid,
    pub change_date: Option<DateTime<Utc>>,
    pub changes: String,
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct OrderChangePatch {
    pub order_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub change_date: Option<DateTime<Utc>>,
    pub changes: Option<String>,
}

impl OrderChangePatch {
    pub fn is_empty(&self) -> bool {
        self.order_id.is_none()
            && self.user_id.is_none()
            && self.change_date.is_none()
            && self.changes.is_none()
    }
}

/// Read-only view of an order, used to populate `OrderChangeDetails`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSummary {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Read-only view of a user, used to populate `OrderChangeDetails`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// A foreign key after populate: the referenced entity, or the bare id
/// when nothing with that id exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference<T> {
    Resolved(T),
    Unresolved(Uuid),
}

/// An order change with its order and user references populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderChangeDetails {
    pub id: Uuid,
    pub order: Reference<OrderSummary>,
    pub user: Reference<UserSummary>,
    pub change_date: DateTime<Utc>,
    pub changes: String,
}
