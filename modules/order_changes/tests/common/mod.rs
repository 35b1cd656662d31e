#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use http_body_util::BodyExt;
use modkit::RestfulModule;
use order_changes::{
    config::OrderChangesConfig,
    infra::storage::references::{order, user},
    OrderChanges,
};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

/// Fresh in-memory SQLite database with migrations applied.
///
/// A single pooled connection, since every new in-memory connection is a new database.
pub async fn create_test_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opts)
        .await
        .expect("Failed to connect to test database");
    OrderChanges::migrate(&db)
        .await
        .expect("Failed to run migrations");
    db
}

pub async fn seed_user(db: &DatabaseConnection, name: &str) -> Uuid {
    let id = Uuid::now_v7();
    user::ActiveModel {
        id: Set(id),
        name: Set(name.to_string()),
        email: Set(format!("{}@example.com", name.to_lowercase())),
    }
    .insert(db)
    .await
    .expect("seed user");
    id
}

pub async fn seed_order(db: &DatabaseConnection, user_id: Uuid, status: &str) -> Uuid {
    let id = Uuid::now_v7();
    order::ActiveModel {
        id: Set(id),
        user_id: Set(user_id),
        status: Set(status.to_string()),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("seed order");
    id
}

pub fn module_on(db: &DatabaseConnection) -> OrderChanges {
    OrderChanges::new(db.clone(), OrderChangesConfig::default())
}

pub fn router_on(db: &DatabaseConnection) -> Router {
    module_on(db).router().expect("Failed to build routes")
}

/// Send one request through the router; the body is parsed as JSON when possible.
pub async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}
