use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use modkit::api::problem::{Problem, ProblemResponse};

use crate::domain::error::DomainError;

/// The operation a handler was performing; names the failure in the error body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    List,
    ListByUser,
    Get,
    Update,
    Delete,
}

impl Operation {
    pub fn failure_message(self) -> &'static str {
        match self {
            Operation::Create => "Error creating order change",
            Operation::List => "Error getting order changes",
            Operation::ListByUser => "Error getting order changes by user ID",
            Operation::Get => "Error getting order change",
            Operation::Update => "Error updating order change",
            Operation::Delete => "Error deleting order change",
        }
    }
}

fn from_parts(
    status: StatusCode,
    code: &str,
    op: Operation,
    detail: impl Into<String>,
    instance: &str,
) -> ProblemResponse {
    ProblemResponse(
        Problem::new(status, op.failure_message(), detail)
            .with_code(code)
            .with_instance(instance)
            .with_current_span(),
    )
}

/// Map a domain error to the HTTP error body, choosing the status by kind.
pub fn map_domain_error(e: &DomainError, op: Operation, instance: &str) -> ProblemResponse {
    match e {
        DomainError::NotFound { id } => from_parts(
            StatusCode::NOT_FOUND,
            "ORDER_CHANGES_NOT_FOUND",
            op,
            format!("Order change with id {id} was not found"),
            instance,
        ),
        DomainError::Validation { field, message } => from_parts(
            StatusCode::BAD_REQUEST,
            "ORDER_CHANGES_VALIDATION",
            op,
            format!("{field}: {message}"),
            instance,
        ),
        DomainError::Unavailable { .. } => {
            tracing::warn!(error = ?e, "Storage unavailable");
            from_parts(
                StatusCode::SERVICE_UNAVAILABLE,
                "ORDER_CHANGES_UNAVAILABLE",
                op,
                "Storage is temporarily unavailable",
                instance,
            )
        }
        DomainError::Persistence { .. } => {
            // Log the internal error details but don't expose them to the client
            tracing::error!(error = ?e, "Database error occurred");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "ORDER_CHANGES_INTERNAL",
                op,
                "An internal database error occurred",
                instance,
            )
        }
    }
}

/// A path segment that is not a valid id.
pub fn invalid_id(field: &str, raw: &str, op: Operation, instance: &str) -> ProblemResponse {
    map_domain_error(
        &DomainError::validation(field, format!("'{raw}' is not a valid id")),
        op,
        instance,
    )
}

/// A request body that could not be read as the expected JSON shape.
pub fn invalid_body(rejection: &JsonRejection, op: Operation, instance: &str) -> ProblemResponse {
    map_domain_error(
        &DomainError::validation("body", rejection.body_text()),
        op,
        instance,
    )
}
