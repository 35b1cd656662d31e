use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error body returned by every REST module.
///
/// `message` names the operation that failed ("Error creating order change"),
/// `error` carries the specific reason.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(title = "Problem", description = "Error body for failed API requests")]
pub struct Problem {
    /// The HTTP status code for this occurrence of the problem.
    pub status: u16,
    /// Machine-readable error code, e.g. `ORDER_CHANGES_NOT_FOUND`.
    pub code: String,
    /// Short summary of the failed operation.
    pub message: String,
    /// Explanation specific to this occurrence.
    pub error: String,
    /// Request path the problem occurred on.
    pub instance: String,
    /// Tracing span id, when the request ran inside one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

impl Problem {
    pub fn new(status: StatusCode, message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            status: status.as_u16(),
            code: String::new(),
            message: message.into(),
            error: error.into(),
            instance: String::new(),
            trace_id: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_instance(mut self, uri: impl Into<String>) -> Self {
        self.instance = uri.into();
        self
    }

    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    /// Attach the id of the current tracing span, if any.
    pub fn with_current_span(self) -> Self {
        match tracing::Span::current().id() {
            Some(id) => self.with_trace_id(id.into_u64().to_string()),
            None => self,
        }
    }
}

/// Axum response wrapper that renders `Problem` with its status code.
#[derive(Debug, Clone)]
pub struct ProblemResponse(pub Problem);

impl From<Problem> for ProblemResponse {
    fn from(p: Problem) -> Self {
        Self(p)
    }
}

impl IntoResponse for ProblemResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, axum::Json(self.0)).into_response()
    }
}

pub fn not_found(message: impl Into<String>, error: impl Into<String>) -> ProblemResponse {
    Problem::new(StatusCode::NOT_FOUND, message, error)
        .with_code("NOT_FOUND")
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn problem_into_response_sets_status_and_body() {
        let p = Problem::new(
            StatusCode::BAD_REQUEST,
            "Error creating order change",
            "changes: must not be empty",
        )
        .with_code("ORDER_CHANGES_VALIDATION")
        .with_instance("/api/order-changes");

        let resp = ProblemResponse(p).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "Error creating order change");
        assert_eq!(body["error"], "changes: must not be empty");
        assert_eq!(body["code"], "ORDER_CHANGES_VALIDATION");
        assert_eq!(body["instance"], "/api/order-changes");
        assert!(body.get("traceId").is_none());
    }

    #[test]
    fn problem_builder_pattern() {
        let p = Problem::new(StatusCode::NOT_FOUND, "Error getting order change", "missing")
            .with_code("NOT_FOUND")
            .with_instance("/x/1")
            .with_trace_id("42");

        assert_eq!(p.status, 404);
        assert_eq!(p.code, "NOT_FOUND");
        assert_eq!(p.instance, "/x/1");
        assert_eq!(p.trace_id.as_deref(), Some("42"));
    }

    #[test]
    fn not_found_helper() {
        let p = not_found("Route not found", "No route for GET /x").0;
        assert_eq!(p.status, 404);
        assert_eq!(p.code, "NOT_FOUND");
    }
}
