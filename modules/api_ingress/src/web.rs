use axum::{
    extract::OriginalUri,
    http::Method,
    response::{Html, Json},
};
use modkit::api::problem::{not_found, ProblemResponse};
use serde_json::{json, Value};

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// JSON 404 for anything no module or host route matched.
pub async fn route_not_found(method: Method, OriginalUri(uri): OriginalUri) -> ProblemResponse {
    tracing::debug!(%method, path = %uri.path(), "Route not found");
    let problem = not_found("Route not found", format!("No route for {method} {}", uri.path())).0;
    ProblemResponse(problem.with_instance(uri.path()))
}

pub async fn serve_docs() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8"/>
  <title>Commerce API Docs</title>
  <script src="https://unpkg.com/@stoplight/elements@latest/web-components.min.js"></script>
  <link rel="stylesheet" href="https://unpkg.com/@stoplight/elements@latest/styles.min.css">
</head>
<body>
  <elements-api apiDescriptionUrl="/openapi.json" router="hash" layout="sidebar"></elements-api>
</body>
</html>"#,
    )
}
