//! Ordered route registration.
//!
//! Routes are collected first and mounted in precedence order: at the first
//! segment where two paths differ in kind, a literal segment wins over a
//! `{param}` segment, which wins over a `{*wildcard}`. `/user/{user_id}` is
//! therefore always mounted ahead of `/{id}`, whatever order the module
//! declared them in. Duplicate (method, path) pairs are rejected.

use axum::{
    handler::Handler,
    http::Method,
    routing::{on, MethodFilter, MethodRouter},
    Router,
};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("duplicate route {method} {path}")]
    Duplicate { method: Method, path: String },
    #[error("invalid route path '{path}': {reason}")]
    InvalidPath { path: String, reason: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum SegmentKind {
    Literal,
    Param,
    Wildcard,
}

fn segment_kind(segment: &str) -> SegmentKind {
    if segment.starts_with("{*") {
        SegmentKind::Wildcard
    } else if segment.starts_with('{') {
        SegmentKind::Param
    } else {
        SegmentKind::Literal
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.trim_start_matches('/')
        .split('/')
        .filter(|s| !s.is_empty())
}

fn precedence(path: &str) -> Vec<SegmentKind> {
    segments(path).map(segment_kind).collect()
}

fn validate_path(path: &str) -> Result<(), RouteError> {
    let invalid = |reason| RouteError::InvalidPath {
        path: path.to_string(),
        reason,
    };

    if !path.starts_with('/') {
        return Err(invalid("must start with '/'"));
    }
    if path.len() > 1 && path.ends_with('/') {
        return Err(invalid("must not end with '/'"));
    }
    if path == "/" {
        return Ok(());
    }
    for segment in path[1..].split('/') {
        if segment.is_empty() {
            return Err(invalid("empty segment"));
        }
        if segment.starts_with(':') {
            return Err(invalid("use '{name}' for parameters"));
        }
        if segment.starts_with('{') {
            let name = segment
                .strip_suffix('}')
                .map(|s| s.trim_start_matches('{').trim_start_matches('*'))
                .ok_or_else(|| invalid("unterminated parameter"))?;
            if name.is_empty() {
                return Err(invalid("empty parameter name"));
            }
        }
    }
    Ok(())
}

struct RouteEntry<S> {
    method: Method,
    path: String,
    operation_id: &'static str,
    handler: MethodRouter<S>,
}

/// Collects routes and mounts them in precedence order.
pub struct RouteTable<S = ()> {
    entries: Vec<RouteEntry<S>>,
}

impl<S> Default for RouteTable<S> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<S> RouteTable<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    fn add(
        mut self,
        method: Method,
        path: &str,
        operation_id: &'static str,
        handler: MethodRouter<S>,
    ) -> Result<Self, RouteError> {
        validate_path(path)?;
        if self
            .entries
            .iter()
            .any(|e| e.method == method && e.path == path)
        {
            return Err(RouteError::Duplicate {
                method,
                path: path.to_string(),
            });
        }
        self.entries.push(RouteEntry {
            method,
            path: path.to_string(),
            operation_id,
            handler,
        });
        Ok(self)
    }

    pub fn get<H, T>(self, path: &str, operation_id: &'static str, h: H) -> Result<Self, RouteError>
    where
        H: Handler<T, S>,
        T: 'static,
    {
        let mr = on(MethodFilter::GET, h);
        self.add(Method::GET, path, operation_id, mr)
    }

    pub fn post<H, T>(self, path: &str, operation_id: &'static str, h: H) -> Result<Self, RouteError>
    where
        H: Handler<T, S>,
        T: 'static,
    {
        let mr = on(MethodFilter::POST, h);
        self.add(Method::POST, path, operation_id, mr)
    }

    pub fn put<H, T>(self, path: &str, operation_id: &'static str, h: H) -> Result<Self, RouteError>
    where
        H: Handler<T, S>,
        T: 'static,
    {
        let mr = on(MethodFilter::PUT, h);
        self.add(Method::PUT, path, operation_id, mr)
    }

    pub fn delete<H, T>(
        self,
        path: &str,
        operation_id: &'static str,
        h: H,
    ) -> Result<Self, RouteError>
    where
        H: Handler<T, S>,
        T: 'static,
    {
        let mr = on(MethodFilter::DELETE, h);
        self.add(Method::DELETE, path, operation_id, mr)
    }

    /// (method, path, operation id) in mount order.
    pub fn ordered(&self) -> Vec<(Method, String, &'static str)> {
        let mut refs: Vec<&RouteEntry<S>> = self.entries.iter().collect();
        refs.sort_by_key(|e| precedence(&e.path));
        refs.into_iter()
            .map(|e| (e.method.clone(), e.path.clone(), e.operation_id))
            .collect()
    }

    /// Mount every route on a fresh router, literal paths first.
    /// Methods sharing a path are merged into one `MethodRouter`.
    pub fn into_router(self) -> Router<S> {
        let mut entries = self.entries;
        entries.sort_by_key(|e| precedence(&e.path));

        let mut grouped: Vec<(String, MethodRouter<S>)> = Vec::new();
        for entry in entries {
            tracing::debug!(
                method = %entry.method,
                path = %entry.path,
                operation_id = entry.operation_id,
                "Mounting route"
            );
            match grouped.iter().position(|(p, _)| *p == entry.path) {
                Some(idx) => {
                    let (path, existing) = grouped.remove(idx);
                    grouped.insert(idx, (path, existing.merge(entry.handler)));
                }
                None => grouped.push((entry.path, entry.handler)),
            }
        }

        grouped
            .into_iter()
            .fold(Router::new(), |router, (path, mr)| router.route(&path, mr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::extract::Path;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn by_id(Path(id): Path<String>) -> String {
        format!("id:{id}")
    }

    async fn by_user(Path(user_id): Path<String>) -> String {
        format!("user:{user_id}")
    }

    async fn list() -> &'static str {
        "list"
    }

    async fn body_of(router: Router, method: Method, uri: &str) -> (StatusCode, String) {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let resp = router.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[test]
    fn literal_segments_precede_parameters() {
        let table = RouteTable::<()>::new()
            .get("/{id}", "get", by_id)
            .unwrap()
            .delete("/{id}", "delete", by_id)
            .unwrap()
            .get("/", "list", list)
            .unwrap()
            .get("/user/{user_id}", "by_user", by_user)
            .unwrap();

        let paths: Vec<String> = table.ordered().into_iter().map(|(_, p, _)| p).collect();
        assert_eq!(paths, vec!["/", "/user/{user_id}", "/{id}", "/{id}"]);
    }

    #[test]
    fn duplicate_method_and_path_is_rejected() {
        let err = RouteTable::<()>::new()
            .get("/{id}", "a", by_id)
            .unwrap()
            .get("/{id}", "b", by_id)
            .err()
            .unwrap();
        assert_eq!(
            err,
            RouteError::Duplicate {
                method: Method::GET,
                path: "/{id}".into()
            }
        );
    }

    #[test]
    fn malformed_paths_are_rejected() {
        for bad in ["user", "/user/", "/:id", "/{}", "/{id", "/a//b"] {
            assert!(
                matches!(
                    RouteTable::<()>::new().get(bad, "x", list),
                    Err(RouteError::InvalidPath { .. })
                ),
                "path {bad} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn user_route_is_not_shadowed_by_id_route() {
        // Declared in the "wrong" order on purpose.
        let router = RouteTable::<()>::new()
            .get("/{id}", "get", by_id)
            .unwrap()
            .get("/user/{user_id}", "by_user", by_user)
            .unwrap()
            .into_router();

        let (status, body) = body_of(router.clone(), Method::GET, "/user/u1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "user:u1");

        let (_, body) = body_of(router, Method::GET, "/user").await;
        assert_eq!(body, "id:user");
    }

    #[tokio::test]
    async fn methods_on_same_path_are_merged() {
        let router = RouteTable::<()>::new()
            .get("/{id}", "get", by_id)
            .unwrap()
            .delete("/{id}", "delete", by_id)
            .unwrap()
            .into_router();

        let (status, _) = body_of(router.clone(), Method::DELETE, "/7").await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = body_of(router, Method::PUT, "/7").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }
}
