//! HTTP host: mounts every [`RestfulModule`] under its base path, wraps the
//! result in the shared middleware stack and serves it with graceful shutdown.

use std::collections::HashMap;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{
    extract::Request,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router, ServiceExt,
};
use modkit::RestfulModule;
use tokio::net::TcpListener;
use tower::{Layer, ServiceBuilder};
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    normalize_path::{NormalizePath, NormalizePathLayer},
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};
use utoipa::openapi::{Info, OpenApi, Paths};

mod config;
mod error;
pub mod request_id;
mod web;

pub use config::ApiIngressConfig;
pub use error::IngressError;

const API_TITLE: &str = "Commerce API";

/// The served application: the router behind trailing-slash trimming, so
/// `/api/order-changes/` reaches the same route as `/api/order-changes`.
pub type App = NormalizePath<Router>;

pub struct ApiIngress {
    config: ApiIngressConfig,
    modules: Vec<Arc<dyn RestfulModule>>,
}

impl ApiIngress {
    pub fn new(config: ApiIngressConfig, modules: Vec<Arc<dyn RestfulModule>>) -> Self {
        Self { config, modules }
    }

    pub fn config(&self) -> &ApiIngressConfig {
        &self.config
    }

    /// `bind_addr` when configured, otherwise `host:port` from the server section.
    pub fn bind_addr(&self, host: &str, port: u16) -> Result<SocketAddr, IngressError> {
        let addr = match &self.config.bind_addr {
            Some(addr) => addr.clone(),
            None => format!("{host}:{port}"),
        };
        addr.parse()
            .map_err(|source| IngressError::InvalidBindAddr { addr, source })
    }

    /// Assemble the full application router.
    pub fn build_router(&self) -> Result<Router> {
        let mut router = Router::new().route("/health", get(web::health_check));
        let mut mounted: HashMap<String, &'static str> = HashMap::new();

        for module in &self.modules {
            let base = normalize_base_path(module.name(), module.base_path())?;
            if let Some(first) = mounted.insert(base.clone(), module.name()) {
                return Err(IngressError::DuplicateBasePath {
                    first: first.to_string(),
                    second: module.name().to_string(),
                    path: base,
                }
                .into());
            }

            let module_router = module.router()?;
            router = if base.is_empty() {
                router.merge(module_router)
            } else {
                router.nest(&base, module_router)
            };
            tracing::info!(module = module.name(), base_path = %display_base(&base), "Mounted REST module");
        }

        if self.config.enable_docs {
            let spec = Arc::new(self.build_openapi()?);
            router = router
                .route(
                    "/openapi.json",
                    get(move || {
                        let spec = spec.clone();
                        async move {
                            (
                                [(header::CACHE_CONTROL, "no-store")],
                                Json(spec.as_ref().clone()),
                            )
                                .into_response()
                        }
                    }),
                )
                .route("/docs", get(web::serve_docs));
            tracing::info!("API documentation available at /docs");
        }

        router = router.fallback(web::route_not_found);

        // Innermost first
        router = router.layer(RequestBodyLimitLayer::new(self.config.body_limit_bytes));
        if self.config.cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }
        let x_request_id = request_id::header();
        router = router.layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(
                    x_request_id.clone(),
                    request_id::MakeReqId,
                ))
                .layer(PropagateRequestIdLayer::new(x_request_id))
                .layer(request_id::create_trace_layer())
                .layer(axum::middleware::from_fn(
                    request_id::push_req_id_to_extensions,
                ))
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    Duration::from_secs(self.config.request_timeout_secs),
                )),
        );

        Ok(router)
    }

    /// [`ApiIngress::build_router`] with trailing slashes trimmed before routing.
    pub fn build_app(&self) -> Result<App> {
        let router = self.build_router()?;
        Ok(NormalizePathLayer::trim_trailing_slash().layer(router))
    }

    /// One document covering every module, paths prefixed with the module's base path.
    pub fn build_openapi(&self) -> Result<OpenApi> {
        let mut doc = OpenApi::new(Info::new(API_TITLE, env!("CARGO_PKG_VERSION")), Paths::new());

        for module in &self.modules {
            let base = normalize_base_path(module.name(), module.base_path())?;
            let mut api = module.openapi();
            let paths = std::mem::take(&mut api.paths.paths);
            for (path, item) in paths {
                api.paths.paths.insert(join_path(&base, &path), item);
            }
            doc.merge(api);
        }

        Ok(doc)
    }

    /// Serve until `shutdown` resolves, then drain in-flight requests.
    pub async fn serve<F>(&self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.build_app()?;
        let addr = listener.local_addr()?;
        tracing::info!("HTTP server listening on {}", addr);

        axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// `""` means mount at the root. Trailing slashes are dropped.
fn normalize_base_path(module: &str, path: &str) -> Result<String, IngressError> {
    let invalid = |reason| IngressError::InvalidBasePath {
        module: module.to_string(),
        path: path.to_string(),
        reason,
    };

    if path.is_empty() || path == "/" {
        return Ok(String::new());
    }
    if !path.starts_with('/') {
        return Err(invalid("must start with '/'"));
    }
    if path.contains(['{', '}', '*']) {
        return Err(invalid("must not contain parameters"));
    }
    Ok(path.trim_end_matches('/').to_string())
}

fn join_path(base: &str, path: &str) -> String {
    match (base, path) {
        ("", "") => "/".to_string(),
        ("", p) => p.to_string(),
        (b, "/") | (b, "") => b.to_string(),
        (b, p) => format!("{b}{p}"),
    }
}

fn display_base(base: &str) -> &str {
    if base.is_empty() {
        "/"
    } else {
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_paths_are_normalized() {
        assert_eq!(normalize_base_path("m", "").unwrap(), "");
        assert_eq!(normalize_base_path("m", "/").unwrap(), "");
        assert_eq!(
            normalize_base_path("m", "/api/order-changes/").unwrap(),
            "/api/order-changes"
        );
        assert!(normalize_base_path("m", "api").is_err());
        assert!(normalize_base_path("m", "/api/{id}").is_err());
    }

    #[test]
    fn joined_paths() {
        assert_eq!(join_path("/api/order-changes", "/"), "/api/order-changes");
        assert_eq!(
            join_path("/api/order-changes", "/{id}"),
            "/api/order-changes/{id}"
        );
        assert_eq!(join_path("", "/health"), "/health");
        assert_eq!(join_path("", ""), "/");
    }

    #[test]
    fn bind_addr_prefers_explicit_setting() {
        let ingress = ApiIngress::new(ApiIngressConfig::default(), Vec::new());
        assert_eq!(
            ingress.bind_addr("127.0.0.1", 4000).unwrap(),
            "127.0.0.1:4000".parse::<SocketAddr>().unwrap()
        );

        let ingress = ApiIngress::new(
            ApiIngressConfig {
                bind_addr: Some("0.0.0.0:8080".into()),
                ..Default::default()
            },
            Vec::new(),
        );
        assert_eq!(ingress.bind_addr("127.0.0.1", 4000).unwrap().port(), 8080);

        let ingress = ApiIngress::new(
            ApiIngressConfig {
                bind_addr: Some("nowhere".into()),
                ..Default::default()
            },
            Vec::new(),
        );
        assert!(matches!(
            ingress.bind_addr("127.0.0.1", 4000),
            Err(IngressError::InvalidBindAddr { .. })
        ));
    }
}
