use axum::Router;

/// A module exposing REST endpoints. Pure wiring; must be sync.
///
/// The host nests [`RestfulModule::router`] under [`RestfulModule::base_path`]
/// and merges [`RestfulModule::openapi`] into the served document under the same prefix.
pub trait RestfulModule: Send + Sync {
    /// Stable module name, used in logs.
    fn name(&self) -> &'static str;

    /// Path prefix the module is mounted under, e.g. `/api/order-changes`.
    fn base_path(&self) -> &str;

    /// Routes relative to [`RestfulModule::base_path`].
    fn router(&self) -> anyhow::Result<Router>;

    /// OpenAPI description of the module's routes, relative to its base path.
    fn openapi(&self) -> utoipa::openapi::OpenApi;
}
