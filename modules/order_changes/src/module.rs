use std::sync::Arc;

use modkit::RestfulModule;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};
use utoipa::OpenApi;

use crate::api::rest::{openapi::OrderChangesApiDoc, routes};
use crate::config::OrderChangesConfig;
use crate::contract::client::OrderChangesApi;
use crate::domain::ports::ReferenceDirectory;
use crate::domain::repo::OrderChangesRepository;
use crate::domain::service::{Service, ServiceConfig};
use crate::gateways::local::OrderChangesLocalClient;
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::{SeaOrmOrderChangesRepository, SeaOrmReferenceDirectory};

/// The order_changes module: owns the domain service and exposes it over REST
/// and as an in-process client.
#[derive(Clone)]
pub struct OrderChanges {
    config: OrderChangesConfig,
    service: Arc<Service>,
}

impl OrderChanges {
    /// Wire the SeaORM adapters on `db` to the domain service.
    pub fn new(db: DatabaseConnection, config: OrderChangesConfig) -> Self {
        let repo = SeaOrmOrderChangesRepository::new(db.clone());
        let references = SeaOrmReferenceDirectory::new(db);
        Self::with_ports(Arc::new(repo), Arc::new(references), config)
    }

    /// Build the module on arbitrary port implementations.
    pub fn with_ports(
        repo: Arc<dyn OrderChangesRepository>,
        references: Arc<dyn ReferenceDirectory>,
        config: OrderChangesConfig,
    ) -> Self {
        debug!(
            "Loaded order_changes config: default_page_size={}, max_page_size={}, max_changes_length={}",
            config.default_page_size, config.max_page_size, config.max_changes_length
        );
        let service_config = ServiceConfig {
            max_changes_length: config.max_changes_length,
            default_page_size: config.default_page_size,
            max_page_size: config.max_page_size,
        };
        let service = Arc::new(Service::new(repo, references, service_config));
        Self { config, service }
    }

    /// Apply the module's schema migrations.
    pub async fn migrate(db: &DatabaseConnection) -> anyhow::Result<()> {
        info!("Running order_changes database migrations");
        Migrator::up(db, None).await?;
        info!("Order changes database migrations completed successfully");
        Ok(())
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    /// In-process client for other modules.
    pub fn client(&self) -> Arc<dyn OrderChangesApi> {
        Arc::new(OrderChangesLocalClient::new(self.service.clone()))
    }
}

impl RestfulModule for OrderChanges {
    fn name(&self) -> &'static str {
        "order_changes"
    }

    fn base_path(&self) -> &str {
        &self.config.base_path
    }

    fn router(&self) -> anyhow::Result<axum::Router> {
        info!("Registering order_changes REST routes");
        let router = routes::router(self.service.clone())?;
        info!("Order changes REST routes registered successfully");
        Ok(router)
    }

    fn openapi(&self) -> utoipa::openapi::OpenApi {
        OrderChangesApiDoc::openapi()
    }
}
