//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use ledgerdesk_auth::{AuthorizationEngine, PermissionWorkflow};
use ledgerdesk_core::config::AppConfig;
use ledgerdesk_core::result::AppResult;
use ledgerdesk_entity::permission::ModuleCatalog;
use ledgerdesk_service::{EntityService, PermissionService, UserService};
use ledgerdesk_store::DataStore;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Flat-file data store
    pub store: Arc<DataStore>,
    /// Authorization engine over the configured module catalog
    pub engine: Arc<AuthorizationEngine>,
    /// User listing and owner bootstrap
    pub user_service: Arc<UserService>,
    /// Permission checks, invitations and overrides
    pub permission_service: Arc<PermissionService>,
    /// Entity and manager maintenance
    pub entity_service: Arc<EntityService>,
}

impl AppState {
    /// Opens the data store and wires every service.
    pub async fn new(config: AppConfig) -> AppResult<Self> {
        let store = Arc::new(DataStore::open(&config.store).await?);
        let engine = Arc::new(AuthorizationEngine::new(ModuleCatalog::from_config(
            &config.modules,
        )));
        let workflow = Arc::new(PermissionWorkflow::new(Arc::clone(&engine)));

        Ok(Self {
            user_service: Arc::new(UserService::new(Arc::clone(&store), Arc::clone(&engine))),
            permission_service: Arc::new(PermissionService::new(
                Arc::clone(&store),
                Arc::clone(&workflow),
            )),
            entity_service: Arc::new(EntityService::new(Arc::clone(&store), workflow)),
            config: Arc::new(config),
            store,
            engine,
        })
    }
}
