//! Files Plugin implementation for the Depot plugin system

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use depot_config::ConfigService;
use depot_core::plugin::{
    DepotPlugin, PluginContext, PluginError, PluginRoutes, ServiceRegistrationContext,
};
use tracing::debug;
use utoipa::openapi::OpenApi;
use utoipa::OpenApi as OpenApiTrait;

use crate::handlers::{configure_routes, FilesApiDoc, FilesAppState};
use crate::services::FileService;

/// Files Plugin for flat file storage operations
pub struct FilesPlugin;

impl FilesPlugin {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FilesPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl DepotPlugin for FilesPlugin {
    fn name(&self) -> &'static str {
        "files"
    }

    fn register_services<'a>(
        &'a self,
        context: &'a ServiceRegistrationContext,
    ) -> Pin<Box<dyn Future<Output = Result<(), PluginError>> + Send + 'a>> {
        Box::pin(async move {
            let config_service = context.require_service::<ConfigService>();

            let file_service = Arc::new(FileService::new(config_service));
            context.register_service(file_service);

            debug!("Files plugin services registered successfully");
            Ok(())
        })
    }

    fn configure_routes(&self, context: &PluginContext) -> Option<PluginRoutes> {
        let file_service = context.require_service::<FileService>();

        let app_state = Arc::new(FilesAppState { file_service });
        let routes = configure_routes().with_state(app_state);

        Some(PluginRoutes { router: routes })
    }

    fn openapi_schema(&self) -> Option<OpenApi> {
        Some(<FilesApiDoc as OpenApiTrait>::openapi())
    }
}
