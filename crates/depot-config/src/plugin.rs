//! Config Plugin implementation for the Depot plugin system
//!
//! Registers the `ConfigService` so downstream plugins can resolve storage
//! paths from one place.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use depot_core::plugin::{DepotPlugin, PluginError, ServiceRegistrationContext};

use crate::{ConfigService, ServerConfig};

/// Config Plugin for managing application configuration
pub struct ConfigPlugin {
    server_config: Arc<ServerConfig>,
}

impl ConfigPlugin {
    pub fn new(server_config: Arc<ServerConfig>) -> Self {
        Self { server_config }
    }
}

impl DepotPlugin for ConfigPlugin {
    fn name(&self) -> &'static str {
        "config"
    }

    fn register_services<'a>(
        &'a self,
        context: &'a ServiceRegistrationContext,
    ) -> Pin<Box<dyn Future<Output = Result<(), PluginError>> + Send + 'a>> {
        Box::pin(async move {
            let config_service = Arc::new(ConfigService::new(self.server_config.clone()));

            config_service.ensure_directories().await.map_err(|e| {
                PluginError::InitializationFailed(format!(
                    "failed to create data directories: {}",
                    e
                ))
            })?;

            context.register_service(config_service);

            tracing::debug!("Config plugin services registered successfully");
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_config_plugin_name() {
        let dir = tempfile::tempdir().unwrap();
        let server_config = Arc::new(
            ServerConfig::new("127.0.0.1:8000".to_string(), Some(dir.path().to_path_buf()))
                .unwrap(),
        );
        let config_plugin = ConfigPlugin::new(server_config);
        assert_eq!(config_plugin.name(), "config");
    }
}
