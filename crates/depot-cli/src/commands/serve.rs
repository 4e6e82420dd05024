use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::routing::get;
use axum::Json;
use clap::Args;
use depot_config::{ConfigPlugin, ConfigService, ServerConfig};
use depot_core::plugin::PluginManager;
use depot_files::FilesPlugin;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

#[derive(Args)]
pub struct ServeCommand {
    /// Address to bind the server to
    #[arg(long, default_value = "127.0.0.1:8000", env = "DEPOT_ADDRESS")]
    pub address: String,

    /// Data directory for stored files and runtime state
    #[arg(long, env = "DEPOT_DATA_DIR")]
    pub data_dir: Option<PathBuf>,
}

impl ServeCommand {
    pub fn execute(self) -> anyhow::Result<()> {
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(self.run())
    }

    async fn run(self) -> anyhow::Result<()> {
        let config = Arc::new(ServerConfig::new(self.address.clone(), self.data_dir)?);

        info!(
            "Starting Depot server on {} (data dir: {})",
            config.address,
            config.get_data_dir().display()
        );

        let mut plugin_manager = PluginManager::new();

        debug!("Registering ConfigPlugin");
        plugin_manager.register_plugin(Box::new(ConfigPlugin::new(config.clone())));

        debug!("Registering FilesPlugin");
        plugin_manager.register_plugin(Box::new(FilesPlugin::new()));

        debug!("Initializing plugins");
        plugin_manager
            .initialize_plugins()
            .await
            .map_err(|e| anyhow::anyhow!("Plugin initialization failed: {}", e))?;
        debug!("All plugins initialized successfully");

        // Drop any uploads left staged by a previous unclean shutdown
        let config_service = plugin_manager
            .service_context()
            .require_service::<ConfigService>();
        clean_staging_dir(&config_service.tmp_dir()).await;

        let openapi = plugin_manager
            .get_unified_openapi()
            .map_err(|e| anyhow::anyhow!("Failed to build OpenAPI schema: {}", e))?;

        debug!("Building application with plugin routes");
        let app = plugin_manager
            .build_application()
            .map_err(|e| anyhow::anyhow!("Failed to build application: {}", e))?
            .route(
                "/openapi.json",
                get(move || {
                    let openapi = openapi.clone();
                    async move { Json(openapi) }
                }),
            );

        let listener = TcpListener::bind(&config.address).await?;
        info!("Depot server listening on {}", config.address);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Depot server exited");
        Ok(())
    }
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to listen for ctrl-c signal");
    info!("Received Ctrl+C, initiating graceful shutdown...");
}

/// Remove leftover staged uploads. They are invisible to clients either way;
/// this only reclaims the disk space.
async fn clean_staging_dir(tmp_dir: &Path) {
    let mut entries = match tokio::fs::read_dir(tmp_dir).await {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Failed to scan staging dir {}: {}", tmp_dir.display(), e);
            return;
        }
    };

    let mut removed = 0usize;
    while let Ok(Some(entry)) = entries.next_entry().await {
        if tokio::fs::remove_file(entry.path()).await.is_ok() {
            removed += 1;
        }
    }

    if removed > 0 {
        debug!("Removed {} stale staged upload(s)", removed);
    }
}
