use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs as tokio_fs;

// Well-known paths relative to data_dir
pub const FILES_DIR_NAME: &str = "files";
pub const TMP_DIR_NAME: &str = "tmp";

#[derive(Error, Debug)]
pub enum ConfigServiceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {details}")]
    InvalidConfiguration { details: String },
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    /// Address the HTTP server binds to, e.g. "127.0.0.1:8000"
    pub address: String,

    /// Base directory holding all persisted state
    pub data_dir: PathBuf,
}

impl ServerConfig {
    /// Create a new configuration from the resolved CLI/environment values
    pub fn new(address: String, data_dir: Option<PathBuf>) -> anyhow::Result<Self> {
        // Determine data directory from env or use default
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => std::env::var("DEPOT_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".depot")),
        };

        // Create data directory if it doesn't exist
        std::fs::create_dir_all(&data_dir)?;

        Ok(ServerConfig { address, data_dir })
    }

    pub fn get_data_dir(&self) -> &Path {
        &self.data_dir
    }
}

/// Service that provides centralized access to configuration paths.
/// Handles path resolution and ensures consistency across the application.
pub struct ConfigService {
    config: Arc<ServerConfig>,
}

impl ConfigService {
    pub fn new(config: Arc<ServerConfig>) -> Self {
        Self { config }
    }

    /// Get the base data directory path
    pub fn data_dir(&self) -> PathBuf {
        self.config.get_data_dir().to_path_buf()
    }

    /// Get the stored files directory path (always under data_dir/files)
    pub fn files_dir(&self) -> PathBuf {
        self.data_dir().join(FILES_DIR_NAME)
    }

    /// Get the in-flight upload directory path (always under data_dir/tmp)
    ///
    /// Kept as a sibling of the files directory so half-written uploads are
    /// never visible in listings, while staying on the same filesystem so a
    /// rename into the files directory is atomic.
    pub fn tmp_dir(&self) -> PathBuf {
        self.data_dir().join(TMP_DIR_NAME)
    }

    pub fn get_server_config(&self) -> Arc<ServerConfig> {
        self.config.clone()
    }

    /// Ensure all required directories exist
    pub async fn ensure_directories(&self) -> Result<(), ConfigServiceError> {
        tokio_fs::create_dir_all(self.data_dir()).await?;
        tokio_fs::create_dir_all(self.files_dir()).await?;
        tokio_fs::create_dir_all(self.tmp_dir()).await?;

        Ok(())
    }
}
