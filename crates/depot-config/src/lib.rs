mod service;
pub mod plugin;

pub use plugin::ConfigPlugin;
pub use service::{
    ConfigService, ConfigServiceError, ServerConfig, FILES_DIR_NAME, TMP_DIR_NAME,
};
