//! Request and response types for file HTTP handlers

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::services::FileService;

/// Application state for file handlers
pub struct FilesAppState {
    pub file_service: Arc<FileService>,
}

/// Response after deleting a stored file
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteFileResponse {
    /// Confirmation naming the deleted file
    #[schema(example = "report.csv deleted")]
    pub message: String,
}
