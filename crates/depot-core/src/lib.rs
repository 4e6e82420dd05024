//! Core utilities and types shared across all Depot crates

pub mod plugin;
pub mod problemdetails;

pub use problemdetails::ProblemDetails;

// Re-export external dependencies
pub use anyhow;
pub use serde;
pub use serde_json;
pub use thiserror;
pub use tokio;
pub use tracing;
