//! HTTP handlers for the Files service

pub mod handler;
pub mod types;

pub use handler::{configure_routes, FilesApiDoc};
pub use types::*;
