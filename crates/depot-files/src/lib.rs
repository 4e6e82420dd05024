//! depot-files: flat file storage service for Depot
//!
//! Stores each uploaded file as a single regular file in one flat directory
//! and exposes list/upload/download/delete over HTTP. Writes are staged in a
//! sibling temp directory and renamed into place, so concurrent readers only
//! ever observe complete file contents.

pub mod error;
pub mod handlers;
pub mod plugin;
pub mod services;

pub use error::FilesError;
pub use plugin::FilesPlugin;
pub use services::{FileName, FileService};
