//! File storage service implementation

mod file_service;
mod name;

pub use file_service::FileService;
pub use name::FileName;
