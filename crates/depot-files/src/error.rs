//! Error types for the Files service

use axum::http::StatusCode;
use depot_core::problemdetails::{self, Problem};
use thiserror::Error;

/// Errors that can occur in the Files service
#[derive(Error, Debug)]
pub enum FilesError {
    #[error("invalid file name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("file not found: {0}")]
    NotFound(String),

    #[error("storage error while {context}: {source}")]
    Storage {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl FilesError {
    pub(crate) fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        FilesError::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn storage(context: impl Into<String>, source: std::io::Error) -> Self {
        FilesError::Storage {
            context: context.into(),
            source,
        }
    }
}

impl From<FilesError> for Problem {
    fn from(error: FilesError) -> Self {
        match error {
            FilesError::InvalidName { name, reason } => {
                problemdetails::new(StatusCode::BAD_REQUEST)
                    .with_title("Invalid File Name")
                    .with_detail(format!("Invalid file name '{}': {}", name, reason))
            }

            FilesError::NotFound(name) => problemdetails::new(StatusCode::NOT_FOUND)
                .with_title("File Not Found")
                .with_detail(format!("File '{}' does not exist", name)),

            FilesError::Storage { context, source } => {
                problemdetails::new(StatusCode::INTERNAL_SERVER_ERROR)
                    .with_title("Storage Error")
                    .with_detail(format!("Storage failed while {}: {}", context, source))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_name_maps_to_bad_request() {
        let problem: Problem =
            FilesError::invalid_name("../etc", "name must be a single path component").into();
        assert_eq!(problem.status_code, StatusCode::BAD_REQUEST);
        assert!(problem.body["detail"].as_str().unwrap().contains("../etc"));
    }

    #[test]
    fn not_found_maps_to_404_and_names_the_file() {
        let problem: Problem = FilesError::NotFound("a.txt".to_string()).into();
        assert_eq!(problem.status_code, StatusCode::NOT_FOUND);
        assert!(problem.body["detail"].as_str().unwrap().contains("a.txt"));
    }

    #[test]
    fn storage_maps_to_internal_server_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let problem: Problem = FilesError::storage("publishing 'a.txt'", io).into();
        assert_eq!(problem.status_code, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
