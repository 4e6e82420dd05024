//! HTTP handlers for the Files service

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use bytes::Bytes;
use depot_core::problemdetails::{Problem, ProblemDetails};
use tracing::debug;
use utoipa::OpenApi;

use super::types::*;
use crate::services::FileName;

/// OpenAPI documentation for the Files API
#[derive(OpenApi)]
#[openapi(
    paths(list_files, download_file, upload_file, delete_file),
    components(schemas(DeleteFileResponse, ProblemDetails)),
    tags(
        (name = "Files", description = "File storage operations")
    )
)]
pub struct FilesApiDoc;

/// Configure file routes
pub fn configure_routes() -> Router<Arc<FilesAppState>> {
    Router::new().route("/files", get(list_files)).route(
        "/files/{name}",
        get(download_file).post(upload_file).delete(delete_file),
    )
}

/// List all stored files
#[utoipa::path(
    tag = "Files",
    get,
    path = "/files",
    responses(
        (status = 200, description = "Names of all stored files", body = Vec<String>),
        (status = 500, description = "Storage failure", body = ProblemDetails)
    )
)]
async fn list_files(
    State(state): State<Arc<FilesAppState>>,
) -> Result<impl IntoResponse, Problem> {
    let names = state.file_service.list_files().await?;
    Ok(Json(names))
}

/// Download a stored file
#[utoipa::path(
    tag = "Files",
    get,
    path = "/files/{name}",
    params(
        ("name" = String, Path, description = "Name of the stored file"),
    ),
    responses(
        (status = 200, description = "File content as an attachment", content_type = "application/octet-stream"),
        (status = 400, description = "Invalid file name", body = ProblemDetails),
        (status = 404, description = "File not found", body = ProblemDetails),
        (status = 500, description = "Storage failure", body = ProblemDetails)
    )
)]
async fn download_file(
    State(state): State<Arc<FilesAppState>>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, Problem> {
    debug!("GET /files/{}", name);

    let name = FileName::parse(&name)?;
    let content = state.file_service.get_file(&name).await?;

    Ok((
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                "application/octet-stream".to_string(),
            ),
            (header::CONTENT_LENGTH, content.len().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", name),
            ),
        ],
        content,
    ))
}

/// Upload a file
#[utoipa::path(
    tag = "Files",
    post,
    path = "/files/{name}",
    params(
        ("name" = String, Path, description = "Name to store the file under"),
    ),
    request_body(content = String, content_type = "application/octet-stream", description = "Raw file content"),
    responses(
        (status = 200, description = "File stored"),
        (status = 400, description = "Invalid file name", body = ProblemDetails),
        (status = 500, description = "Storage failure", body = ProblemDetails)
    )
)]
async fn upload_file(
    State(state): State<Arc<FilesAppState>>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse, Problem> {
    debug!("POST /files/{} ({} bytes)", name, body.len());

    let name = FileName::parse(&name)?;
    state.file_service.put_file(&name, body).await?;

    Ok(StatusCode::OK)
}

/// Delete a stored file
#[utoipa::path(
    tag = "Files",
    delete,
    path = "/files/{name}",
    params(
        ("name" = String, Path, description = "Name of the stored file"),
    ),
    responses(
        (status = 200, description = "File deleted", body = DeleteFileResponse),
        (status = 400, description = "Invalid file name", body = ProblemDetails),
        (status = 404, description = "File not found", body = ProblemDetails),
        (status = 500, description = "Storage failure", body = ProblemDetails)
    )
)]
async fn delete_file(
    State(state): State<Arc<FilesAppState>>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, Problem> {
    debug!("DELETE /files/{}", name);

    let name = FileName::parse(&name)?;
    state.file_service.delete_file(&name).await?;

    Ok(Json(DeleteFileResponse {
        message: format!("{} deleted", name),
    }))
}
