use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use crate::state::AppState;
use crate::utils::errors::{bad_request_error, not_found_error, AppError};
use crate::utils::validation::file_extension;

pub fn create_upload_router() -> Router<AppState> {
    Router::new().route("/:filename", get(serve_upload))
}

/// Servir una foto almacenada. El nombre se valida contra subida de
/// directorios antes de tocar el sistema de archivos.
async fn serve_upload(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let path = state
        .storage
        .path_for(&filename)
        .ok_or_else(|| bad_request_error(&format!("Invalid filename '{}'", filename)))?;

    let data = match tokio::fs::read(&path).await {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(not_found_error("Upload", &filename));
        }
        Err(e) => return Err(e.into()),
    };

    let content_type = match file_extension(&filename).as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    };

    Ok(([(header::CONTENT_TYPE, content_type)], data).into_response())
}
