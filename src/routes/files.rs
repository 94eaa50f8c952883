//! File serving routes
//!
//! Serves stored uploads and model output artifacts from local storage.

use std::path::{Component, Path as FsPath, PathBuf};

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
    routing::get,
    Router,
};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Create the files router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/outputs/*path", get(serve_output))
        .route("/uploads/*path", get(serve_upload))
}

/// GET /outputs/*path
async fn serve_output(State(state): State<AppState>, Path(path): Path<String>) -> Result<Response> {
    serve_file(state.store().output_dir(), &path).await
}

/// GET /uploads/*path
async fn serve_upload(State(state): State<AppState>, Path(path): Path<String>) -> Result<Response> {
    serve_file(state.store().upload_dir(), &path).await
}

/// Serve a file below `root`
async fn serve_file(root: &FsPath, path: &str) -> Result<Response> {
    let full_path = safe_join(root, path).ok_or_else(|| AppError::NotFound(path.to_string()))?;

    let metadata = match tokio::fs::metadata(&full_path).await {
        Ok(metadata) if metadata.is_file() => metadata,
        Ok(_) => return Err(AppError::NotFound(path.to_string())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound(path.to_string()))
        }
        Err(e) => return Err(e.into()),
    };

    let bytes = tokio::fs::read(&full_path).await?;

    let content_type = mime_guess::from_path(&full_path).first_or_octet_stream();

    let filename = path.rsplit('/').next().unwrap_or(path);

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type.as_ref())
        .header(header::CONTENT_LENGTH, metadata.len())
        .header(header::CONTENT_DISPOSITION, content_disposition(filename))
        .body(Body::from(bytes))
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// `inline` disposition with an RFC 5987 `filename*`, so model-written names
/// with quotes or non-ASCII characters still make a valid header value
fn content_disposition(filename: &str) -> String {
    format!("inline; filename*=UTF-8''{}", urlencoding::encode(filename))
}

/// Join a request path onto `root`, refusing anything that would leave it
fn safe_join(root: &FsPath, path: &str) -> Option<PathBuf> {
    let mut joined = root.to_path_buf();
    let mut depth = 0;

    for component in FsPath::new(path.trim_start_matches('/')).components() {
        match component {
            Component::Normal(part) => {
                joined.push(part);
                depth += 1;
            }
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    (depth > 0).then_some(joined)
}
