//! OCR route
//!
//! POST /api/ocr - multipart form with a `file` part and an optional `mode`.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;

use crate::error::Result;
use crate::ocr::{UploadRequest, UploadedFile};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct OcrResponse {
    pub success: bool,
    /// Text returned by the model
    pub result: String,
    /// Unique name of the stored upload
    pub filename: String,
    pub mode: String,
}

/// Create the OCR router
pub fn router() -> Router<AppState> {
    Router::new().route("/ocr", post(perform_ocr))
}

/// POST /api/ocr
///
/// A body that is not `multipart/form-data` carries no file part, so it goes
/// through the pipeline as an empty request and gets `No file uploaded`.
async fn perform_ocr(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<OcrResponse>> {
    let request = match multipart {
        Ok(multipart) => read_upload(multipart).await?,
        Err(rejection) => {
            tracing::debug!(reason = %rejection.body_text(), "Request is not multipart");
            UploadRequest::default()
        }
    };

    let result = state.pipeline().handle(request).await?;

    Ok(Json(OcrResponse {
        success: true,
        result: result.text,
        filename: result.filename,
        mode: result.mode,
    }))
}

/// Decode the multipart form into an [`UploadRequest`].
///
/// A `file` part without a filename is a plain form value, not a file, and is
/// ignored. When a part repeats, the first one wins.
async fn read_upload(mut multipart: Multipart) -> Result<UploadRequest> {
    let mut request = UploadRequest::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                let Some(filename) = field.file_name().map(str::to_string) else {
                    continue;
                };
                if request.file.is_some() {
                    continue;
                }
                let bytes = field.bytes().await?;
                tracing::debug!(filename = %filename, size = bytes.len(), "Received upload");
                request.file = Some(UploadedFile {
                    filename,
                    bytes: bytes.to_vec(),
                });
            }
            "mode" => {
                if request.mode.is_none() {
                    request.mode = Some(field.text().await?);
                }
            }
            _ => {}
        }
    }

    Ok(request)
}
