//! OCR Types
//!
//! Request, result and error types shared by the OCR pipeline and its model host.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Mode used when the request does not name one
pub const DEFAULT_MODE: &str = "markdown";

/// OCR mode requested by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OcrMode {
    /// Convert the document to markdown with grounding
    Markdown,
    /// Free-form OCR
    Free,
    /// Detailed image description
    Detailed,
    /// Generic grounding OCR, used for any other mode string
    Grounding,
}

impl OcrMode {
    /// Parse a mode string. Total: unknown strings map to `Grounding`.
    pub fn parse(mode: &str) -> Self {
        match mode {
            "markdown" => Self::Markdown,
            "free" => Self::Free,
            "detailed" => Self::Detailed,
            _ => Self::Grounding,
        }
    }
}

/// Compute device the model runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    Cuda,
    Cpu,
}

impl Device {
    pub fn from_cuda(cuda_available: bool) -> Self {
        if cuda_available {
            Self::Cuda
        } else {
            Self::Cpu
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cuda => "cuda",
            Self::Cpu => "cpu",
        }
    }
}

/// Tuning parameters passed on every inference call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InferenceOptions {
    pub base_size: u32,
    pub image_size: u32,
    pub crop_mode: bool,
    pub save_results: bool,
    pub test_compress: bool,
}

impl InferenceOptions {
    /// The fixed parameter set the output format depends on
    pub const FIXED: Self = Self {
        base_size: 1024,
        image_size: 640,
        crop_mode: true,
        save_results: true,
        test_compress: true,
    };
}

impl Default for InferenceOptions {
    fn default() -> Self {
        Self::FIXED
    }
}

/// A single inference call against the model host
#[derive(Debug, Clone)]
pub struct InferenceRequest {
    pub prompt: String,
    /// Stored upload to run OCR on
    pub image_file: PathBuf,
    /// Directory the model writes its result artifacts into
    pub output_path: PathBuf,
    pub options: InferenceOptions,
}

/// File part of an upload
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Incoming OCR request, decoded from the multipart form
#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    /// `None` when the form carried no file part
    pub file: Option<UploadedFile>,
    pub mode: Option<String>,
}

/// Successful OCR output
#[derive(Debug, Clone, Serialize)]
pub struct OcrResult {
    /// Text returned by the model
    pub text: String,
    /// Unique name the upload was stored under
    pub filename: String,
    /// Mode string as requested
    pub mode: String,
}

/// Model host errors
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Model backend unreachable: {0}")]
    Transport(String),

    #[error("Model backend returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Invalid model backend response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for ModelError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ModelError::InvalidResponse(err.to_string())
        } else {
            ModelError::Transport(err.to_string())
        }
    }
}

/// Terminal failures of an OCR request
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("No file uploaded")]
    NoFile,

    #[error("No file selected")]
    EmptyFilename,

    #[error("Invalid file type. Allowed: PNG, JPG, JPEG, PDF")]
    InvalidType,

    #[error("Failed to load OCR model. Please check server logs.")]
    ModelUnavailable,

    #[error("OCR processing failed: {0}")]
    InferenceFailed(String),

    #[error("OCR processing failed: {0}")]
    Storage(String),
}

impl PipelineError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            Self::NoFile | Self::EmptyFilename | Self::InvalidType => StatusCode::BAD_REQUEST,
            Self::ModelUnavailable | Self::InferenceFailed(_) | Self::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
