//! OCR Module
//!
//! Runs uploaded images and PDFs through a DeepSeek-OCR model host.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use deepseek_ocr_server::ocr::{ModelHandle, OcrPipeline, RemoteModelHost, UploadRequest};
//!
//! let host = Arc::new(RemoteModelHost::new("http://localhost:8000", "deepseek-ai/DeepSeek-OCR"));
//! let pipeline = OcrPipeline::new(Arc::new(ModelHandle::new(host)), store);
//!
//! // The model is loaded on the first request
//! let result = pipeline.handle(request).await?;
//! println!("{}", result.text);
//! ```

mod handle;
mod host;
mod pipeline;
mod prompt;
mod types;
mod validator;

pub use handle::{LoadState, ModelHandle};
pub use host::{LoadProfile, ModelHost, RemoteModelHost};
pub use pipeline::OcrPipeline;
pub use prompt::{select_prompt, DETAILED_PROMPT, FREE_PROMPT, GROUNDING_PROMPT, MARKDOWN_PROMPT};
pub use types::{
    Device, InferenceOptions, InferenceRequest, ModelError, OcrMode, OcrResult, PipelineError, UploadRequest,
    UploadedFile, DEFAULT_MODE,
};
pub use validator::{is_allowed, ALLOWED_EXTENSIONS};
