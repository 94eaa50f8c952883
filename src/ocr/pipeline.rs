//! OCR Pipeline
//!
//! Orchestrates validation, the lazy model load, upload storage, prompt
//! selection and inference for a single OCR request.

use std::sync::Arc;

use crate::upload::{new_request_id, UploadStore};

use super::handle::ModelHandle;
use super::prompt::select_prompt;
use super::types::{InferenceOptions, InferenceRequest, OcrResult, PipelineError, UploadRequest, DEFAULT_MODE};
use super::validator::is_allowed;

/// OCR request pipeline
#[derive(Clone)]
pub struct OcrPipeline {
    model: Arc<ModelHandle>,
    store: UploadStore,
}

impl OcrPipeline {
    pub fn new(model: Arc<ModelHandle>, store: UploadStore) -> Self {
        Self { model, store }
    }

    pub fn model(&self) -> &Arc<ModelHandle> {
        &self.model
    }

    pub fn store(&self) -> &UploadStore {
        &self.store
    }

    /// Run one OCR request end to end.
    ///
    /// Validation failures return before anything touches disk or the model.
    /// The upload is persisted before inference, so it survives a failed run.
    pub async fn handle(&self, request: UploadRequest) -> Result<OcrResult, PipelineError> {
        let file = request.file.ok_or(PipelineError::NoFile)?;

        if file.filename.is_empty() {
            return Err(PipelineError::EmptyFilename);
        }

        if !is_allowed(&file.filename) {
            return Err(PipelineError::InvalidType);
        }

        if !self.model.ensure_loaded().await {
            return Err(PipelineError::ModelUnavailable);
        }

        let request_id = new_request_id();
        let stored = self
            .store
            .save(&request_id, &file.filename, &file.bytes)
            .await
            .map_err(|e| {
                tracing::error!(request_id = %request_id, error = %e, "Failed to store upload");
                PipelineError::Storage(e.to_string())
            })?;

        let mode = request.mode.unwrap_or_else(|| DEFAULT_MODE.to_string());
        let prompt = select_prompt(&mode);

        let output_path = self
            .store
            .create_output_dir(&request_id)
            .await
            .map_err(|e| {
                tracing::error!(request_id = %request_id, error = %e, "Failed to create output directory");
                PipelineError::Storage(e.to_string())
            })?;

        tracing::info!(
            request_id = %request_id,
            file = %stored.path.display(),
            mode = %mode,
            prompt = %prompt,
            "Processing file"
        );

        let inference = InferenceRequest {
            prompt: prompt.to_string(),
            image_file: stored.path.clone(),
            output_path,
            options: InferenceOptions::FIXED,
        };

        let text = self.model.host().infer(&inference).await.map_err(|e| {
            tracing::error!(request_id = %request_id, error = ?e, "Error during OCR: {}", e);
            PipelineError::InferenceFailed(e.to_string())
        })?;

        tracing::info!(
            request_id = %request_id,
            chars = text.len(),
            "OCR complete"
        );

        Ok(OcrResult {
            text,
            filename: stored.unique_filename,
            mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::host::ModelHost;
    use crate::ocr::prompt::{FREE_PROMPT, MARKDOWN_PROMPT};
    use crate::ocr::types::{Device, ModelError, UploadedFile};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    /// Mock host for testing
    struct MockHost {
        load_ok: bool,
        infer_error: Option<String>,
        loads: AtomicUsize,
        calls: Mutex<Vec<InferenceRequest>>,
    }

    impl MockHost {
        fn new(load_ok: bool, infer_error: Option<&str>) -> Self {
            Self {
                load_ok,
                infer_error: infer_error.map(str::to_string),
                loads: AtomicUsize::new(0),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ModelHost for MockHost {
        fn name(&self) -> &str {
            "mock"
        }

        async fn cuda_available(&self) -> bool {
            false
        }

        async fn load(&self) -> Result<Device, ModelError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            if self.load_ok {
                Ok(Device::Cpu)
            } else {
                Err(ModelError::Transport("connection refused".to_string()))
            }
        }

        async fn infer(&self, request: &InferenceRequest) -> Result<String, ModelError> {
            self.calls.lock().push(request.clone());
            match &self.infer_error {
                Some(body) => Err(ModelError::Api {
                    status: 500,
                    body: body.clone(),
                }),
                None => Ok("# Invoice\n\nTotal: 42".to_string()),
            }
        }
    }

    async fn pipeline_with(host: Arc<MockHost>) -> (OcrPipeline, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = UploadStore::open(temp_dir.path().join("uploads"), temp_dir.path().join("outputs"))
            .await
            .unwrap();
        let pipeline = OcrPipeline::new(Arc::new(ModelHandle::new(host)), store);
        (pipeline, temp_dir)
    }

    fn upload(filename: &str, mode: Option<&str>) -> UploadRequest {
        UploadRequest {
            file: Some(UploadedFile {
                filename: filename.to_string(),
                bytes: b"not really an image".to_vec(),
            }),
            mode: mode.map(str::to_string),
        }
    }

    fn count_entries(dir: &std::path::Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[tokio::test]
    async fn test_missing_and_empty_file() {
        let host = Arc::new(MockHost::new(true, None));
        let (pipeline, _temp) = pipeline_with(host.clone()).await;

        let result = pipeline.handle(UploadRequest::default()).await;
        assert!(matches!(result, Err(PipelineError::NoFile)));

        let result = pipeline.handle(upload("", None)).await;
        assert!(matches!(result, Err(PipelineError::EmptyFilename)));

        assert_eq!(host.loads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invalid_type_touches_nothing() {
        let host = Arc::new(MockHost::new(true, None));
        let (pipeline, _temp) = pipeline_with(host.clone()).await;

        let result = pipeline.handle(upload("doc.txt", None)).await;

        assert!(matches!(result, Err(PipelineError::InvalidType)));
        assert_eq!(host.loads.load(Ordering::SeqCst), 0);
        assert!(host.calls.lock().is_empty());
        assert_eq!(count_entries(pipeline.store().upload_dir()), 0);
    }

    #[tokio::test]
    async fn test_load_failure_skips_inference() {
        let host = Arc::new(MockHost::new(false, None));
        let (pipeline, _temp) = pipeline_with(host.clone()).await;

        let result = pipeline.handle(upload("scan.pdf", None)).await;

        assert!(matches!(result, Err(PipelineError::ModelUnavailable)));
        assert!(host.calls.lock().is_empty());
        assert_eq!(count_entries(pipeline.store().upload_dir()), 0);
    }

    #[tokio::test]
    async fn test_default_mode_is_markdown() {
        let host = Arc::new(MockHost::new(true, None));
        let (pipeline, _temp) = pipeline_with(host.clone()).await;

        let result = pipeline.handle(upload("photo.PNG", None)).await.unwrap();

        assert_eq!(result.mode, "markdown");
        assert_eq!(result.text, "# Invoice\n\nTotal: 42");
        assert!(result.filename.ends_with("_photo.PNG"));

        let calls = host.calls.lock();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].prompt, MARKDOWN_PROMPT);
        assert_eq!(calls[0].options, InferenceOptions::FIXED);
        assert!(calls[0].image_file.exists());
        assert!(calls[0].output_path.is_dir());
    }

    #[tokio::test]
    async fn test_output_dir_matches_request_id() {
        let host = Arc::new(MockHost::new(true, None));
        let (pipeline, _temp) = pipeline_with(host.clone()).await;

        let result = pipeline.handle(upload("page.jpg", Some("free"))).await.unwrap();
        assert_eq!(result.mode, "free");

        let calls = host.calls.lock();
        assert_eq!(calls[0].prompt, FREE_PROMPT);

        let dir_name = calls[0].output_path.file_name().unwrap().to_str().unwrap();
        assert_eq!(result.filename, format!("{}_page.jpg", dir_name));
    }

    #[tokio::test]
    async fn test_inference_failure_keeps_upload() {
        let host = Arc::new(MockHost::new(true, Some("cannot identify image file")));
        let (pipeline, _temp) = pipeline_with(host.clone()).await;

        let result = pipeline.handle(upload("broken.png", Some("detailed"))).await;

        match result {
            Err(PipelineError::InferenceFailed(message)) => {
                assert!(message.contains("cannot identify image file"), "{message}");
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(count_entries(pipeline.store().upload_dir()), 1);
    }

    #[tokio::test]
    async fn test_model_loaded_once_across_requests() {
        let host = Arc::new(MockHost::new(true, None));
        let (pipeline, _temp) = pipeline_with(host.clone()).await;

        pipeline.handle(upload("a.png", None)).await.unwrap();
        pipeline.handle(upload("b.png", None)).await.unwrap();

        assert_eq!(host.loads.load(Ordering::SeqCst), 1);
        assert_eq!(host.calls.lock().len(), 2);
    }
}
