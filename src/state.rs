//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::ocr::{ModelHandle, ModelHost, OcrPipeline};
use crate::upload::UploadStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    pipeline: OcrPipeline,
}

impl AppState {
    /// Create a new application state
    ///
    /// Opens the upload/output roots. The model itself is not loaded here;
    /// that happens on the first OCR request or an explicit load call.
    pub async fn new(config: Config, host: Arc<dyn ModelHost>) -> std::io::Result<Self> {
        let store = UploadStore::open(&config.storage.upload_dir, &config.storage.output_dir).await?;
        let model = Arc::new(ModelHandle::new(host));

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pipeline: OcrPipeline::new(model, store),
            }),
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the OCR pipeline
    pub fn pipeline(&self) -> &OcrPipeline {
        &self.inner.pipeline
    }

    /// Get the model handle
    pub fn model(&self) -> &Arc<ModelHandle> {
        self.inner.pipeline.model()
    }

    /// Get the upload store
    pub fn store(&self) -> &UploadStore {
        self.inner.pipeline.store()
    }
}
