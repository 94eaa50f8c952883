//! Model Hosts
//!
//! Defines the model host trait and the HTTP-backed implementation that drives
//! a DeepSeek-OCR serving sidecar.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::types::{Device, InferenceOptions, InferenceRequest, ModelError};

/// Model host trait
///
/// Wraps a pretrained OCR model and its tokenizer. Implementations are shared
/// across requests, so `infer` may be called concurrently.
#[async_trait]
pub trait ModelHost: Send + Sync {
    /// Human-readable backend name, for logs
    fn name(&self) -> &str;

    /// Check whether an accelerated device is present
    async fn cuda_available(&self) -> bool;

    /// Acquire and initialize the model, returning the device it landed on
    async fn load(&self) -> Result<Device, ModelError>;

    /// Run OCR and return the primary text result.
    ///
    /// Auxiliary artifacts are written under `request.output_path`.
    async fn infer(&self, request: &InferenceRequest) -> Result<String, ModelError>;
}

/// Load settings sent to the sidecar, chosen from the detected device
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LoadProfile {
    pub model: String,
    pub device: Device,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attn_implementation: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dtype: Option<&'static str>,
    pub trust_remote_code: bool,
    pub use_safetensors: bool,
}

impl LoadProfile {
    pub fn for_device(model: &str, device: Device) -> Self {
        // CPU path keeps the library's default attention and precision
        let (attn_implementation, dtype) = match device {
            Device::Cuda => (Some("flash_attention_2"), Some("bfloat16")),
            Device::Cpu => (None, None),
        };

        Self {
            model: model.to_string(),
            device,
            attn_implementation,
            dtype,
            trust_remote_code: true,
            use_safetensors: true,
        }
    }
}

#[derive(Debug, Serialize)]
struct InferBody<'a> {
    model: &'a str,
    prompt: &'a str,
    image_file: String,
    output_path: String,
    #[serde(flatten)]
    options: InferenceOptions,
}

#[derive(Debug, Deserialize)]
struct HealthBody {
    #[serde(default)]
    cuda_available: bool,
}

#[derive(Debug, Deserialize)]
struct LoadBody {
    device: Device,
}

#[derive(Debug, Deserialize)]
struct InferResponse {
    text: String,
}

/// DeepSeek-OCR served by an HTTP sidecar
pub struct RemoteModelHost {
    client: reqwest::Client,
    /// Sidecar base URL
    base_url: String,
    /// Model name (e.g., "deepseek-ai/DeepSeek-OCR")
    model: String,
}

impl RemoteModelHost {
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, ModelError>
    where
        B: Serialize + ?Sized,
        R: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.post(&url).json(body).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Api { status, body });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl ModelHost for RemoteModelHost {
    fn name(&self) -> &str {
        &self.model
    }

    async fn cuda_available(&self) -> bool {
        let url = format!("{}/health", self.base_url);

        let response = match self.client.get(&url).send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                tracing::debug!(status = %response.status(), "Model backend health check failed");
                return false;
            }
            Err(e) => {
                tracing::debug!(error = %e, "Model backend unreachable");
                return false;
            }
        };

        response
            .json::<HealthBody>()
            .await
            .map(|health| health.cuda_available)
            .unwrap_or(false)
    }

    async fn load(&self) -> Result<Device, ModelError> {
        let device = Device::from_cuda(self.cuda_available().await);
        tracing::info!(model = %self.model, device = device.as_str(), "Loading OCR model");

        let profile = LoadProfile::for_device(&self.model, device);
        let loaded: LoadBody = self.post_json("/load", &profile).await?;

        Ok(loaded.device)
    }

    async fn infer(&self, request: &InferenceRequest) -> Result<String, ModelError> {
        let body = InferBody {
            model: &self.model,
            prompt: &request.prompt,
            image_file: request.image_file.display().to_string(),
            output_path: request.output_path.display().to_string(),
            options: request.options,
        };

        let result: InferResponse = self.post_json("/infer", &body).await?;
        Ok(result.text)
    }
}
