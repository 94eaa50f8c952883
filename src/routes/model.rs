//! Model routes
//!
//! Endpoints:
//! - GET /api/model-status - Report load state and device availability
//! - POST /api/load-model - Load the model ahead of the first OCR request

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::ocr::Device;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ModelStatusResponse {
    pub loaded: bool,
    pub cuda_available: bool,
    pub device: &'static str,
}

#[derive(Debug, Serialize)]
pub struct LoadModelResponse {
    pub success: bool,
    pub loaded: bool,
    pub message: &'static str,
}

/// Create the model router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/model-status", get(model_status))
        .route("/load-model", post(load_model))
}

/// GET /api/model-status
async fn model_status(State(state): State<AppState>) -> Json<ModelStatusResponse> {
    let model = state.model();
    let cuda_available = model.host().cuda_available().await;

    Json(ModelStatusResponse {
        loaded: model.is_loaded(),
        cuda_available,
        device: Device::from_cuda(cuda_available).as_str(),
    })
}

/// POST /api/load-model
///
/// Always answers 200; `success` reports whether the model is usable.
async fn load_model(State(state): State<AppState>) -> Json<LoadModelResponse> {
    let model = state.model();
    let success = model.ensure_loaded().await;

    Json(LoadModelResponse {
        success,
        loaded: model.is_loaded(),
        message: if success {
            "Model loaded successfully!"
        } else {
            "Failed to load model"
        },
    })
}
