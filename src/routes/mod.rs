//! Route modules for the DeepSeek OCR server

pub mod files;
pub mod health;
pub mod model;
pub mod ocr;

use axum::{extract::DefaultBodyLimit, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Routes mounted under `/api`
fn api_router() -> Router<AppState> {
    health::router()
        .merge(model::router())
        .merge(ocr::router())
}

/// Build the full application router
pub fn app(state: AppState) -> Router {
    let body_limit = state.config().server.max_upload_bytes;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(health::router())
        .nest("/api", api_router())
        .merge(files::router())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
