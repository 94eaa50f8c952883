//! DeepSeek OCR Server Library
//!
//! HTTP front-end that accepts an uploaded image or PDF, runs it through a
//! DeepSeek-OCR model host and returns the extracted text. The server binary
//! is in main.rs.
//!
//! # Modules
//!
//! - `ocr`: validation, prompt selection, the lazy model gate and the pipeline
//! - `upload`: upload naming and local storage
//! - `routes`: axum routers for the HTTP surface

pub mod config;
pub mod error;
pub mod ocr;
pub mod routes;
pub mod state;
pub mod upload;
