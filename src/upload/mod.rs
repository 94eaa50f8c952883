//! Upload Storage Module
//!
//! Persists incoming files under collision-resistant names and owns the
//! per-request output directories the model writes into.
//!
//! Layout:
//! - `{upload_dir}/{request_id}_{sanitized_name}` for each upload
//! - `{output_dir}/{request_id}/` for each request's result artifacts
//!
//! Nothing is ever cleaned up.

pub mod naming;
pub mod store;

pub use naming::{new_request_id, sanitize_filename};
pub use store::{StoredFile, UploadStore};
