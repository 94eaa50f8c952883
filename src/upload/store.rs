//! Upload Store
//!
//! Local filesystem storage for uploads and OCR output directories.

use std::io;
use std::path::{Path, PathBuf};

use super::naming::sanitize_filename;

/// An upload persisted to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Full path of the stored file
    pub path: PathBuf,
    /// `{request_id}_{sanitized_name}`
    pub unique_filename: String,
}

/// Local upload and output storage
#[derive(Debug, Clone)]
pub struct UploadStore {
    upload_dir: PathBuf,
    output_dir: PathBuf,
}

impl UploadStore {
    /// Open the store, creating both storage roots if needed
    pub async fn open(upload_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> io::Result<Self> {
        let store = Self {
            upload_dir: upload_dir.into(),
            output_dir: output_dir.into(),
        };

        tokio::fs::create_dir_all(&store.upload_dir).await?;
        tokio::fs::create_dir_all(&store.output_dir).await?;

        Ok(store)
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write an upload under `{request_id}_{sanitized original name}`
    pub async fn save(&self, request_id: &str, original_name: &str, data: &[u8]) -> io::Result<StoredFile> {
        let unique_filename = format!("{}_{}", request_id, sanitize_filename(original_name));
        let path = self.upload_dir.join(&unique_filename);

        tokio::fs::write(&path, data).await?;

        tracing::debug!(
            path = %path.display(),
            size = data.len(),
            "Upload stored"
        );

        Ok(StoredFile {
            path,
            unique_filename,
        })
    }

    /// Create (if missing) and return the output directory for a request
    pub async fn create_output_dir(&self, request_id: &str) -> io::Result<PathBuf> {
        let dir = self.output_dir.join(request_id);
        tokio::fs::create_dir_all(&dir).await?;
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_open_creates_roots() {
        let temp_dir = TempDir::new().unwrap();
        let uploads = temp_dir.path().join("nested/uploads");
        let outputs = temp_dir.path().join("nested/outputs");

        let store = UploadStore::open(&uploads, &outputs).await.unwrap();

        assert!(uploads.is_dir());
        assert!(outputs.is_dir());
        assert_eq!(store.upload_dir(), uploads.as_path());
    }

    #[tokio::test]
    async fn test_save_uses_unique_sanitized_name() {
        let temp_dir = TempDir::new().unwrap();
        let store = UploadStore::open(temp_dir.path().join("u"), temp_dir.path().join("o"))
            .await
            .unwrap();

        let stored = store
            .save("20240101_120000_deadbeef", "../my scan.png", b"fake png")
            .await
            .unwrap();

        assert_eq!(stored.unique_filename, "20240101_120000_deadbeef_my_scan.png");
        assert_eq!(stored.path, temp_dir.path().join("u/20240101_120000_deadbeef_my_scan.png"));
        assert_eq!(std::fs::read(&stored.path).unwrap(), b"fake png");
    }

    #[tokio::test]
    async fn test_output_dir_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let store = UploadStore::open(temp_dir.path().join("u"), temp_dir.path().join("o"))
            .await
            .unwrap();

        let first = store.create_output_dir("20240101_120000_deadbeef").await.unwrap();
        let second = store.create_output_dir("20240101_120000_deadbeef").await.unwrap();

        assert_eq!(first, second);
        assert!(first.is_dir());
    }
}
