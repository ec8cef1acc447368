//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;
use stowage_core::{FileError, Visibility};
use thiserror::Error;
use tokio::io::AsyncRead;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage path: {0}")]
    InvalidPath(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<StorageError> for FileError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(path) => FileError::MissingFile(format!("File {path} does not exist.")),
            other => FileError::Storage(other.to_string()),
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Byte source consumed by [`Storage::put`].
pub type ByteReader = Pin<Box<dyn AsyncRead + Send + Unpin>>;

/// Chunked contents returned by [`Storage::read_stream`].
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;

/// Storage abstraction trait
///
/// A storage backend serves one disk. Every operation takes a backend-relative
/// path; the backend is the source of truth for existence, size, type and
/// visibility of what it stores.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write the reader's contents to `path` with the given visibility.
    ///
    /// Returns `Ok(false)` when the backend declines the write without a
    /// more specific error.
    async fn put(
        &self,
        path: &str,
        reader: ByteReader,
        visibility: Visibility,
    ) -> StorageResult<bool>;

    /// Read the whole file at `path`
    async fn get(&self, path: &str) -> StorageResult<Vec<u8>>;

    /// Read a file as a stream (for large files)
    ///
    /// The stream yields `Bytes` chunks as they become available.
    async fn read_stream(&self, path: &str) -> StorageResult<ByteStream>;

    /// Check if a file exists
    async fn exists(&self, path: &str) -> StorageResult<bool>;

    /// Delete a file. Deleting an absent file succeeds.
    async fn delete(&self, path: &str) -> StorageResult<bool>;

    /// Publicly accessible URL for `path`
    fn url(&self, path: &str) -> String;

    /// Backend-local location of `path` (an absolute filesystem path for disks on disk)
    fn path(&self, path: &str) -> String;

    /// Size in bytes of the file at `path`
    async fn size(&self, path: &str) -> StorageResult<u64>;

    /// MIME type of the file at `path`
    async fn mime_type(&self, path: &str) -> StorageResult<String>;

    /// Last modification time as a Unix timestamp
    async fn last_modified(&self, path: &str) -> StorageResult<i64>;

    async fn visibility(&self, path: &str) -> StorageResult<Visibility>;

    async fn set_visibility(&self, path: &str, visibility: Visibility) -> StorageResult<bool>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}

/// Reject paths that could escape the disk root.
pub(crate) fn validate_path(path: &str) -> StorageResult<()> {
    if path.is_empty() {
        return Err(StorageError::InvalidPath("Storage path is empty".to_string()));
    }
    let traverses = path.split(['/', '\\']).any(|segment| segment == "..");
    if traverses || path.starts_with('/') || path.starts_with('\\') {
        return Err(StorageError::InvalidPath(
            "Storage path contains invalid characters".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("uploads/1/image/cat.png").is_ok());
        assert!(validate_path("uploads/1/document/notes..v2_1.pdf").is_ok());
        assert!(matches!(validate_path(""), Err(StorageError::InvalidPath(_))));
        assert!(matches!(validate_path("../etc/passwd"), Err(StorageError::InvalidPath(_))));
        assert!(matches!(validate_path("/etc/passwd"), Err(StorageError::InvalidPath(_))));
        assert!(matches!(validate_path("\\windows"), Err(StorageError::InvalidPath(_))));
        assert!(matches!(validate_path("a\\..\\b"), Err(StorageError::InvalidPath(_))));
    }

    #[test]
    fn test_not_found_maps_to_missing_file() {
        let err: FileError = StorageError::NotFound("a.txt".to_string()).into();
        assert_eq!(err, FileError::MissingFile("File a.txt does not exist.".to_string()));

        let err: FileError = StorageError::BackendError("down".to_string()).into();
        assert!(matches!(err, FileError::Storage(_)));
    }
}
