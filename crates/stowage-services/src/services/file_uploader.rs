//! Outermost upload entry point.

use std::sync::Arc;

use stowage_core::{
    ErrorMetadata, FileError, FileResult, LogLevel, StoredFile, UploadOptions, UploaderConfig,
};
use stowage_processing::{UploadPipeline, UploadRequest};
use stowage_storage::DiskManager;

use super::file_access::FileAccessFacade;

/// Log a failed upload at the level its error kind asks for.
fn log_upload_failure(error: &FileError) {
    let error_code = error.error_code();
    let status_code = error.status_code();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_code, status_code, "Upload failed");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_code, status_code, "Upload failed");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_code, status_code, "Upload failed");
        }
    }
}

/// Uploads files and gives access to stored ones, sharing one configuration and
/// one set of disks.
#[derive(Debug, Clone)]
pub struct FileUploader {
    pipeline: UploadPipeline,
    files: Arc<FileAccessFacade>,
}

impl FileUploader {
    pub fn new(config: UploaderConfig, disks: DiskManager) -> Self {
        let config = Arc::new(config);
        let disks = Arc::new(disks);
        Self {
            pipeline: UploadPipeline::new(config.clone(), disks.clone()),
            files: Arc::new(FileAccessFacade::new(config, disks)),
        }
    }

    /// Store an upload. Every failure is reported as
    /// [`FileError::UploadFailed`](stowage_core::FileError::UploadFailed)
    /// carrying the message and code of the underlying error.
    pub async fn store(
        &self,
        request: UploadRequest,
        options: UploadOptions,
    ) -> FileResult<StoredFile> {
        self.pipeline.upload(request, options).await.map_err(|e| {
            log_upload_failure(&e);
            e.into_upload_failed()
        })
    }

    /// Store an upload, keeping the specific error kind on failure.
    pub async fn upload(
        &self,
        request: UploadRequest,
        options: UploadOptions,
    ) -> FileResult<StoredFile> {
        self.pipeline.upload(request, options).await
    }

    pub fn files(&self) -> &FileAccessFacade {
        &self.files
    }

    pub fn pipeline(&self) -> &UploadPipeline {
        &self.pipeline
    }
}
