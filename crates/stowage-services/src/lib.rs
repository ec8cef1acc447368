//! Stowage Services Layer
//!
//! Entry points integrators call: [`FileUploader`] for writes and
//! [`FileAccessFacade`] for everything that reads or mutates an already stored
//! path. Both are built from one [`UploaderConfig`] and one [`DiskManager`], and
//! this crate re-exports what callers need from the lower layers.

pub mod services;

pub use services::file_access::{content_disposition, FileAccessFacade, FileResponse};
pub use services::file_uploader::FileUploader;
pub use stowage_core::{
    ErrorMetadata, FileError, FileMeta, FileResult, FileType, StoredFile, UploadOptions,
    UploaderConfig, Visibility,
};
pub use stowage_processing::{UploadPipeline, UploadRequest, UploadSource};
pub use stowage_storage::{
    create_disks, DiskManager, LocalStorage, MemoryStorage, Storage, StorageError,
};
