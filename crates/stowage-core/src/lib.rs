//! Stowage Core Library
//!
//! This crate provides the domain models, error types and configuration shared by
//! every Stowage component: the storage backends, the upload pipeline and the
//! read-side file access facade.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{DiskConfig, UploaderConfig};
pub use error::{ErrorMetadata, FileError, FileResult, LogLevel};
pub use models::{
    FileMeta, FileType, ImageSize, ResolvedOptions, StoredFile, UploadOptions, Visibility,
};
pub use storage_types::StorageBackend;
