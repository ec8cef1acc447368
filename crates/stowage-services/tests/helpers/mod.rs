//! Shared setup for upload flow tests.

#![allow(dead_code)]

pub mod fixtures;

use stowage_core::{DiskConfig, StorageBackend, UploaderConfig};
use stowage_services::{create_disks, FileUploader};
use tempfile::TempDir;

pub struct TestUploader {
    pub uploader: FileUploader,
    pub config: UploaderConfig,
    /// Root of the `local` disk; dropped with the fixture.
    pub root: TempDir,
}

/// An uploader with `local` and `public` filesystem disks under a temp dir.
pub async fn setup_local_uploader() -> TestUploader {
    let root = tempfile::tempdir().expect("create temp dir");
    let local_root = root.path().join("app");
    let public_root = root.path().join("app/public");

    let config = UploaderConfig {
        disks: vec![
            DiskConfig::new(
                "local",
                StorageBackend::Local,
                local_root.to_string_lossy(),
                "http://localhost:3000/storage",
            ),
            DiskConfig::new(
                "public",
                StorageBackend::Local,
                public_root.to_string_lossy(),
                "http://localhost:3000/storage/public",
            ),
        ],
        ..UploaderConfig::default()
    };
    config.validate().expect("valid config");

    let disks = create_disks(&config).await.expect("create disks");
    TestUploader {
        uploader: FileUploader::new(config.clone(), disks),
        config,
        root,
    }
}
