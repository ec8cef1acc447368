#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-memory")]
use crate::MemoryStorage;
use crate::{DiskManager, Storage, StorageBackend, StorageError, StorageResult};
use std::sync::Arc;
use stowage_core::{DiskConfig, UploaderConfig};

/// Create a storage backend for one configured disk
pub async fn create_storage(disk: &DiskConfig) -> StorageResult<Arc<dyn Storage>> {
    match disk.backend {
        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            if disk.root.trim().is_empty() {
                return Err(StorageError::ConfigError(format!(
                    "Disk [{}] has no root directory configured",
                    disk.name
                )));
            }
            let storage = LocalStorage::new(&disk.root, disk.base_url.clone()).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-memory")]
        StorageBackend::Memory => Ok(Arc::new(MemoryStorage::new(disk.base_url.clone()))),

        #[cfg(not(feature = "storage-memory"))]
        StorageBackend::Memory => Err(StorageError::ConfigError(
            "Memory storage backend not available (storage-memory feature not enabled)"
                .to_string(),
        )),
    }
}

/// Create every disk named in the configuration
pub async fn create_disks(config: &UploaderConfig) -> StorageResult<DiskManager> {
    let mut disks = DiskManager::new();

    for disk in &config.disks {
        let storage = create_storage(disk).await?;
        tracing::debug!(disk = %disk.name, backend = %disk.backend, "Disk configured");
        disks.insert(disk.name.clone(), storage);
    }

    Ok(disks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "storage-local")]
    #[tokio::test]
    async fn test_create_disks_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = UploaderConfig {
            disks: vec![
                DiskConfig::new(
                    "local",
                    StorageBackend::Local,
                    dir.path().join("app").display().to_string(),
                    "http://localhost/storage",
                ),
                DiskConfig::new("scratch", StorageBackend::Memory, "", "memory://"),
            ],
            ..UploaderConfig::default()
        };

        let disks = create_disks(&config).await.unwrap();

        assert_eq!(disks.names(), vec!["local", "scratch"]);
        assert_eq!(disks.disk("local").unwrap().backend_type(), StorageBackend::Local);
        assert_eq!(disks.disk("scratch").unwrap().backend_type(), StorageBackend::Memory);
        assert!(dir.path().join("app").is_dir());
    }

    #[cfg(feature = "storage-local")]
    #[tokio::test]
    async fn test_local_disk_requires_root() {
        let disk = DiskConfig::new("local", StorageBackend::Local, " ", "http://x");
        assert!(matches!(
            create_storage(&disk).await,
            Err(StorageError::ConfigError(_))
        ));
    }
}
