//! Named disks.

use crate::traits::{Storage, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::Arc;

/// Registry mapping disk names to storage backends.
#[derive(Clone, Default)]
pub struct DiskManager {
    disks: HashMap<String, Arc<dyn Storage>>,
}

impl DiskManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a backend under `name`, replacing any previous one.
    pub fn insert(&mut self, name: impl Into<String>, storage: Arc<dyn Storage>) {
        self.disks.insert(name.into(), storage);
    }

    pub fn with_disk(mut self, name: impl Into<String>, storage: Arc<dyn Storage>) -> Self {
        self.insert(name, storage);
        self
    }

    pub fn disk(&self, name: &str) -> StorageResult<Arc<dyn Storage>> {
        self.disks.get(name).cloned().ok_or_else(|| {
            StorageError::ConfigError(format!("Disk [{}] does not have a configured driver", name))
        })
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.disks.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for DiskManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiskManager")
            .field("disks", &self.names())
            .finish()
    }
}

#[cfg(all(test, feature = "storage-memory"))]
mod tests {
    use super::*;
    use crate::MemoryStorage;

    #[test]
    fn test_disk_lookup() {
        let disks = DiskManager::new()
            .with_disk("public", Arc::new(MemoryStorage::new("https://a")))
            .with_disk("local", Arc::new(MemoryStorage::new("https://b")));

        assert_eq!(disks.names(), vec!["local", "public"]);
        assert_eq!(disks.disk("public").unwrap().url("x"), "https://a/x");
        assert!(matches!(disks.disk("s3"), Err(StorageError::ConfigError(_))));
    }
}
