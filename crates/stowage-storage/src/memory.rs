//! In-memory storage backend.
//!
//! Objects live in a map for the lifetime of the instance. Useful for tests and
//! for ephemeral disks.

use crate::traits::{validate_path, ByteReader, ByteStream, Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Arc;
use stowage_core::Visibility;
use tokio::io::AsyncReadExt;
use tokio::sync::RwLock;

/// Size of chunks yielded by [`MemoryStorage::read_stream`].
const STREAM_CHUNK_SIZE: usize = 64 * 1024;

#[derive(Clone, Debug)]
struct MemoryObject {
    data: Bytes,
    visibility: Visibility,
    last_modified: i64,
}

#[derive(Clone, Debug)]
pub struct MemoryStorage {
    objects: Arc<RwLock<HashMap<String, MemoryObject>>>,
    base_url: String,
    reject_writes: bool,
}

impl MemoryStorage {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            objects: Arc::new(RwLock::new(HashMap::new())),
            base_url: base_url.into(),
            reject_writes: false,
        }
    }

    /// A disk that declines every write (`put` returns `Ok(false)`).
    pub fn read_only(base_url: impl Into<String>) -> Self {
        Self {
            reject_writes: true,
            ..Self::new(base_url)
        }
    }

    async fn object(&self, path: &str) -> StorageResult<MemoryObject> {
        validate_path(path)?;
        self.objects
            .read()
            .await
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(path.to_string()))
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn put(
        &self,
        path: &str,
        mut reader: ByteReader,
        visibility: Visibility,
    ) -> StorageResult<bool> {
        validate_path(path)?;

        if self.reject_writes {
            tracing::warn!(key = %path, "Memory storage is read-only, write declined");
            return Ok(false);
        }

        let mut data = Vec::new();
        reader
            .read_to_end(&mut data)
            .await
            .map_err(|e| StorageError::UploadFailed(format!("Failed to read stream: {}", e)))?;

        let size = data.len();
        self.objects.write().await.insert(
            path.to_string(),
            MemoryObject {
                data: Bytes::from(data),
                visibility,
                last_modified: chrono::Utc::now().timestamp(),
            },
        );

        tracing::info!(key = %path, size_bytes = size, "Memory storage write successful");
        Ok(true)
    }

    async fn get(&self, path: &str) -> StorageResult<Vec<u8>> {
        Ok(self.object(path).await?.data.to_vec())
    }

    async fn read_stream(&self, path: &str) -> StorageResult<ByteStream> {
        let data = self.object(path).await?.data;
        let chunks: Vec<Result<Bytes, StorageError>> = (0..data.len())
            .step_by(STREAM_CHUNK_SIZE)
            .map(|start| {
                let end = usize::min(start + STREAM_CHUNK_SIZE, data.len());
                Ok(data.slice(start..end))
            })
            .collect();
        Ok(Box::pin(futures::stream::iter(chunks)))
    }

    async fn exists(&self, path: &str) -> StorageResult<bool> {
        validate_path(path)?;
        Ok(self.objects.read().await.contains_key(path))
    }

    async fn delete(&self, path: &str) -> StorageResult<bool> {
        validate_path(path)?;
        if self.objects.write().await.remove(path).is_some() {
            tracing::info!(key = %path, "Memory storage delete successful");
        }
        Ok(true)
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn path(&self, path: &str) -> String {
        path.to_string()
    }

    async fn size(&self, path: &str) -> StorageResult<u64> {
        Ok(self.object(path).await?.data.len() as u64)
    }

    async fn mime_type(&self, path: &str) -> StorageResult<String> {
        let object = self.object(path).await?;
        Ok(match infer::get(&object.data) {
            Some(kind) => kind.mime_type().to_string(),
            None => mime_guess::from_path(path)
                .first_or_octet_stream()
                .essence_str()
                .to_string(),
        })
    }

    async fn last_modified(&self, path: &str) -> StorageResult<i64> {
        Ok(self.object(path).await?.last_modified)
    }

    async fn visibility(&self, path: &str) -> StorageResult<Visibility> {
        Ok(self.object(path).await?.visibility)
    }

    async fn set_visibility(&self, path: &str, visibility: Visibility) -> StorageResult<bool> {
        validate_path(path)?;
        match self.objects.write().await.get_mut(path) {
            Some(object) => {
                object.visibility = visibility;
                Ok(true)
            }
            None => Err(StorageError::NotFound(path.to_string())),
        }
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}
