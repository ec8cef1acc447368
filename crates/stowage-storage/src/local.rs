use crate::traits::{validate_path, ByteReader, ByteStream, Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::UNIX_EPOCH;
use stowage_core::Visibility;
use tokio::fs;

/// Unix permission bits applied for each visibility.
#[cfg(unix)]
const PUBLIC_FILE_MODE: u32 = 0o644;
#[cfg(unix)]
const PRIVATE_FILE_MODE: u32 = 0o600;

/// Distinguishes concurrent in-flight writes to the same target.
static PART_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Sibling of `full` that a write streams into before it is renamed over the target.
fn part_path(full: &Path) -> PathBuf {
    let name = full
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let seq = PART_COUNTER.fetch_add(1, Ordering::Relaxed);
    full.with_file_name(format!(".{}.{}-{}.part", name, std::process::id(), seq))
}

/// Local filesystem storage implementation
#[derive(Clone, Debug)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "/var/lib/stowage/app")
    /// * `base_url` - Base URL for serving files (e.g., "http://localhost:3000/storage")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    /// Convert a storage path to a filesystem path with security validation
    ///
    /// Rejects paths with traversal segments, and paths that resolve outside the
    /// base storage directory through existing links.
    fn resolve(&self, path: &str) -> StorageResult<PathBuf> {
        validate_path(path)?;

        let full = self.base_path.join(path);

        let base_canonical = self.base_path.canonicalize().map_err(|e| {
            StorageError::ConfigError(format!("Failed to canonicalize base path: {}", e))
        })?;

        if let Ok(canonical) = full.canonicalize() {
            if canonical.strip_prefix(&base_canonical).is_err() {
                return Err(StorageError::InvalidPath(
                    "Storage path resolves outside storage directory".to_string(),
                ));
            }
        }

        Ok(full)
    }

    /// Stream `reader` into `part`, flushed and with permissions applied.
    async fn write_part(
        &self,
        part: &Path,
        reader: &mut ByteReader,
        visibility: Visibility,
    ) -> StorageResult<u64> {
        let mut file = fs::File::create(part).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", part.display(), e))
        })?;

        let bytes_copied = tokio::io::copy(reader, &mut file).await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to write stream to file {}: {}",
                part.display(),
                e
            ))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", part.display(), e))
        })?;
        drop(file);

        self.apply_visibility(part, visibility).await?;
        Ok(bytes_copied)
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    async fn require_file(&self, path: &str) -> StorageResult<PathBuf> {
        let full = self.resolve(path)?;
        if !fs::try_exists(&full).await.unwrap_or(false) {
            return Err(StorageError::NotFound(path.to_string()));
        }
        Ok(full)
    }

    #[cfg(unix)]
    async fn apply_visibility(&self, full: &Path, visibility: Visibility) -> StorageResult<()> {
        use std::os::unix::fs::PermissionsExt;

        let mode = match visibility {
            Visibility::Public => PUBLIC_FILE_MODE,
            Visibility::Private => PRIVATE_FILE_MODE,
        };
        fs::set_permissions(full, std::fs::Permissions::from_mode(mode)).await?;
        Ok(())
    }

    #[cfg(not(unix))]
    async fn apply_visibility(&self, _full: &Path, _visibility: Visibility) -> StorageResult<()> {
        Ok(())
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn put(
        &self,
        path: &str,
        mut reader: ByteReader,
        visibility: Visibility,
    ) -> StorageResult<bool> {
        let full = self.resolve(path)?;
        let start = std::time::Instant::now();

        self.ensure_parent_dir(&full).await?;

        let part = part_path(&full);
        let written = match self.write_part(&part, &mut reader, visibility).await {
            Ok(n) => fs::rename(&part, &full).await.map(|_| n).map_err(|e| {
                StorageError::UploadFailed(format!(
                    "Failed to move file into {}: {}",
                    full.display(),
                    e
                ))
            }),
            Err(e) => Err(e),
        };

        let bytes_copied = match written {
            Ok(n) => n,
            Err(e) => {
                if let Err(cleanup) = fs::remove_file(&part).await {
                    tracing::warn!(path = %part.display(), error = %cleanup, "Failed to remove partial file");
                }
                return Err(e);
            }
        };

        tracing::info!(
            path = %full.display(),
            key = %path,
            size_bytes = bytes_copied,
            visibility = %visibility,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage write successful"
        );

        Ok(true)
    }

    async fn get(&self, path: &str) -> StorageResult<Vec<u8>> {
        let full = self.require_file(path).await?;
        let start = std::time::Instant::now();

        let data = fs::read(&full).await.map_err(|e| {
            StorageError::DownloadFailed(format!("Failed to read file {}: {}", full.display(), e))
        })?;

        tracing::info!(
            path = %full.display(),
            key = %path,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage read successful"
        );

        Ok(data)
    }

    async fn read_stream(&self, path: &str) -> StorageResult<ByteStream> {
        let full = self.require_file(path).await?;
        let start = std::time::Instant::now();

        let file = fs::File::open(&full).await.map_err(|e| {
            StorageError::DownloadFailed(format!("Failed to open file {}: {}", full.display(), e))
        })?;

        let stream = tokio_util::io::ReaderStream::new(file).map(|result| {
            result.map_err(|e| StorageError::DownloadFailed(format!("Failed to read chunk: {}", e)))
        });

        let key = path.to_string();
        let path_display = full.display().to_string();
        let logged_stream = stream.map(move |item| {
            if item.is_err() {
                tracing::error!(
                    path = %path_display,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Local storage stream read error"
                );
            }
            item
        });

        Ok(Box::pin(logged_stream))
    }

    async fn exists(&self, path: &str) -> StorageResult<bool> {
        let full = self.resolve(path)?;
        Ok(fs::try_exists(&full).await.unwrap_or(false))
    }

    async fn delete(&self, path: &str) -> StorageResult<bool> {
        let full = self.resolve(path)?;
        let start = std::time::Instant::now();

        if !fs::try_exists(&full).await.unwrap_or(false) {
            return Ok(true);
        }

        fs::remove_file(&full).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to delete file {}: {}", full.display(), e))
        })?;

        tracing::info!(
            path = %full.display(),
            key = %path,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage delete successful"
        );

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
        self.base_path.join(path).display().to_string()
    }

    async fn size(&self, path: &str) -> StorageResult<u64> {
        let full = self.require_file(path).await?;
        let meta = fs::metadata(&full)
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))?;
        Ok(meta.len())
    }

    async fn mime_type(&self, path: &str) -> StorageResult<String> {
        let full = self.require_file(path).await?;
        let sniffed = {
            let full = full.clone();
            tokio::task::spawn_blocking(move || infer::get_from_path(full).ok().flatten())
                .await
                .map_err(|e| StorageError::BackendError(e.to_string()))?
        };

        Ok(match sniffed {
            Some(kind) => kind.mime_type().to_string(),
            None => mime_guess::from_path(&full)
                .first_or_octet_stream()
                .essence_str()
                .to_string(),
        })
    }

    async fn last_modified(&self, path: &str) -> StorageResult<i64> {
        let full = self.require_file(path).await?;
        let modified = fs::metadata(&full).await?.modified()?;
        let secs = modified
            .duration_since(UNIX_EPOCH)
            .map_err(|e| StorageError::BackendError(e.to_string()))?
            .as_secs();
        Ok(secs as i64)
    }

    #[cfg(unix)]
    async fn visibility(&self, path: &str) -> StorageResult<Visibility> {
        use std::os::unix::fs::PermissionsExt;

        let full = self.require_file(path).await?;
        let mode = fs::metadata(&full).await?.permissions().mode();
        if mode & 0o004 != 0 {
            Ok(Visibility::Public)
        } else {
            Ok(Visibility::Private)
        }
    }

    #[cfg(not(unix))]
    async fn visibility(&self, path: &str) -> StorageResult<Visibility> {
        self.require_file(path).await?;
        Ok(Visibility::Public)
    }

    async fn set_visibility(&self, path: &str, visibility: Visibility) -> StorageResult<bool> {
        let full = self.require_file(path).await?;
        self.apply_visibility(&full, visibility).await?;

        tracing::debug!(key = %path, visibility = %visibility, "Local storage visibility changed");
        Ok(true)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
