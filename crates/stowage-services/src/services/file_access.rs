//! Read-side operations against stored paths.

use futures::TryStreamExt;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use stowage_core::{FileError, FileMeta, FileResult, UploaderConfig, Visibility};
use stowage_processing::{diff_for_humans_now, format_bytes};
use stowage_storage::{ByteStream, DiskManager, Storage};

/// A stored file prepared for delivery to a client.
pub struct FileResponse {
    pub stream: ByteStream,
    pub content_type: String,
    pub content_length: Option<u64>,
    /// `Content-Disposition` header value.
    pub content_disposition: String,
}

impl FileResponse {
    /// Drain the stream into memory.
    pub async fn into_bytes(self) -> FileResult<Vec<u8>> {
        let chunks: Vec<_> = self.stream.map_err(FileError::from).try_collect().await?;
        Ok(chunks.concat())
    }
}

impl std::fmt::Debug for FileResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileResponse")
            .field("content_type", &self.content_type)
            .field("content_length", &self.content_length)
            .field("content_disposition", &self.content_disposition)
            .finish_non_exhaustive()
    }
}

/// Build a `Content-Disposition` value (`inline` or `attachment`).
///
/// Names that are not plain ASCII get an ASCII fallback plus an RFC 5987
/// `filename*` parameter.
pub fn content_disposition(disposition: &str, filename: &str) -> String {
    let plain = filename
        .chars()
        .all(|c| c.is_ascii() && !c.is_ascii_control() && c != '"' && c != '\\');
    if plain {
        return format!("{}; filename=\"{}\"", disposition, filename);
    }

    let fallback: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii() && !c.is_ascii_control() && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!(
        "{}; filename=\"{}\"; filename*=UTF-8''{}",
        disposition,
        fallback,
        urlencoding::encode(filename)
    )
}

fn basename(path: &str) -> &str {
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(path)
}

/// Fetch, stream, delete, query and re-permission stored files.
///
/// Every operation takes an optional disk name; `None` means the configured
/// default. The resolved name for each key is remembered for the lifetime of
/// the facade.
pub struct FileAccessFacade {
    config: Arc<UploaderConfig>,
    disks: Arc<DiskManager>,
    disk_cache: RwLock<HashMap<String, String>>,
}

impl FileAccessFacade {
    pub fn new(config: Arc<UploaderConfig>, disks: Arc<DiskManager>) -> Self {
        Self {
            config,
            disks,
            disk_cache: RwLock::new(HashMap::new()),
        }
    }

    /// Resolve a disk override to a disk name, memoized per override.
    pub fn disk_name(&self, disk: Option<&str>) -> String {
        let key = format!("disk_{}", disk.unwrap_or_default());

        if let Ok(cache) = self.disk_cache.read() {
            if let Some(name) = cache.get(&key) {
                return name.clone();
            }
        }

        let name = disk
            .filter(|d| !d.is_empty())
            .unwrap_or(self.config.default_disk.as_str())
            .to_string();

        if let Ok(mut cache) = self.disk_cache.write() {
            cache.entry(key).or_insert_with(|| name.clone());
        }
        name
    }

    fn storage(&self, disk: Option<&str>) -> FileResult<Arc<dyn Storage>> {
        Ok(self.disks.disk(&self.disk_name(disk))?)
    }

    async fn require_exists(&self, storage: &dyn Storage, path: &str) -> FileResult<()> {
        if storage.exists(path).await? {
            Ok(())
        } else {
            tracing::debug!(path = %path, "Requested file is missing");
            Err(FileError::MissingFile(format!("File {} does not exist.", path)))
        }
    }

    async fn respond(
        &self,
        path: &str,
        disposition: &str,
        filename: &str,
        disk: Option<&str>,
    ) -> FileResult<FileResponse> {
        let storage = self.storage(disk)?;
        let stream = storage.read_stream(path).await?;
        let content_type = storage.mime_type(path).await?;
        let content_length = storage.size(path).await.ok();

        Ok(FileResponse {
            stream,
            content_type,
            content_length,
            content_disposition: content_disposition(disposition, filename),
        })
    }

    /// Stream a stored file inline. Absence is reported by the backend itself.
    pub async fn stream_response(
        &self,
        path: &str,
        disk: Option<&str>,
    ) -> FileResult<FileResponse> {
        self.respond(path, "inline", basename(path), disk).await
    }

    /// Stream a stored file as an attachment named `name`, defaulting to the
    /// path's final segment.
    pub async fn download(
        &self,
        path: &str,
        name: Option<&str>,
        disk: Option<&str>,
    ) -> FileResult<FileResponse> {
        let filename = name.filter(|n| !n.is_empty()).unwrap_or(basename(path));
        self.respond(path, "attachment", filename, disk).await
    }

    /// Raw contents of a stored file.
    pub async fn read_contents(&self, path: &str, disk: Option<&str>) -> FileResult<Vec<u8>> {
        let storage = self.storage(disk)?;
        self.require_exists(storage.as_ref(), path).await?;
        Ok(storage.get(path).await?)
    }

    pub fn public_url(&self, path: &str, disk: Option<&str>) -> FileResult<String> {
        Ok(self.storage(disk)?.url(path))
    }

    pub fn local_path(&self, path: &str, disk: Option<&str>) -> FileResult<String> {
        Ok(self.storage(disk)?.path(path))
    }

    pub async fn visibility(&self, path: &str, disk: Option<&str>) -> FileResult<Visibility> {
        Ok(self.storage(disk)?.visibility(path).await?)
    }

    /// Change visibility. Returns `Ok(false)` without touching the backend when
    /// `visibility` is neither `public` nor `private`.
    pub async fn set_visibility(
        &self,
        path: &str,
        visibility: &str,
        disk: Option<&str>,
    ) -> FileResult<bool> {
        let Ok(visibility) = visibility.parse::<Visibility>() else {
            tracing::debug!(path = %path, requested = %visibility, "Ignoring unknown visibility");
            return Ok(false);
        };
        Ok(self.storage(disk)?.set_visibility(path, visibility).await?)
    }

    /// Delete a stored file. With `throw_if_missing` an absent path is a
    /// [`FileError::MissingFile`]; otherwise deleting an absent path succeeds.
    pub async fn delete(
        &self,
        path: &str,
        throw_if_missing: bool,
        disk: Option<&str>,
    ) -> FileResult<bool> {
        let storage = self.storage(disk)?;
        if throw_if_missing {
            self.require_exists(storage.as_ref(), path).await?;
        }
        let deleted = storage.delete(path).await?;
        tracing::info!(path = %path, disk = %self.disk_name(disk), "File deleted");
        Ok(deleted)
    }

    /// Describe a stored file.
    pub async fn meta(&self, path: &str, disk: Option<&str>) -> FileResult<FileMeta> {
        let storage = self.storage(disk)?;
        let size = storage.size(path).await?;
        let last_modified = storage.last_modified(path).await?;

        Ok(FileMeta {
            path: storage.path(path),
            url: storage.url(path),
            visibility: storage.visibility(path).await?,
            mime_type: storage.mime_type(path).await?,
            size: format_bytes(size, 2),
            last_modified: diff_for_humans_now(last_modified),
            name: basename(path).to_string(),
        })
    }
}

impl std::fmt::Debug for FileAccessFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileAccessFacade")
            .field("default_disk", &self.config.default_disk)
            .field("disks", &self.disks)
            .finish_non_exhaustive()
    }
}
