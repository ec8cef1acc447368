//! Upload pipeline: validate → name → classify → resolve path → store → describe.

use std::sync::Arc;
use std::time::Instant;

use stowage_core::constants::SVG_MIME;
use stowage_core::{FileError, FileResult, FileType, StoredFile, UploadOptions, UploaderConfig};
use stowage_storage::DiskManager;
use uuid::Uuid;

use super::types::{split_filename, UploadRequest, UploadSource};
use crate::classifier::classify;
use crate::dimensions::{probe_dimensions, ImageInput};
use crate::path::resolve_path;
use crate::sanitizer::{sanitize, sanitize_extension};

type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

/// Stored filename: `<name>_<timestamp>.<extension>`, without the dot when the
/// extension is empty.
fn stored_filename(name: &str, timestamp: i64, extension: &str) -> String {
    if extension.is_empty() {
        format!("{}_{}", name, timestamp)
    } else {
        format!("{}_{}.{}", name, timestamp, extension)
    }
}

fn is_svg(request: &UploadRequest) -> bool {
    request.mime_type.eq_ignore_ascii_case(SVG_MIME)
        || ["svg", "svgz"]
            .iter()
            .any(|ext| request.extension.eq_ignore_ascii_case(ext))
}

/// Stores uploads on configured disks and describes the result.
///
/// Holds no per-request state; one instance serves concurrent uploads.
#[derive(Clone)]
pub struct UploadPipeline {
    config: Arc<UploaderConfig>,
    disks: Arc<DiskManager>,
    clock: Clock,
}

impl UploadPipeline {
    pub fn new(config: Arc<UploaderConfig>, disks: Arc<DiskManager>) -> Self {
        Self {
            config,
            disks,
            clock: Arc::new(|| chrono::Utc::now().timestamp()),
        }
    }

    /// Replace the unix-seconds clock used for stored filenames.
    pub fn with_clock(mut self, clock: impl Fn() -> i64 + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn config(&self) -> &UploaderConfig {
        &self.config
    }

    /// Store `request` according to `options` merged over the configured defaults.
    ///
    /// # Errors
    ///
    /// - [`FileError::InvalidFile`] when the transport marked the request invalid
    ///   or its size is unknown.
    /// - [`FileError::InvalidUpload`] when the content cannot be opened or the
    ///   disk does not accept the write.
    /// - [`FileError::Storage`] when the requested disk is not configured.
    pub async fn upload(
        &self,
        request: UploadRequest,
        options: UploadOptions,
    ) -> FileResult<StoredFile> {
        let start = Instant::now();

        if !request.valid {
            return Err(FileError::InvalidFile(
                request
                    .error_message
                    .clone()
                    .unwrap_or_else(|| "The file is not valid.".to_string()),
            ));
        }
        let size = request
            .size
            .ok_or_else(|| FileError::InvalidFile("File failed to load.".to_string()))?;

        let options = options.resolve(&self.config);

        let sniffed = request.source.sniff().await;
        let normalized_extension = sniffed
            .map(|kind| kind.extension().to_string())
            .unwrap_or_else(|| request.extension.clone());

        let (raw_name, extension) = if options.safe {
            (Uuid::new_v4().simple().to_string(), normalized_extension.clone())
        } else {
            let (stem, _) = split_filename(&request.original_name);
            (stem.to_string(), request.extension.clone())
        };

        let name = sanitize(&raw_name);
        let extension = sanitize_extension(&extension);
        let filename = stored_filename(&name, (self.clock)(), &extension);
        let file_type = classify(&extension);
        let path = resolve_path(&options.path, Some(options.user_id), file_type, &filename);

        tracing::debug!(
            original_name = %request.original_name,
            path = %path,
            file_type = %file_type,
            disk = %options.disk,
            safe = options.safe,
            "Resolved upload target"
        );

        let disk = self.disks.disk(&options.disk)?;

        let reader = request.source.open().await.map_err(|e| {
            tracing::error!(error = %e, path = %path, "Failed to open upload content");
            FileError::InvalidUpload("Could not read file from disk...".to_string())
        })?;

        // the reader is moved into the write and dropped when it returns
        match disk.put(&path, reader, options.visibility).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::error!(path = %path, disk = %options.disk, "Disk declined the write");
                return Err(FileError::InvalidUpload(
                    "The file could not be written to disk...".to_string(),
                ));
            }
            Err(e) => {
                tracing::error!(error = %e, path = %path, disk = %options.disk, "Disk write failed");
                return Err(FileError::InvalidUpload(
                    "The file could not be written to disk...".to_string(),
                ));
            }
        }

        let dimensions = if file_type == FileType::Image && !is_svg(&request) {
            let input = match &request.source {
                UploadSource::Bytes(data) => ImageInput::Bytes(data.clone()),
                UploadSource::Path(p) => ImageInput::Path(p.clone()),
            };
            probe_dimensions(input).await
        } else {
            None
        };

        tracing::info!(
            path = %path,
            disk = %options.disk,
            size_bytes = size,
            duration_ms = start.elapsed().as_millis() as u64,
            "File uploaded"
        );

        Ok(StoredFile {
            file_type,
            extension: request.extension.clone(),
            normalized_extension,
            name,
            original_name: request.original_name.clone(),
            size,
            mime_type: request.mime_type.clone(),
            dimensions,
            url: disk.url(&path),
            path,
            user_id: options.user_id,
            disk: options.disk,
            visibility: options.visibility,
            uuid: Uuid::new_v4(),
        })
    }
}

impl std::fmt::Debug for UploadPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadPipeline")
            .field("config", &self.config)
            .field("disks", &self.disks)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};
    use std::io::Cursor;
    use stowage_core::Visibility;
    use stowage_storage::{LocalStorage, MemoryStorage, Storage};

    const NOW: i64 = 1_700_000_000;

    fn pipeline_with(disk: Arc<dyn Storage>) -> UploadPipeline {
        let disks = DiskManager::new().with_disk("local", disk);
        UploadPipeline::new(Arc::new(UploaderConfig::default()), Arc::new(disks))
            .with_clock(|| NOW)
    }

    fn memory_pipeline() -> (UploadPipeline, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new("https://files.example.com"));
        (pipeline_with(storage.clone()), storage)
    }

    fn jpeg(width: u32, height: u32) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        RgbImage::new(width, height)
            .write_to(&mut out, ImageFormat::Jpeg)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn test_stored_filename() {
        assert_eq!(stored_filename("cat", 5, "png"), "cat_5.png");
        assert_eq!(stored_filename("Makefile", 5, ""), "Makefile_5");
    }

    #[tokio::test]
    async fn test_document_upload_with_defaults() {
        let (pipeline, storage) = memory_pipeline();
        let request =
            UploadRequest::from_bytes("My Résumé #1.pdf", "application/pdf", vec![0u8; 204_800]);

        let stored = pipeline.upload(request, UploadOptions::new()).await.unwrap();

        assert_eq!(stored.file_type, FileType::Document);
        assert_eq!(stored.name, "My-Résumé--1");
        assert_eq!(stored.path, format!("uploads/1/document/My-Résumé--1_{NOW}.pdf"));
        assert_eq!(stored.url, format!("https://files.example.com/{}", stored.path));
        assert_eq!(stored.size, 204_800);
        assert_eq!(stored.extension, "pdf");
        assert_eq!(stored.normalized_extension, "pdf");
        assert_eq!(stored.original_name, "My Résumé #1.pdf");
        assert_eq!(stored.mime_type, "application/pdf");
        assert_eq!(stored.dimensions, None);
        assert_eq!(stored.visibility, Visibility::Public);
        assert_eq!(stored.user_id, 1);
        assert_eq!(stored.disk, "local");
        assert_eq!(stored.uuid.get_version_num(), 4);
        assert!(storage.exists(&stored.path).await.unwrap());
    }

    #[tokio::test]
    async fn test_image_upload_reports_dimensions() {
        let (pipeline, _) = memory_pipeline();
        let request = UploadRequest::from_bytes("photo.jpg", "image/jpeg", jpeg(800, 600));

        let stored = pipeline
            .upload(request, UploadOptions::new().user_id(42))
            .await
            .unwrap();

        assert_eq!(stored.file_type, FileType::Image);
        assert_eq!(stored.dimensions.as_deref(), Some("800x600"));
        assert_eq!(stored.path, format!("uploads/42/image/photo_{NOW}.jpg"));
    }

    #[tokio::test]
    async fn test_svg_and_broken_images_have_no_dimensions() {
        let (pipeline, _) = memory_pipeline();

        let svg = UploadRequest::from_bytes(
            "logo.svg",
            "image/svg+xml",
            &b"<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"10\" height=\"10\"/>"[..],
        );
        let stored = pipeline.upload(svg, UploadOptions::new()).await.unwrap();
        assert_eq!(stored.file_type, FileType::Image);
        assert_eq!(stored.dimensions, None);

        let broken = UploadRequest::from_bytes("broken.png", "image/png", &b"not a png"[..]);
        let stored = pipeline.upload(broken, UploadOptions::new()).await.unwrap();
        assert_eq!(stored.dimensions, None);
    }

    #[tokio::test]
    async fn test_invalid_request_is_rejected_before_storage() {
        let (pipeline, storage) = memory_pipeline();

        let request = UploadRequest::from_bytes("a.txt", "text/plain", &b"x"[..])
            .with_error("The file was only partially uploaded.");
        let err = pipeline.upload(request, UploadOptions::new()).await.unwrap_err();
        assert_eq!(
            err,
            FileError::InvalidFile("The file was only partially uploaded.".to_string())
        );

        let mut request = UploadRequest::from_bytes("a.txt", "text/plain", &b"x"[..]);
        request.size = None;
        let err = pipeline.upload(request, UploadOptions::new()).await.unwrap_err();
        assert_eq!(err, FileError::InvalidFile("File failed to load.".to_string()));

        let path = format!("uploads/1/document/a_{NOW}.txt");
        assert!(!storage.exists(&path).await.unwrap());
    }

    #[tokio::test]
    async fn test_unreadable_source_is_invalid_upload() {
        let (pipeline, _) = memory_pipeline();
        let request =
            UploadRequest::from_path("/nonexistent/upload.tmp", "a.txt", "text/plain", Some(1));

        let err = pipeline.upload(request, UploadOptions::new()).await.unwrap_err();
        assert_eq!(
            err,
            FileError::InvalidUpload("Could not read file from disk...".to_string())
        );
    }

    #[tokio::test]
    async fn test_declined_write_is_invalid_upload() {
        let pipeline = pipeline_with(Arc::new(MemoryStorage::read_only("")));
        let request = UploadRequest::from_bytes("a.txt", "text/plain", &b"x"[..]);

        let err = pipeline.upload(request, UploadOptions::new()).await.unwrap_err();
        assert_eq!(
            err,
            FileError::InvalidUpload("The file could not be written to disk...".to_string())
        );
    }

    #[tokio::test]
    async fn test_unknown_disk() {
        let (pipeline, _) = memory_pipeline();
        let request = UploadRequest::from_bytes("a.txt", "text/plain", &b"x"[..]);

        let err = pipeline
            .upload(request, UploadOptions::new().disk("s3"))
            .await
            .unwrap_err();
        assert!(matches!(err, FileError::Storage(msg) if msg.contains("[s3]")));
    }

    #[tokio::test]
    async fn test_options_override_defaults() {
        let (pipeline, storage) = memory_pipeline();
        let request = UploadRequest::from_bytes("track.MP3", "audio/mpeg", &b"ID3"[..]);

        let stored = pipeline
            .upload(
                request,
                UploadOptions::new()
                    .visibility_str("private")
                    .path("media/{type}/{filename}"),
            )
            .await
            .unwrap();

        assert_eq!(stored.file_type, FileType::Audio);
        assert_eq!(stored.path, format!("media/audio/track_{NOW}.MP3"));
        assert_eq!(stored.visibility, Visibility::Private);
        assert_eq!(
            storage.visibility(&stored.path).await.unwrap(),
            Visibility::Private
        );

        let request = UploadRequest::from_bytes("b.txt", "text/plain", &b"x"[..]);
        let stored = pipeline
            .upload(request, UploadOptions::new().visibility_str("hidden"))
            .await
            .unwrap();
        assert_eq!(stored.visibility, Visibility::Public);
    }

    #[tokio::test]
    async fn test_safe_mode_uses_random_name_and_detected_extension() {
        let (pipeline, _) = memory_pipeline();
        let request = UploadRequest::from_bytes("../../evil name.txt", "text/plain", jpeg(4, 4));

        let stored = pipeline
            .upload(request, UploadOptions::new().safe(true))
            .await
            .unwrap();

        assert_eq!(stored.name.len(), 32);
        assert!(stored.name.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(stored.normalized_extension, "jpg");
        assert_eq!(stored.extension, "txt");
        assert_eq!(stored.file_type, FileType::Image);
        assert_eq!(stored.path, format!("uploads/1/image/{}_{NOW}.jpg", stored.name));
    }

    #[tokio::test]
    async fn test_reported_extension_cannot_add_path_segments() {
        let (pipeline, storage) = memory_pipeline();

        let request = UploadRequest::from_bytes("a.txt", "text/plain", &b"x"[..])
            .with_extension("sub/dir");
        let stored = pipeline.upload(request, UploadOptions::new()).await.unwrap();
        assert_eq!(stored.path, format!("uploads/1/file/a_{NOW}.sub-dir"));
        assert_eq!(stored.extension, "sub/dir");
        assert!(storage.exists(&stored.path).await.unwrap());

        let request = UploadRequest::from_bytes("report.p d#f", "application/pdf", &b"x"[..]);
        let stored = pipeline.upload(request, UploadOptions::new()).await.unwrap();
        assert_eq!(stored.path, format!("uploads/1/file/report_{NOW}.p-d-f"));
    }

    #[tokio::test]
    async fn test_same_second_uploads_share_a_path() {
        let (pipeline, storage) = memory_pipeline();

        let first = pipeline
            .upload(
                UploadRequest::from_bytes("dup.txt", "text/plain", &b"first"[..]),
                UploadOptions::new(),
            )
            .await
            .unwrap();
        let second = pipeline
            .upload(
                UploadRequest::from_bytes("dup.txt", "text/plain", &b"second"[..]),
                UploadOptions::new(),
            )
            .await
            .unwrap();

        assert_eq!(first.path, second.path);
        assert_ne!(first.uuid, second.uuid);
        assert_eq!(storage.get(&first.path).await.unwrap(), b"second".to_vec());
    }

    #[tokio::test]
    async fn test_upload_from_local_file_to_local_disk() {
        let source_dir = tempfile::tempdir().unwrap();
        let disk_dir = tempfile::tempdir().unwrap();
        let source = source_dir.path().join("upload.tmp");
        std::fs::write(&source, jpeg(20, 10)).unwrap();

        let storage = Arc::new(
            LocalStorage::new(disk_dir.path(), "http://localhost/storage".to_string())
                .await
                .unwrap(),
        );
        let pipeline = pipeline_with(storage);

        let request =
            UploadRequest::from_path(&source, "Holiday Pic.jpeg", "image/jpeg", Some(42));
        let stored = pipeline.upload(request, UploadOptions::new()).await.unwrap();

        assert_eq!(stored.path, format!("uploads/1/image/Holiday-Pic_{NOW}.jpeg"));
        assert_eq!(stored.dimensions.as_deref(), Some("20x10"));
        assert!(disk_dir.path().join(&stored.path).exists());
        assert!(source.exists());
    }
}
