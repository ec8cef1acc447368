//! Types for the upload pipeline.

use bytes::Bytes;
use std::io;
use std::path::{Path, PathBuf};
use stowage_storage::ByteReader;

use crate::classifier::{mime_type_for_filename, InferSniffer, MimeSniffer};

/// Where the uploaded bytes come from.
#[derive(Clone, Debug)]
pub enum UploadSource {
    /// A file already on local disk (e.g. a transport's temporary upload file).
    Path(PathBuf),
    /// An in-memory buffer.
    Bytes(Bytes),
}

impl UploadSource {
    /// Open the content for reading. Each call yields a fresh reader.
    pub async fn open(&self) -> io::Result<ByteReader> {
        match self {
            UploadSource::Path(path) => {
                let file = tokio::fs::File::open(path).await?;
                Ok(Box::pin(file))
            }
            UploadSource::Bytes(data) => Ok(Box::pin(io::Cursor::new(data.clone()))),
        }
    }

    /// Detect the content type from magic bytes.
    pub async fn sniff(&self) -> Option<infer::Type> {
        match self {
            UploadSource::Bytes(data) => infer::get(data),
            UploadSource::Path(path) => {
                let path = path.clone();
                let sniffed = tokio::task::spawn_blocking(move || infer::get_from_path(&path)).await;
                match sniffed {
                    Ok(Ok(kind)) => kind,
                    Ok(Err(e)) => {
                        tracing::debug!(error = %e, "Content sniffing skipped");
                        None
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Content sniffing task failed");
                        None
                    }
                }
            }
        }
    }
}

/// Split a client filename into its base name and extension.
///
/// Only the final path segment is considered; the extension is whatever follows
/// the last `.` (`"archive.tar.gz"` gives `("archive.tar", "gz")`).
pub fn split_filename(filename: &str) -> (&str, &str) {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    match base.rsplit_once('.') {
        Some((stem, extension)) => (stem, extension),
        None => (base, ""),
    }
}

/// An incoming file as reported by the transport layer.
#[derive(Clone, Debug)]
pub struct UploadRequest {
    pub source: UploadSource,
    /// Client-supplied filename, including extension.
    pub original_name: String,
    /// Client-supplied extension.
    pub extension: String,
    /// `None` when the transport could not determine the size.
    pub size: Option<u64>,
    /// Client-supplied MIME type.
    pub mime_type: String,
    pub valid: bool,
    pub error_message: Option<String>,
}

impl UploadRequest {
    pub fn from_bytes(
        original_name: impl Into<String>,
        mime_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        let data = data.into();
        let original_name = original_name.into();
        let extension = split_filename(&original_name).1.to_string();
        Self {
            size: Some(data.len() as u64),
            source: UploadSource::Bytes(data),
            original_name,
            extension,
            mime_type: mime_type.into(),
            valid: true,
            error_message: None,
        }
    }

    pub fn from_path(
        path: impl Into<PathBuf>,
        original_name: impl Into<String>,
        mime_type: impl Into<String>,
        size: Option<u64>,
    ) -> Self {
        let original_name = original_name.into();
        let extension = split_filename(&original_name).1.to_string();
        Self {
            source: UploadSource::Path(path.into()),
            original_name,
            extension,
            size,
            mime_type: mime_type.into(),
            valid: true,
            error_message: None,
        }
    }

    /// Build a request for a local file, taking the name from the path, the size
    /// from file metadata and the MIME type from the extension table or content.
    pub async fn from_file(path: &Path) -> Self {
        let size = tokio::fs::metadata(path).await.ok().map(|m| m.len());
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let sniffer: &dyn MimeSniffer = &InferSniffer;
        let mime = mime_type_for_filename(&path.to_string_lossy(), Some(sniffer));
        Self::from_path(path, name, mime, size)
    }

    /// Mark the request as rejected by the transport.
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.valid = false;
        self.error_message = Some(message.into());
        self
    }

    /// Override the reported extension.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }
}
